//! Form backend abstraction layer.
//!
//! Provides a trait-based interface for the PDF operations the converter
//! needs (page geometry, field creation, page painting), isolating the
//! concrete PDF library (lopdf) from the field construction policies.

use crate::error::Result;
use crate::model::{PageSize, Rectangle};

/// RGB color with components in `0.0..=1.0`.
pub type Rgb = [f64; 3];

pub const BLACK: Rgb = [0.0, 0.0, 0.0];
pub const LIGHT_GRAY: Rgb = [0.9, 0.9, 0.9];

/// Border and background drawn around a widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetStyle {
    pub border: Rgb,
    pub background: Rgb,
}

impl WidgetStyle {
    /// Black border on a light-gray fill, used for signature placeholders.
    pub fn placeholder() -> Self {
        Self {
            border: BLACK,
            background: LIGHT_GRAY,
        }
    }
}

/// Properties shared by every field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldAttributes {
    /// Fully qualified field name (`/T`).
    pub name: String,
    /// Alternate name shown as a tooltip (`/TU`).
    pub tooltip: Option<String>,
    pub required: bool,
    pub read_only: bool,
}

impl FieldAttributes {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Single-line text field.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFieldSpec {
    pub attributes: FieldAttributes,
    pub rect: Rectangle,
    pub value: Option<String>,
    pub font_size: f64,
    pub style: Option<WidgetStyle>,
}

/// Unsigned signature placeholder (`/FT /Sig`).
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureFieldSpec {
    pub attributes: FieldAttributes,
    pub rect: Rectangle,
    pub font_size: f64,
    pub style: WidgetStyle,
}

/// Checkbox with an on/off state.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckboxSpec {
    pub attributes: FieldAttributes,
    pub rect: Rectangle,
    pub checked: bool,
}

/// One button of a radio group. Buttons may sit on different pages.
#[derive(Debug, Clone, PartialEq)]
pub struct RadioButtonSpec {
    pub page_index: usize,
    pub rect: Rectangle,
    pub export_value: String,
}

/// Mutually exclusive buttons sharing one field.
#[derive(Debug, Clone, PartialEq)]
pub struct RadioGroupSpec {
    pub attributes: FieldAttributes,
    pub buttons: Vec<RadioButtonSpec>,
    /// Export value of the pre-selected button, if any.
    pub selected: Option<String>,
}

/// Single-select dropdown (combo box).
#[derive(Debug, Clone, PartialEq)]
pub struct DropdownSpec {
    pub attributes: FieldAttributes,
    pub rect: Rectangle,
    /// `(label, export value)` pairs.
    pub options: Vec<(String, String)>,
    pub selected: Option<String>,
    pub font_size: f64,
}

/// Abstract interface for the output document.
///
/// Implementations own the merged document for a single conversion; none
/// of the methods is expected to be called from more than one thread.
pub trait FormBackend {
    /// Number of pages in the output document.
    fn page_count(&self) -> usize;

    /// MediaBox geometry of a zero-based page.
    fn page_size(&self, page_index: usize) -> Result<PageSize>;

    fn add_text_field(&mut self, page_index: usize, spec: &TextFieldSpec) -> Result<()>;

    fn add_signature_field(&mut self, page_index: usize, spec: &SignatureFieldSpec) -> Result<()>;

    fn add_checkbox(&mut self, page_index: usize, spec: &CheckboxSpec) -> Result<()>;

    /// Add a radio group; each button carries its own page.
    fn add_radio_group(&mut self, spec: &RadioGroupSpec) -> Result<()>;

    fn add_dropdown(&mut self, page_index: usize, spec: &DropdownSpec) -> Result<()>;

    /// Paint an opaque rectangle over the page content.
    fn fill_rect(&mut self, page_index: usize, rect: &Rectangle, color: Rgb) -> Result<()>;
}
