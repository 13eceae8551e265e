//! Coordinate conversion from template space to PDF space.
//!
//! Template positions are measured in points from the top-left corner of
//! the page; PDF user space starts at the bottom-left. Conversion always
//! reads the height of the destination page in the merged output.

use serde::{Deserialize, Serialize};

use crate::model::{FieldKind, Numeric, PageSize, RadioOption, Rectangle, Tab};

/// Width and height in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Per-kind default sizes, also used as minimum sizes at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldSizes {
    pub checkbox: Size,
    pub radio: Size,
    pub signature: Size,
    pub initials: Size,
    pub date: Size,
    pub text: Size,
}

impl Default for FieldSizes {
    fn default() -> Self {
        Self {
            checkbox: Size::new(12.0, 12.0),
            radio: Size::new(12.0, 12.0),
            signature: Size::new(120.0, 20.0),
            initials: Size::new(100.0, 25.0),
            date: Size::new(120.0, 20.0),
            text: Size::new(120.0, 20.0),
        }
    }
}

impl FieldSizes {
    /// Default size for a kind.
    ///
    /// `field_width`/`field_height` override the generic text default only;
    /// kinds with their own entry ignore them.
    pub fn default_for(
        &self,
        kind: FieldKind,
        field_width: Option<f64>,
        field_height: Option<f64>,
    ) -> Size {
        match kind {
            FieldKind::Checkbox => self.checkbox,
            FieldKind::SignHere | FieldKind::Stamp => self.signature,
            FieldKind::InitialHere => self.initials,
            FieldKind::DateSigned => self.date,
            _ => Size::new(
                positive(field_width).unwrap_or(self.text.width),
                positive(field_height).unwrap_or(self.text.height),
            ),
        }
    }

    /// Smallest usable size for a kind, if it has one.
    pub fn minimum_for(&self, kind: FieldKind) -> Option<Size> {
        match kind {
            FieldKind::Checkbox => Some(self.checkbox),
            FieldKind::RadioGroup => Some(self.radio),
            FieldKind::SignHere | FieldKind::Stamp => Some(self.signature),
            FieldKind::InitialHere => Some(self.initials),
            _ => None,
        }
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// A dimension that is missing, unparseable, zero or negative takes the default.
fn dimension(value: Numeric, default: f64) -> f64 {
    positive(value.value()).unwrap_or(default)
}

/// Convert a top-left-origin placement into a PDF rectangle.
///
/// Returns `None` when a position is present but not numeric, or when the
/// page geometry itself is unusable; callers skip the tab in that case.
pub fn to_rectangle(
    x: Numeric,
    y: Numeric,
    width: Numeric,
    height: Numeric,
    page: &PageSize,
    default: Size,
) -> Option<Rectangle> {
    let x = x.or_zero()?;
    let y = y.or_zero()?;
    if !page.top().is_finite() || !page.left().is_finite() {
        return None;
    }

    let width = dimension(width, default.width);
    let height = dimension(height, default.height);

    let left = page.left() + x;
    let top = page.top() - y;
    let rect = Rectangle::new(left, top - height, left + width, top);
    rect.is_finite().then_some(rect)
}

/// Rectangle for a tab on its destination page.
pub fn tab_rectangle(tab: &Tab, page: &PageSize, default: Size) -> Option<Rectangle> {
    to_rectangle(
        tab.x_position(),
        tab.y_position(),
        tab.width(),
        tab.height(),
        page,
        default,
    )
}

/// Rectangle for one radio button, from the button's own coordinates.
pub fn radio_rectangle(option: &RadioOption, page: &PageSize, default: Size) -> Option<Rectangle> {
    to_rectangle(
        option.x_position(),
        option.y_position(),
        option.width(),
        option.height(),
        page,
        default,
    )
}
