//! # docuform
//!
//! Convert DocuSign template exports into fillable PDFs.
//!
//! A template export is a JSON document carrying one or more base64-encoded
//! PDFs plus per-recipient "tabs" that place fields on their pages. This
//! library merges the PDFs and overlays native AcroForm fields at the tab
//! positions.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> docuform::Result<()> {
//!     let result = docuform::convert_file("template.json")?;
//!     std::fs::write("output.pdf", &result.pdf)?;
//!     println!("{}", result.counters);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Field classification**: tab records resolve to a closed set of kinds
//! - **Coordinate conversion**: top-left template space to PDF user space
//! - **Fallback construction**: a field that cannot be built degrades to text
//! - **System-tab filtering**: invisible bookkeeping tabs are dropped
//! - **Parallel decoding**: uses Rayon to decode source documents

pub mod classify;
pub mod convert;
pub mod detect;
pub mod error;
pub mod fields;
pub mod filter;
pub mod geometry;
pub mod model;
pub mod pdf;
pub mod template;

// Re-export commonly used types
pub use classify::{classify, classify_type_name, classify_with_hint};
pub use convert::{
    ConvertOptions, ConvertResult, FieldTypeCounters, InspectReport, SkipReason, TabOutcome,
    TabReport, TemplateConverter,
};
pub use detect::{detect_format_from_bytes, is_pdf_bytes, PdfFormat};
pub use error::{Error, Result};
pub use fields::{FieldRegistry, FieldTier, Rejection};
pub use filter::is_system_tab;
pub use geometry::{to_rectangle, FieldSizes, Size};
pub use model::{
    FieldCategory, FieldKind, ListItem, PageSize, RadioOption, Rectangle, Tab, TemplateExport,
};
pub use pdf::{FormBackend, LopdfFormBackend, PageMapping};
pub use template::parse_template;

use std::path::Path;

/// Convert a template JSON export with default options.
///
/// # Example
///
/// ```no_run
/// let json = std::fs::read_to_string("template.json").unwrap();
/// let result = docuform::convert_json(&json).unwrap();
/// println!("{} fields", result.field_count());
/// ```
pub fn convert_json(json: &str) -> Result<ConvertResult> {
    TemplateConverter::default().convert_json(json)
}

/// Convert a template JSON export with custom options.
pub fn convert_json_with_options(json: &str, options: ConvertOptions) -> Result<ConvertResult> {
    TemplateConverter::new(options).convert_json(json)
}

/// Convert a template JSON file with default options.
///
/// # Arguments
///
/// * `path` - Path to the template JSON export
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<ConvertResult> {
    convert_file_with_options(path, ConvertOptions::default())
}

/// Convert a template JSON file with custom options.
///
/// # Example
///
/// ```no_run
/// use docuform::{convert_file_with_options, ConvertOptions};
///
/// let options = ConvertOptions::new()
///     .with_header_mask(40.0)
///     .with_field_names(true);
/// let result = convert_file_with_options("template.json", options).unwrap();
/// std::fs::write("output.pdf", result.pdf).unwrap();
/// ```
pub fn convert_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ConvertOptions,
) -> Result<ConvertResult> {
    let json = std::fs::read_to_string(path)?;
    convert_json_with_options(&json, options)
}

/// Read a template file asynchronously and convert it on the calling task.
#[cfg(feature = "async")]
pub async fn convert_file_async<P: AsRef<Path>>(
    path: P,
    options: ConvertOptions,
) -> Result<ConvertResult> {
    let json = tokio::fs::read_to_string(path).await?;
    convert_json_with_options(&json, options)
}

/// Classify every tab of a template file without building a PDF.
pub fn inspect_file<P: AsRef<Path>>(path: P) -> Result<InspectReport> {
    let json = std::fs::read_to_string(path)?;
    TemplateConverter::default().inspect_json(&json)
}

/// Builder for template conversions.
///
/// # Example
///
/// ```no_run
/// use docuform::{Docuform, FieldKind};
///
/// let result = Docuform::new()
///     .include_system_tabs()
///     .mask_header(36.0)
///     .disable(FieldKind::RadioGroup)
///     .sequential()
///     .convert_file("template.json")?;
/// # Ok::<(), docuform::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Docuform {
    options: ConvertOptions,
}

impl Docuform {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing options.
    pub fn with_options(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Keep tabs the system-tab filter would drop.
    pub fn include_system_tabs(mut self) -> Self {
        self.options = self.options.with_system_tabs(true);
        self
    }

    /// Show generated field names as placeholders.
    pub fn show_field_names(mut self) -> Self {
        self.options = self.options.with_field_names(true);
        self
    }

    /// Mask the top of every page.
    pub fn mask_header(mut self, height: f64) -> Self {
        self.options = self.options.with_header_mask(height);
        self
    }

    /// Mask the bottom of every page.
    pub fn mask_footer(mut self, height: f64) -> Self {
        self.options = self.options.with_footer_mask(height);
        self
    }

    /// Override the default text-field size.
    pub fn field_size(mut self, width: f64, height: f64) -> Self {
        self.options = self.options.with_field_size(Some(width), Some(height));
        self
    }

    /// Exclude a field kind from translation.
    pub fn disable(mut self, kind: FieldKind) -> Self {
        self.options = self.options.disable(kind);
        self
    }

    /// Drop rejected tabs instead of placing a plain text field.
    pub fn without_text_fallback(mut self) -> Self {
        self.options = self.options.with_text_fallback(false);
        self
    }

    /// Disable parallel document decoding.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Build the converter.
    pub fn build(self) -> TemplateConverter {
        TemplateConverter::new(self.options)
    }

    /// Convert a template JSON export.
    pub fn convert_json(self, json: &str) -> Result<ConvertResult> {
        self.build().convert_json(json)
    }

    /// Convert a template JSON file.
    pub fn convert_file<P: AsRef<Path>>(self, path: P) -> Result<ConvertResult> {
        let json = std::fs::read_to_string(path)?;
        self.convert_json(&json)
    }
}
