//! Conversion options.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fields::FieldRegistry;
use crate::geometry::FieldSizes;
use crate::model::FieldKind;

/// Options for template conversion.
///
/// Deserializes from the camelCase options object accepted by the web
/// front end (`includeSystemTabs`, `maskHeaderHeight`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertOptions {
    /// Keep tabs the system-tab filter would drop
    pub include_system_tabs: bool,

    /// Use `[<field name>]` as the placeholder of tabs without a value
    pub show_field_names: bool,

    /// Height of the white band painted over the top of every page
    pub mask_header_height: Option<f64>,

    /// Height of the white band painted over the bottom of every page
    pub mask_footer_height: Option<f64>,

    /// Default width for text-like fields
    pub field_width: Option<f64>,

    /// Default height for text-like fields
    pub field_height: Option<f64>,

    /// Place a plain text field for tabs the dispatcher rejects
    pub text_fallback: bool,

    /// Decode source documents in parallel
    pub parallel: bool,

    /// Per-kind default and minimum sizes
    pub field_sizes: FieldSizes,

    /// Field kinds excluded from translation
    #[serde(rename = "disabledKinds")]
    pub registry: FieldRegistry,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Keep or drop system tabs.
    pub fn with_system_tabs(mut self, include: bool) -> Self {
        self.include_system_tabs = include;
        self
    }

    /// Show generated field names as placeholders.
    pub fn with_field_names(mut self, show: bool) -> Self {
        self.show_field_names = show;
        self
    }

    /// Mask the top of every page.
    pub fn with_header_mask(mut self, height: f64) -> Self {
        self.mask_header_height = Some(height);
        self
    }

    /// Mask the bottom of every page.
    pub fn with_footer_mask(mut self, height: f64) -> Self {
        self.mask_footer_height = Some(height);
        self
    }

    /// Override the default text-field size.
    pub fn with_field_size(mut self, width: Option<f64>, height: Option<f64>) -> Self {
        self.field_width = width;
        self.field_height = height;
        self
    }

    /// Replace the per-kind size table.
    pub fn with_field_sizes(mut self, sizes: FieldSizes) -> Self {
        self.field_sizes = sizes;
        self
    }

    /// Enable or disable the plain text fallback for rejected tabs.
    pub fn with_text_fallback(mut self, enabled: bool) -> Self {
        self.text_fallback = enabled;
        self
    }

    /// Enable or disable parallel document decoding.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Exclude a field kind from translation.
    pub fn disable(mut self, kind: FieldKind) -> Self {
        self.registry.set_enabled(kind, false);
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            include_system_tabs: false,
            show_field_names: false,
            mask_header_height: None,
            mask_footer_height: None,
            field_width: None,
            field_height: None,
            text_fallback: true,
            parallel: true,
            field_sizes: FieldSizes::default(),
            registry: FieldRegistry::new(),
        }
    }
}
