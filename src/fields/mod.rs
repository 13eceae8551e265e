//! Field translation: from a classified tab to an interactive field.
//!
//! The [`Translator`] dispatches on [`FieldKind`] to a per-kind policy.
//! Every policy is an ordered list of construction attempts; the first one
//! that succeeds wins and reports its [`FieldTier`]. A tab the dispatcher
//! refuses is reported as a [`Rejection`] so the caller can decide whether
//! to place a plain text field instead.

mod checkbox;
mod list;
pub mod naming;
mod radio;
pub mod registry;
mod signature;
mod text;

use std::fmt;

use serde::Serialize;

pub use naming::{sanitize, FieldNamer, MAX_NAME_LEN};
pub use registry::FieldRegistry;

use crate::error::Result;
use crate::geometry::FieldSizes;
use crate::model::{FieldKind, PageSize, Rectangle, Tab};
use crate::pdf::{FieldAttributes, FormBackend, PageMapping, TextFieldSpec};

/// Font size for text-like fields.
pub const TEXT_FONT_SIZE: f64 = 10.0;

/// How a field ended up being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldTier {
    /// The semantically correct field type.
    Specialized,
    /// A styled text field standing in for the specialized type.
    StyledFallback,
    /// An unstyled text field with a fixed placeholder.
    PlainFallback,
}

impl fmt::Display for FieldTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldTier::Specialized => "specialized",
            FieldTier::StyledFallback => "styled fallback",
            FieldTier::PlainFallback => "plain fallback",
        })
    }
}

/// Why the dispatcher did not build a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "reason", content = "detail", rename_all = "camelCase")]
pub enum Rejection {
    #[error("field kind {0} is disabled")]
    Disabled(FieldKind),

    #[error("no translator for field kind {0}")]
    Unsupported(FieldKind),

    #[error("invalid tab: {0}")]
    Invalid(&'static str),

    #[error("every construction attempt failed")]
    Exhausted,
}

/// Result of translating one tab.
pub type TranslateOutcome = std::result::Result<FieldTier, Rejection>;

/// Where a tab lands in the output document.
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    /// Page range of the tab's source document.
    pub mapping: &'a PageMapping,
    /// Zero-based page index in the output document.
    pub page_index: usize,
    pub page: PageSize,
    /// Rectangle computed from the tab's own coordinates.
    pub rect: Rectangle,
}

/// One translation in progress.
pub(crate) struct Request<'r> {
    kind: FieldKind,
    tab: &'r Tab,
    placement: &'r Placement<'r>,
}

impl Request<'_> {
    /// Base for generated names: the label, else the kind.
    fn base_name(&self) -> &str {
        self.tab.label().unwrap_or(self.kind.as_str())
    }
}

type Attempt<'a> = fn(&mut Translator<'a>, &Request<'_>) -> Result<()>;

/// Builds fields for one conversion.
pub struct Translator<'a> {
    backend: &'a mut dyn FormBackend,
    registry: &'a FieldRegistry,
    sizes: FieldSizes,
    show_field_names: bool,
    namer: FieldNamer,
}

impl<'a> Translator<'a> {
    pub fn new(backend: &'a mut dyn FormBackend, registry: &'a FieldRegistry, sizes: FieldSizes) -> Self {
        Self {
            backend,
            registry,
            sizes,
            show_field_names: false,
            namer: FieldNamer::new(),
        }
    }

    /// Use `[<field name>]` as the placeholder of tabs without a value.
    pub fn with_field_names(mut self, show: bool) -> Self {
        self.show_field_names = show;
        self
    }

    pub fn backend(&mut self) -> &mut dyn FormBackend {
        &mut *self.backend
    }

    /// Build the field for a classified tab.
    pub fn translate(&mut self, kind: FieldKind, tab: &Tab, placement: &Placement<'_>) -> TranslateOutcome {
        if kind == FieldKind::Unknown {
            return Err(Rejection::Unsupported(kind));
        }
        if !self.registry.is_enabled(kind) {
            return Err(Rejection::Disabled(kind));
        }
        validate(kind, tab)?;

        let request = Request { kind, tab, placement };
        match kind {
            FieldKind::SignHere | FieldKind::InitialHere | FieldKind::Stamp => {
                self.build_signature(&request)
            }
            FieldKind::Checkbox => self.build_checkbox(&request),
            FieldKind::RadioGroup => self.build_radio_group(&request),
            FieldKind::List => self.build_dropdown(&request),
            _ => self.build_text(&request),
        }
    }

    /// Plain text field for a tab the dispatcher rejected.
    pub fn fallback_text(&mut self, tab: &Tab, placement: &Placement<'_>) -> Result<()> {
        let request = Request {
            kind: FieldKind::Text,
            tab,
            placement,
        };
        self.text_field(&request)
    }

    /// Run construction attempts in order; the first success wins.
    fn first_success(&mut self, request: &Request<'_>, attempts: &[(FieldTier, Attempt<'a>)]) -> TranslateOutcome {
        for &(tier, attempt) in attempts {
            match attempt(self, request) {
                Ok(()) => {
                    if tier != FieldTier::Specialized {
                        log::warn!(
                            "Tab {} ({}) placed as {}",
                            request.tab.display_id(),
                            request.kind,
                            tier
                        );
                    }
                    return Ok(tier);
                }
                Err(e) => log::warn!(
                    "Tab {} ({}): {} construction failed: {}",
                    request.tab.display_id(),
                    request.kind,
                    tier,
                    e
                ),
            }
        }
        Err(Rejection::Exhausted)
    }

    fn attributes(&mut self, request: &Request<'_>, base: &str) -> FieldAttributes {
        FieldAttributes {
            name: self.namer.generate(base),
            tooltip: request.tab.tooltip().map(str::to_string),
            required: request.tab.is_required(),
            read_only: request.tab.is_locked(),
        }
    }

    /// The tab's own value, else `[<name>]` when field names are shown,
    /// else the given placeholder.
    fn display_value(&self, request: &Request<'_>, name: &str, placeholder: impl FnOnce() -> String) -> String {
        request.tab.explicit_value().unwrap_or_else(|| {
            if self.show_field_names {
                format!("[{}]", name)
            } else {
                placeholder()
            }
        })
    }

    /// Unstyled text field carrying fixed text, under a fresh name.
    fn plain_text(&mut self, request: &Request<'_>, base: &str, text: &str) -> Result<()> {
        let spec = TextFieldSpec {
            attributes: self.attributes(request, base),
            rect: request.placement.rect,
            value: Some(text.to_string()),
            font_size: TEXT_FONT_SIZE,
            style: None,
        };
        self.backend
            .add_text_field(request.placement.page_index, &spec)
    }
}

/// Structural checks run before dispatch.
pub fn validate(kind: FieldKind, tab: &Tab) -> std::result::Result<(), Rejection> {
    match kind {
        FieldKind::RadioGroup => {
            if tab.group_name().is_none() {
                return Err(Rejection::Invalid("radio group without groupName"));
            }
            if tab.radios.is_empty() {
                return Err(Rejection::Invalid("radio group without radios"));
            }
            // Buttons carry their own placement.
            return Ok(());
        }
        FieldKind::List if tab.list_items.is_empty() => {
            return Err(Rejection::Invalid("list without listItems"));
        }
        kind if kind.is_signature_family() && tab.label().is_none() => {
            return Err(Rejection::Invalid("signature field without name or label"));
        }
        _ => {}
    }

    if !tab.has_page_number() {
        return Err(Rejection::Invalid("missing pageNumber"));
    }
    if !tab.x_position().is_present() || !tab.y_position().is_present() {
        return Err(Rejection::Invalid("missing position"));
    }
    Ok(())
}
