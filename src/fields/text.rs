//! Text-family fields: plain text and the auto-populated kinds.

use super::{Attempt, FieldTier, Request, TranslateOutcome, Translator, TEXT_FONT_SIZE};
use crate::error::Result;
use crate::model::FieldKind;
use crate::pdf::TextFieldSpec;

/// Date format used to pre-fill `dateSigned` fields.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Placeholder for a text-family field without a value.
pub fn placeholder(kind: FieldKind) -> String {
    match kind {
        FieldKind::FullName => "[FULL NAME]".to_string(),
        FieldKind::DateSigned => chrono::Local::now().format(DATE_FORMAT).to_string(),
        FieldKind::Company => "[COMPANY]".to_string(),
        FieldKind::Title => "[TITLE]".to_string(),
        FieldKind::EmailAddress => "[EMAIL]".to_string(),
        FieldKind::Numerical => "[NUMBER]".to_string(),
        FieldKind::SignerAttachment => "[Attachment File Name]".to_string(),
        _ => "[TEXT]".to_string(),
    }
}

impl<'a> Translator<'a> {
    pub(super) fn build_text(&mut self, request: &Request<'_>) -> TranslateOutcome {
        let attempts: [(FieldTier, Attempt<'a>); 1] = [(FieldTier::Specialized, Self::text_field)];
        self.first_success(request, &attempts)
    }

    /// Single-line text field at the tab's rectangle.
    pub(super) fn text_field(&mut self, request: &Request<'_>) -> Result<()> {
        let attributes = self.attributes(request, request.base_name());
        let value = self.display_value(request, &attributes.name, || placeholder(request.kind));
        let spec = TextFieldSpec {
            attributes,
            rect: request.placement.rect,
            value: Some(value),
            font_size: TEXT_FONT_SIZE,
            style: None,
        };
        self.backend.add_text_field(request.placement.page_index, &spec)
    }
}
