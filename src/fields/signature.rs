//! Signature-family fields: sign here, initial here and stamp.
//!
//! Built as unsigned `/Sig` placeholders. If that fails the tab degrades to
//! a styled, required text field, then to a bare text field.

use super::{Attempt, FieldTier, Request, TranslateOutcome, Translator, TEXT_FONT_SIZE};
use crate::error::Result;
use crate::model::FieldKind;
use crate::pdf::{SignatureFieldSpec, TextFieldSpec, WidgetStyle};

pub const SIGNATURE_FONT_SIZE: f64 = 12.0;
pub const INITIALS_FONT_SIZE: f64 = 10.0;

pub const SIGNATURE_REQUIRED: &str = "[Signature Required]";

fn styled_placeholder(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::InitialHere => "[INITIAL HERE]",
        FieldKind::Stamp => "[STAMP HERE]",
        _ => "[SIGN HERE]",
    }
}

impl<'a> Translator<'a> {
    pub(super) fn build_signature(&mut self, request: &Request<'_>) -> TranslateOutcome {
        let attempts: [(FieldTier, Attempt<'a>); 3] = [
            (FieldTier::Specialized, Self::signature_field),
            (FieldTier::StyledFallback, Self::styled_signature_text),
            (FieldTier::PlainFallback, Self::plain_signature_text),
        ];
        self.first_success(request, &attempts)
    }

    /// The tab's rectangle grown to the kind's minimum usable size.
    fn signature_rect(&self, request: &Request<'_>) -> crate::model::Rectangle {
        let rect = request.placement.rect;
        match self.sizes.minimum_for(request.kind) {
            Some(min) => rect.with_min_size(min.width, min.height),
            None => rect,
        }
    }

    fn signature_field(&mut self, request: &Request<'_>) -> Result<()> {
        let font_size = if request.kind == FieldKind::InitialHere {
            INITIALS_FONT_SIZE
        } else {
            SIGNATURE_FONT_SIZE
        };
        let spec = SignatureFieldSpec {
            attributes: self.attributes(request, request.base_name()),
            rect: self.signature_rect(request),
            font_size,
            style: WidgetStyle::placeholder(),
        };
        self.backend
            .add_signature_field(request.placement.page_index, &spec)
    }

    fn styled_signature_text(&mut self, request: &Request<'_>) -> Result<()> {
        let mut attributes = self.attributes(request, request.base_name());
        attributes.required = true;
        let spec = TextFieldSpec {
            attributes,
            rect: self.signature_rect(request),
            value: Some(styled_placeholder(request.kind).to_string()),
            font_size: TEXT_FONT_SIZE,
            style: Some(WidgetStyle::placeholder()),
        };
        self.backend.add_text_field(request.placement.page_index, &spec)
    }

    fn plain_signature_text(&mut self, request: &Request<'_>) -> Result<()> {
        self.plain_text(request, "signature", SIGNATURE_REQUIRED)
    }
}
