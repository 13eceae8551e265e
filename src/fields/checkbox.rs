//! Checkbox fields.

use super::{Attempt, FieldTier, Request, TranslateOutcome, Translator};
use crate::error::Result;
use crate::pdf::CheckboxSpec;

pub const CHECKED_TEXT: &str = "[✓]";
pub const UNCHECKED_TEXT: &str = "[ ]";

impl<'a> Translator<'a> {
    pub(super) fn build_checkbox(&mut self, request: &Request<'_>) -> TranslateOutcome {
        let attempts: [(FieldTier, Attempt<'a>); 2] = [
            (FieldTier::Specialized, Self::checkbox_field),
            (FieldTier::PlainFallback, Self::checkbox_text),
        ];
        self.first_success(request, &attempts)
    }

    fn checkbox_field(&mut self, request: &Request<'_>) -> Result<()> {
        let min = self.sizes.checkbox;
        let spec = CheckboxSpec {
            attributes: self.attributes(request, request.base_name()),
            // Widgets share one /Rect convention, so no anchor offset applies.
            rect: request.placement.rect.with_min_size(min.width, min.height),
            checked: request.tab.is_selected(),
        };
        self.backend.add_checkbox(request.placement.page_index, &spec)
    }

    fn checkbox_text(&mut self, request: &Request<'_>) -> Result<()> {
        let text = if request.tab.is_selected() {
            CHECKED_TEXT
        } else {
            UNCHECKED_TEXT
        };
        self.plain_text(request, request.base_name(), text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::tests::{mapping, placed, placement, MockBackend, Recorded};
    use crate::fields::FieldRegistry;
    use crate::geometry::FieldSizes;
    use crate::model::{FieldKind, Rectangle};

    #[test]
    fn test_selected_checkbox() {
        let mut backend = MockBackend::with_pages(1);
        let registry = FieldRegistry::new();
        let mapping = mapping(1);
        let mut translator = Translator::new(&mut backend, &registry, FieldSizes::default());

        let mut tab = placed("Checkbox");
        tab.selected = Some("true".into());
        let rect = Rectangle::new(50.0, 738.0, 54.0, 742.0);
        let outcome = translator.translate(FieldKind::Checkbox, &tab, &placement(&mapping, rect));
        assert_eq!(outcome, Ok(FieldTier::Specialized));

        match &backend.fields[0] {
            Recorded::Checkbox(_, spec) => {
                assert!(spec.checked);
                assert_eq!(spec.rect, Rectangle::new(50.0, 730.0, 62.0, 742.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unchecked_by_default() {
        let mut backend = MockBackend::with_pages(1);
        let registry = FieldRegistry::new();
        let mapping = mapping(1);
        let mut translator = Translator::new(&mut backend, &registry, FieldSizes::default());
        let rect = Rectangle::new(50.0, 730.0, 62.0, 742.0);
        translator
            .translate(FieldKind::Checkbox, &placed("Checkbox"), &placement(&mapping, rect))
            .unwrap();
        assert!(matches!(&backend.fields[0], Recorded::Checkbox(_, spec) if !spec.checked));
    }

    #[test]
    fn test_text_fallback_shows_state() {
        let mut backend = MockBackend::with_pages(1).failing("checkbox", 1);
        let registry = FieldRegistry::new();
        let mapping = mapping(1);
        let mut translator = Translator::new(&mut backend, &registry, FieldSizes::default());

        let tab = placed("Checkbox").with_selected(true);
        let rect = Rectangle::new(50.0, 730.0, 62.0, 742.0);
        let outcome = translator.translate(FieldKind::Checkbox, &tab, &placement(&mapping, rect));
        assert_eq!(outcome, Ok(FieldTier::PlainFallback));
        assert!(matches!(
            &backend.fields[0],
            Recorded::Text(_, spec) if spec.value.as_deref() == Some(CHECKED_TEXT)
        ));
    }
}
