//! Dropdown (single-select list) fields.

use super::{Attempt, FieldTier, Request, TranslateOutcome, Translator, TEXT_FONT_SIZE};
use crate::error::{Error, Result};
use crate::model::Tab;
use crate::pdf::DropdownSpec;

const LIST_PLACEHOLDER: &str = "[SELECT]";

/// `(label, export value)` pairs plus the initial selection.
///
/// An explicit tab value overrides item-level selection; it may name
/// either an option's label or its value.
fn options_of(tab: &Tab) -> (Vec<(String, String)>, Option<String>) {
    let options: Vec<(String, String)> = tab
        .list_items
        .iter()
        .filter_map(|item| Some((item.label()?, item.export_value()?)))
        .collect();

    let selected = match tab.explicit_value() {
        Some(explicit) => Some(
            options
                .iter()
                .find(|(label, _)| *label == explicit)
                .map(|(_, value)| value.clone())
                .unwrap_or(explicit),
        ),
        None => tab
            .list_items
            .iter()
            .find(|item| item.is_selected())
            .and_then(|item| item.export_value()),
    };
    (options, selected)
}

impl<'a> Translator<'a> {
    pub(super) fn build_dropdown(&mut self, request: &Request<'_>) -> TranslateOutcome {
        let attempts: [(FieldTier, Attempt<'a>); 2] = [
            (FieldTier::Specialized, Self::dropdown_field),
            (FieldTier::PlainFallback, Self::dropdown_text),
        ];
        self.first_success(request, &attempts)
    }

    fn dropdown_field(&mut self, request: &Request<'_>) -> Result<()> {
        let (options, selected) = options_of(request.tab);
        if options.is_empty() {
            return Err(Error::Unsupported("list without usable items".into()));
        }
        let spec = DropdownSpec {
            attributes: self.attributes(request, request.base_name()),
            rect: request.placement.rect,
            options,
            selected,
            font_size: TEXT_FONT_SIZE,
        };
        self.backend.add_dropdown(request.placement.page_index, &spec)
    }

    fn dropdown_text(&mut self, request: &Request<'_>) -> Result<()> {
        let (options, selected) = options_of(request.tab);
        let text = selected
            .and_then(|value| {
                options
                    .into_iter()
                    .find(|(_, v)| *v == value)
                    .map(|(label, _)| label)
                    .or(Some(value))
            })
            .unwrap_or_else(|| LIST_PLACEHOLDER.to_string());
        self.plain_text(request, request.base_name(), &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::tests::{mapping, placed, placement, rect, MockBackend, Recorded};
    use crate::fields::FieldRegistry;
    use crate::geometry::FieldSizes;
    use crate::model::{FieldKind, ListItem};

    fn list_tab() -> Tab {
        let mut tab = placed("List");
        tab.list_items = vec![
            ListItem::new("California", "CA"),
            ListItem::new("Nevada", "NV").with_selected(true),
        ];
        tab
    }

    #[test]
    fn test_item_selection() {
        let (options, selected) = options_of(&list_tab());
        assert_eq!(options.len(), 2);
        assert_eq!(options[0], ("California".to_string(), "CA".to_string()));
        assert_eq!(selected.as_deref(), Some("NV"));
    }

    #[test]
    fn test_explicit_value_overrides_items() {
        let (_, selected) = options_of(&list_tab().with_value("California"));
        assert_eq!(selected.as_deref(), Some("CA"));
        let (_, selected) = options_of(&list_tab().with_value("CA"));
        assert_eq!(selected.as_deref(), Some("CA"));
    }

    #[test]
    fn test_dropdown_built() {
        let mut backend = MockBackend::with_pages(1);
        let registry = FieldRegistry::new();
        let mapping = mapping(1);
        let mut translator = Translator::new(&mut backend, &registry, FieldSizes::default());
        let outcome = translator.translate(FieldKind::List, &list_tab(), &placement(&mapping, rect()));
        assert_eq!(outcome, Ok(FieldTier::Specialized));
        assert!(matches!(&backend.fields[0], Recorded::Dropdown(0, spec) if spec.options.len() == 2));
    }

    #[test]
    fn test_fallback_shows_selected_label() {
        let mut backend = MockBackend::with_pages(1).failing("dropdown", 1);
        let registry = FieldRegistry::new();
        let mapping = mapping(1);
        let mut translator = Translator::new(&mut backend, &registry, FieldSizes::default());
        let outcome = translator.translate(FieldKind::List, &list_tab(), &placement(&mapping, rect()));
        assert_eq!(outcome, Ok(FieldTier::PlainFallback));
        assert!(matches!(
            &backend.fields[0],
            Recorded::Text(_, spec) if spec.value.as_deref() == Some("Nevada")
        ));
    }
}
