//! Fallback behaviour against a backend that refuses some field types.

use docuform::error::{Error, Result};
use docuform::pdf::{
    CheckboxSpec, DropdownSpec, FormBackend, PageTable, RadioGroupSpec, Rgb, SignatureFieldSpec,
    TextFieldSpec,
};
use docuform::{
    parse_template, ConvertOptions, FieldCategory, FieldTier, PageSize, Rectangle, Rejection,
    TabOutcome, TemplateConverter,
};

/// Records text fields; every other field type fails.
#[derive(Default)]
struct TextOnlyBackend {
    pages: usize,
    text_fields: Vec<TextFieldSpec>,
    refuse_text: bool,
}

impl TextOnlyBackend {
    fn new(pages: usize) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    fn refusing_everything(pages: usize) -> Self {
        Self {
            pages,
            refuse_text: true,
            ..Default::default()
        }
    }
}

fn refuse(what: &str) -> Result<()> {
    Err(Error::Unsupported(format!("{} not available", what)))
}

impl FormBackend for TextOnlyBackend {
    fn page_count(&self) -> usize {
        self.pages
    }

    fn page_size(&self, page_index: usize) -> Result<PageSize> {
        if page_index >= self.pages {
            return Err(Error::PageOutOfRange(page_index, self.pages));
        }
        Ok(PageSize::letter())
    }

    fn add_text_field(&mut self, _page_index: usize, spec: &TextFieldSpec) -> Result<()> {
        if self.refuse_text {
            return refuse("text");
        }
        self.text_fields.push(spec.clone());
        Ok(())
    }

    fn add_signature_field(&mut self, _: usize, _: &SignatureFieldSpec) -> Result<()> {
        refuse("signature")
    }

    fn add_checkbox(&mut self, _: usize, _: &CheckboxSpec) -> Result<()> {
        refuse("checkbox")
    }

    fn add_radio_group(&mut self, _: &RadioGroupSpec) -> Result<()> {
        refuse("radio")
    }

    fn add_dropdown(&mut self, _: usize, _: &DropdownSpec) -> Result<()> {
        refuse("dropdown")
    }

    fn fill_rect(&mut self, _: usize, _: &Rectangle, _: Rgb) -> Result<()> {
        refuse("fill")
    }
}

const TEMPLATE: &str = r#"{
    "documents": [{ "documentId": "1" }],
    "recipients": {
        "signers": [{
            "recipientId": "1",
            "tabs": {
                "signHereTabs": [{ "tabLabel": "Sign", "documentId": "1", "pageNumber": "1",
                                   "xPosition": "100", "yPosition": "100" }],
                "checkboxTabs": [{ "tabLabel": "Agree", "documentId": "1", "pageNumber": "1",
                                   "xPosition": "100", "yPosition": "200", "selected": "true" }],
                "listTabs": [{ "tabLabel": "Pick", "documentId": "1", "pageNumber": "1",
                               "xPosition": "100", "yPosition": "300",
                               "listItems": [{ "text": "A", "value": "a", "selected": "true" }] }]
            }
        }]
    }
}"#;

fn table() -> PageTable {
    let mut table = PageTable::new();
    table.push("1", 1);
    table
}

fn outcome_of<'r>(reports: &'r [docuform::TabReport], list: &str) -> &'r TabOutcome {
    &reports.iter().find(|r| r.list_name == list).unwrap().outcome
}

#[test]
fn test_fallback_tiers_when_specialized_fields_fail() {
    let template = parse_template(TEMPLATE).unwrap();
    let converter = TemplateConverter::new(ConvertOptions::default());
    let mut backend = TextOnlyBackend::new(1);

    let (counters, reports) = converter.place_fields(&mut backend, &table(), &template);

    assert_eq!(
        outcome_of(&reports, "signHereTabs"),
        &TabOutcome::Placed {
            tier: FieldTier::StyledFallback
        }
    );
    assert_eq!(
        outcome_of(&reports, "checkboxTabs"),
        &TabOutcome::Placed {
            tier: FieldTier::PlainFallback
        }
    );
    assert_eq!(
        outcome_of(&reports, "listTabs"),
        &TabOutcome::Placed {
            tier: FieldTier::PlainFallback
        }
    );

    // Fallback tiers still count under the tab's own kind.
    assert_eq!(counters.get(FieldCategory::Signature), 1);
    assert_eq!(counters.get(FieldCategory::Checkbox), 1);
    assert_eq!(counters.get(FieldCategory::Dropdown), 1);

    let signature = backend
        .text_fields
        .iter()
        .find(|f| f.value.as_deref() == Some("[SIGN HERE]"))
        .expect("styled signature fallback");
    assert!(signature.attributes.required);
    assert!(signature.style.is_some());
    assert!(signature.attributes.name.starts_with("Sign_"));

    let values: Vec<_> = backend
        .text_fields
        .iter()
        .filter_map(|f| f.value.as_deref())
        .collect();
    assert!(values.contains(&"[✓]"));
    assert!(values.contains(&"A"));
}

#[test]
fn test_exhausted_chain_is_rejected() {
    let template = parse_template(TEMPLATE).unwrap();
    let converter = TemplateConverter::new(ConvertOptions::default());
    let mut backend = TextOnlyBackend::refusing_everything(1);

    let (counters, reports) = converter.place_fields(&mut backend, &table(), &template);

    assert_eq!(reports.len(), 3);
    for report in &reports {
        assert_eq!(
            report.outcome,
            TabOutcome::Rejected {
                rejection: Rejection::Exhausted
            }
        );
    }
    assert_eq!(counters.other, 3);
    assert_eq!(counters.total(), 3);
}

#[test]
fn test_tabs_on_missing_pages_never_reach_the_backend() {
    let template = parse_template(TEMPLATE).unwrap();
    let converter = TemplateConverter::new(ConvertOptions::default());
    let mut backend = TextOnlyBackend::new(0);

    let (counters, reports) = converter.place_fields(&mut backend, &table(), &template);

    assert!(backend.text_fields.is_empty());
    assert_eq!(counters.total(), 0);
    assert!(reports
        .iter()
        .all(|r| matches!(r.outcome, TabOutcome::Skipped { .. })));
}
