//! End-to-end tests: template JSON in, fillable PDF out.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use serde_json::{json, Value};

use docuform::{
    convert_json, convert_json_with_options, ConvertOptions, Docuform, Error, FieldKind,
    SkipReason, TabOutcome,
};

/// Build a Letter-size PDF whose pages each carry one line of text.
fn sample_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let kids: Vec<Object> = (0..page_count)
        .map(|i| {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), Object::Integer(12)]),
                    Operation::new("Td", vec![Object::Integer(72), Object::Integer(720)]),
                    Operation::new(
                        "Tj",
                        vec![Object::string_literal(format!("Page {}", i + 1))],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "Resources" => resources_id,
            "MediaBox" => [0, 0, 612, 792].iter().map(|&v| Object::Integer(v)).collect::<Vec<_>>(),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn document(id: &str, pages: usize) -> Value {
    json!({
        "documentId": id,
        "name": format!("Document {}.pdf", id),
        "documentBase64": STANDARD.encode(sample_pdf(pages)),
    })
}

fn template(documents: Vec<Value>, tabs: Value) -> String {
    json!({
        "documents": documents,
        "recipients": {
            "signers": [{ "recipientId": "1", "roleName": "Signer", "tabs": tabs }]
        }
    })
    .to_string()
}

/// The three-tab template used by several tests.
fn basic_template() -> String {
    template(
        vec![document("1", 2)],
        json!({
            "signHereTabs": [{
                "tabLabel": "Signature 1", "documentId": "1", "pageNumber": "1",
                "xPosition": "100", "yPosition": "700"
            }],
            "textTabs": [{
                "tabLabel": "Name", "documentId": "1", "pageNumber": "1",
                "xPosition": "100", "yPosition": "600", "width": "150", "height": "20"
            }],
            "checkboxTabs": [{
                "tabLabel": "Agree", "documentId": "1", "pageNumber": "2",
                "xPosition": "50", "yPosition": "50", "selected": "true"
            }]
        }),
    )
}

fn acroform_fields(pdf: &[u8]) -> (Document, Vec<Dictionary>) {
    let doc = Document::load_mem(pdf).unwrap();
    let root = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
    let catalog = doc.get_dictionary(root).unwrap();
    let acroform = match catalog.get(b"AcroForm").unwrap() {
        Object::Reference(id) => doc.get_dictionary(*id).unwrap().clone(),
        Object::Dictionary(dict) => dict.clone(),
        other => panic!("unexpected AcroForm object: {:?}", other),
    };
    let fields = acroform
        .get(b"Fields")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|r| doc.get_dictionary(r.as_reference().unwrap()).unwrap().clone())
        .collect();
    (doc, fields)
}

fn field_type(field: &Dictionary) -> Vec<u8> {
    field.get(b"FT").unwrap().as_name().unwrap().to_vec()
}

fn field_name(field: &Dictionary) -> String {
    String::from_utf8(field.get(b"T").unwrap().as_str().unwrap().to_vec()).unwrap()
}

#[test]
fn test_convert_basic_template() {
    let result = convert_json(&basic_template()).unwrap();

    assert_eq!(result.page_count(), 2);
    assert_eq!(result.field_count(), 3);
    assert_eq!(result.counters.signature, 1);
    assert_eq!(result.counters.text, 1);
    assert_eq!(result.counters.checkbox, 1);
    assert!(result.skipped_documents.is_empty());

    let (doc, fields) = acroform_fields(&result.pdf);
    assert_eq!(doc.get_pages().len(), 2);
    assert_eq!(fields.len(), 3);

    let checkbox = fields
        .iter()
        .find(|f| field_type(f) == b"Btn")
        .expect("checkbox field");
    assert_eq!(checkbox.get(b"V").unwrap().as_name().unwrap(), b"On");
    assert!(fields.iter().any(|f| field_type(f) == b"Sig"));
    assert!(fields.iter().any(|f| field_type(f) == b"Tx"));
}

#[test]
fn test_checkbox_lands_on_second_page() {
    let result = convert_json(&basic_template()).unwrap();
    let report = result
        .reports
        .iter()
        .find(|r| r.kind == FieldKind::Checkbox)
        .unwrap();
    assert_eq!(report.page_index, Some(1));

    let (doc, _) = acroform_fields(&result.pdf);
    let pages = doc.get_pages();
    let second = doc.get_dictionary(pages[&2]).unwrap();
    let annots = second.get(b"Annots").unwrap().as_array().unwrap();
    assert_eq!(annots.len(), 1);
}

#[test]
fn test_repeated_labels_get_distinct_names() {
    let json = template(
        vec![document("1", 2)],
        json!({
            "textTabs": [
                { "tabLabel": "Date", "documentId": "1", "pageNumber": "1",
                  "xPosition": "100", "yPosition": "100" },
                { "tabLabel": "Date", "documentId": "1", "pageNumber": "2",
                  "xPosition": "100", "yPosition": "100" }
            ]
        }),
    );
    let result = convert_json(&json).unwrap();
    let (_, fields) = acroform_fields(&result.pdf);
    assert_eq!(fields.len(), 2);

    let first = field_name(&fields[0]);
    let second = field_name(&fields[1]);
    assert_ne!(first, second);
    assert!(first.starts_with("Date_"));
    assert!(second.starts_with("Date_"));
    assert!(first.len() <= 60 && second.len() <= 60);
}

#[test]
fn test_system_tabs_filtered_unless_requested() {
    let json = template(
        vec![document("1", 1)],
        json!({
            "textTabs": [
                { "tabLabel": "Visible", "documentId": "1", "pageNumber": "1",
                  "xPosition": "100", "yPosition": "100" },
                { "tabLabel": "Marker", "documentId": "1", "pageNumber": "1",
                  "xPosition": "0", "yPosition": "0", "width": "1", "height": "1" },
                { "tabLabel": "hidden_envelope_id", "documentId": "1", "pageNumber": "1",
                  "xPosition": "200", "yPosition": "200" }
            ]
        }),
    );

    let filtered = convert_json(&json).unwrap();
    assert_eq!(filtered.field_count(), 1);
    assert_eq!(filtered.skipped(SkipReason::SystemTab), 2);

    let kept = Docuform::new().include_system_tabs().convert_json(&json).unwrap();
    assert_eq!(kept.field_count(), 3);
    assert_eq!(kept.skipped(SkipReason::SystemTab), 0);
}

#[test]
fn test_disabled_kind_falls_back_to_text() {
    let options = ConvertOptions::new().disable(FieldKind::Checkbox);
    let result = convert_json_with_options(&basic_template(), options).unwrap();

    assert_eq!(result.counters.checkbox, 0);
    assert_eq!(result.counters.other, 1);
    let report = result
        .reports
        .iter()
        .find(|r| r.kind == FieldKind::Checkbox)
        .unwrap();
    assert!(matches!(report.outcome, TabOutcome::TextFallback { .. }));

    let (_, fields) = acroform_fields(&result.pdf);
    assert_eq!(fields.len(), 3);
    assert_eq!(fields.iter().filter(|f| field_type(f) == b"Tx").count(), 2);
}

#[test]
fn test_disabled_kind_without_fallback_is_dropped() {
    let result = Docuform::new()
        .disable(FieldKind::Checkbox)
        .without_text_fallback()
        .convert_json(&basic_template())
        .unwrap();

    let (_, fields) = acroform_fields(&result.pdf);
    assert_eq!(fields.len(), 2);
    assert!(result
        .reports
        .iter()
        .any(|r| matches!(r.outcome, TabOutcome::Rejected { .. })));
}

#[test]
fn test_undecodable_document_is_skipped() {
    let json = template(
        vec![
            document("1", 1),
            json!({ "documentId": "2", "documentBase64": STANDARD.encode(b"not a pdf") }),
        ],
        json!({
            "textTabs": [
                { "tabLabel": "One", "documentId": "1", "pageNumber": "1",
                  "xPosition": "100", "yPosition": "100" },
                { "tabLabel": "Two", "documentId": "2", "pageNumber": "1",
                  "xPosition": "100", "yPosition": "100" }
            ]
        }),
    );

    let result = Docuform::new().sequential().convert_json(&json).unwrap();
    assert_eq!(result.skipped_documents, vec!["2".to_string()]);
    assert_eq!(result.page_count(), 1);
    assert_eq!(result.field_count(), 1);
    assert_eq!(result.skipped(SkipReason::NoPageMapping), 1);
}

#[test]
fn test_no_decodable_documents_fails() {
    let json = template(
        vec![json!({ "documentId": "1", "documentBase64": "%%%" })],
        json!({}),
    );
    assert!(matches!(
        convert_json(&json),
        Err(Error::NoDecodableDocuments(1))
    ));
}

#[test]
fn test_documents_merge_in_order() {
    let json = template(
        vec![document("10", 2), document("20", 3)],
        json!({
            "textTabs": [{ "tabLabel": "Late", "documentId": "20", "pageNumber": "3",
                           "xPosition": "100", "yPosition": "100" }]
        }),
    );
    let result = convert_json(&json).unwrap();
    assert_eq!(result.page_count(), 5);
    assert_eq!(result.pages[1].start_page_index, 2);
    assert_eq!(result.reports[0].page_index, Some(4));
}

#[test]
fn test_page_out_of_range_is_skipped() {
    let json = template(
        vec![document("1", 1)],
        json!({
            "textTabs": [{ "tabLabel": "Ghost", "documentId": "1", "pageNumber": "4",
                           "xPosition": "100", "yPosition": "100" }]
        }),
    );
    let result = convert_json(&json).unwrap();
    assert_eq!(result.field_count(), 0);
    assert_eq!(result.skipped(SkipReason::PageOutOfRange), 1);
}

#[test]
fn test_radio_group_spans_pages() {
    let json = template(
        vec![document("1", 2)],
        json!({
            "radioGroupTabs": [{
                "groupName": "Plan",
                "documentId": "1",
                "radios": [
                    { "pageNumber": "1", "xPosition": "100", "yPosition": "100", "value": "basic" },
                    { "pageNumber": "2", "xPosition": "100", "yPosition": "100",
                      "value": "premium", "selected": "true" }
                ]
            }]
        }),
    );
    let result = convert_json(&json).unwrap();
    assert_eq!(result.counters.radio, 1);

    let (_, fields) = acroform_fields(&result.pdf);
    assert_eq!(fields.len(), 1);
    let kids = fields[0].get(b"Kids").unwrap().as_array().unwrap();
    assert_eq!(kids.len(), 2);
    assert_eq!(fields[0].get(b"V").unwrap().as_name().unwrap(), b"premium");
}

#[test]
fn test_list_tab_becomes_dropdown() {
    let json = template(
        vec![document("1", 1)],
        json!({
            "listTabs": [{
                "tabLabel": "State", "documentId": "1", "pageNumber": "1",
                "xPosition": "100", "yPosition": "100",
                "listItems": [
                    { "text": "Oregon", "value": "OR" },
                    { "text": "Washington", "value": "WA", "selected": "true" }
                ]
            }]
        }),
    );
    let result = convert_json(&json).unwrap();
    assert_eq!(result.counters.dropdown, 1);

    let (_, fields) = acroform_fields(&result.pdf);
    assert_eq!(field_type(&fields[0]), b"Ch");
    assert_eq!(fields[0].get(b"Opt").unwrap().as_array().unwrap().len(), 2);
}

#[test]
fn test_masks_append_content() {
    let unmasked = convert_json(&basic_template()).unwrap();
    let masked = Docuform::new()
        .mask_header(40.0)
        .mask_footer(30.0)
        .convert_json(&basic_template())
        .unwrap();

    let plain = Document::load_mem(&unmasked.pdf).unwrap();
    let page = plain.get_pages()[&1];
    assert_eq!(plain.get_page_contents(page).len(), 1);

    // q, original content, Q, header band, footer band
    let doc = Document::load_mem(&masked.pdf).unwrap();
    let page = doc.get_pages()[&1];
    assert_eq!(doc.get_page_contents(page).len(), 5);
}

#[test]
fn test_legacy_recipient_tabs() {
    let json = json!({
        "documents": [document("1", 1)],
        "recipientTabs": [{
            "textTabs": [{ "tabLabel": "Legacy", "pageNumber": "1",
                           "xPosition": "100", "yPosition": "100" }]
        }]
    })
    .to_string();

    let result = convert_json(&json).unwrap();
    assert_eq!(result.field_count(), 1);
    assert_eq!(result.reports[0].role, "recipientTabs");
}

#[test]
fn test_convert_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("template.json");
    std::fs::write(&path, basic_template()).unwrap();

    let result = docuform::convert_file(&path).unwrap();
    assert_eq!(result.field_count(), 3);

    let report = docuform::inspect_file(&path).unwrap();
    assert_eq!(report.documents.len(), 1);
    assert_eq!(report.total_tabs, 3);
    assert_eq!(report.roles.get("signers"), Some(&3));
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_convert_file_async() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("template.json");
    std::fs::write(&path, basic_template()).unwrap();

    let result = docuform::convert_file_async(&path, ConvertOptions::default())
        .await
        .unwrap();
    assert_eq!(result.field_count(), 3);
}
