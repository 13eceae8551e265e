//! Template loading: JSON parsing, document decoding and tab collection.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lopdf::Document;
use rayon::prelude::*;

use crate::classify::classify_with_hint;
use crate::detect::{detect_format_from_bytes, PdfFormat};
use crate::error::{Error, Result};
use crate::model::{FieldKind, Tab, TemplateDocument, TemplateExport};
use crate::pdf::SourceDocument;

/// Role name reported for tabs from the legacy `recipientTabs` list.
pub const LEGACY_ROLE: &str = "recipientTabs";

/// Parse a template export from JSON text.
///
/// Fails when the text is not JSON, does not have the template shape, or
/// carries no documents.
pub fn parse_template(json: &str) -> Result<TemplateExport> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    parse_template_value(value)
}

/// Parse a template export from an already-parsed JSON value.
pub fn parse_template_value(value: serde_json::Value) -> Result<TemplateExport> {
    if !value.is_object() {
        return Err(Error::InvalidTemplate("expected a JSON object".into()));
    }
    let template: TemplateExport = serde_json::from_value(value)
        .map_err(|e| Error::InvalidTemplate(e.to_string()))?;
    validate(&template)?;
    Ok(template)
}

/// Top-level shape checks.
pub fn validate(template: &TemplateExport) -> Result<()> {
    if template.documents.is_empty() {
        return Err(Error::NoDocuments);
    }
    Ok(())
}

/// A source document decoded and loaded, ready to merge.
#[derive(Debug)]
pub struct DecodedDocument {
    pub document_id: String,
    pub name: Option<String>,
    pub format: PdfFormat,
    pub pdf: Document,
}

impl From<DecodedDocument> for SourceDocument {
    fn from(doc: DecodedDocument) -> Self {
        SourceDocument::new(doc.document_id, doc.pdf)
    }
}

/// A document that could not be decoded.
#[derive(Debug)]
pub struct DocumentFailure {
    pub document_id: String,
    pub error: Error,
}

/// Result of decoding every document of a template.
#[derive(Debug)]
pub struct DecodedSet {
    /// Successfully decoded documents, in template order.
    pub documents: Vec<DecodedDocument>,
    pub failures: Vec<DocumentFailure>,
}

/// Decode raw base64 text, tolerating a `data:` URL prefix and line breaks.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>> {
    let body = match payload.find("base64,") {
        Some(pos) if payload.starts_with("data:") => &payload[pos + "base64,".len()..],
        _ => payload,
    };
    let cleaned: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(STANDARD.decode(cleaned)?)
}

/// Decode and load one document.
pub fn decode_document(document: &TemplateDocument, index: usize) -> Result<DecodedDocument> {
    let document_id = document.id_key(index);
    let payload = document.base64_payload().ok_or_else(|| {
        Error::InvalidTemplate(format!("document {} has no base64 content", document_id))
    })?;

    let bytes = decode_base64(payload)?;
    let format = detect_format_from_bytes(&bytes)?;
    let pdf = Document::load_mem(&bytes[format.header_offset..])?;

    Ok(DecodedDocument {
        document_id,
        name: document.name.clone(),
        format,
        pdf,
    })
}

/// Decode every document; documents that fail are skipped and reported.
///
/// Fails only when the template has no documents, or none could be decoded.
pub fn decode_documents(template: &TemplateExport, parallel: bool) -> Result<DecodedSet> {
    validate(template)?;

    let results: Vec<(String, Result<DecodedDocument>)> = if parallel {
        template
            .documents
            .par_iter()
            .enumerate()
            .map(|(index, doc)| (doc.id_key(index), decode_document(doc, index)))
            .collect()
    } else {
        template
            .documents
            .iter()
            .enumerate()
            .map(|(index, doc)| (doc.id_key(index), decode_document(doc, index)))
            .collect()
    };

    let mut documents = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (document_id, result) in results {
        match result {
            Ok(doc) => {
                log::debug!(
                    "Decoded document '{}' ({}, {} pages)",
                    doc.document_id,
                    doc.format,
                    doc.pdf.get_pages().len()
                );
                documents.push(doc);
            }
            Err(error) => {
                log::warn!("Skipping document '{}': {}", document_id, error);
                failures.push(DocumentFailure { document_id, error });
            }
        }
    }

    if documents.is_empty() {
        return Err(Error::NoDecodableDocuments(failures.len()));
    }
    Ok(DecodedSet { documents, failures })
}

/// A tab together with where it was found.
#[derive(Debug, Clone, Copy)]
pub struct TabRecord<'t> {
    pub tab: &'t Tab,
    /// Name of the list holding the tab (`signHereTabs`, ...).
    pub list_name: &'t str,
    /// Recipient role (`signers`, ...) or [`LEGACY_ROLE`].
    pub role: &'static str,
}

impl TabRecord<'_> {
    pub fn kind(&self) -> FieldKind {
        classify_with_hint(self.tab, self.list_name)
    }
}

/// Every tab of the template: recipients role by role, then the legacy
/// `recipientTabs` lists.
pub fn collect_tabs(template: &TemplateExport) -> Vec<TabRecord<'_>> {
    let mut records = Vec::new();

    if let Some(recipients) = &template.recipients {
        for (role, members) in recipients.by_role() {
            for recipient in members {
                for (list_name, tabs) in &recipient.tabs {
                    records.extend(tabs.iter().map(|tab| TabRecord {
                        tab,
                        list_name,
                        role,
                    }));
                }
            }
        }
    }

    for lists in &template.recipient_tabs {
        for (list_name, tabs) in lists {
            records.extend(tabs.iter().map(|tab| TabRecord {
                tab,
                list_name,
                role: LEGACY_ROLE,
            }));
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"{
        "documents": [{"documentId": "1", "documentBase64": "bm90IGEgcGRm"}],
        "recipients": {
            "signers": [{"tabs": {
                "signHereTabs": [{"documentId": "1", "pageNumber": "1", "tabLabel": "Sig"}],
                "textTabs": [{"tabType": "text", "documentId": "1"}],
                "envelopeId": "ignored"
            }}],
            "witnesses": [{"tabs": {"dateSignedTabs": [{"documentId": 1}]}}]
        },
        "recipientTabs": [{"checkboxTabs": [{"tabType": "Checkbox"}]}, "junk"]
    }"#;

    #[test]
    fn test_parse_and_collect() {
        let template = parse_template(TEMPLATE).unwrap();
        let tabs = collect_tabs(&template);
        assert_eq!(tabs.len(), 4);

        let kinds: Vec<FieldKind> = tabs.iter().map(TabRecord::kind).collect();
        assert_eq!(
            kinds,
            [
                FieldKind::SignHere,
                FieldKind::Text,
                FieldKind::DateSigned,
                FieldKind::Checkbox
            ]
        );
        assert_eq!(tabs[2].role, "witnesses");
        assert_eq!(tabs[3].role, LEGACY_ROLE);
    }

    #[test]
    fn test_no_documents() {
        assert!(matches!(
            parse_template(r#"{"documents": []}"#),
            Err(Error::NoDocuments)
        ));
        assert!(matches!(parse_template("{}"), Err(Error::NoDocuments)));
    }

    #[test]
    fn test_malformed_shape() {
        assert!(matches!(parse_template("[1, 2]"), Err(Error::InvalidTemplate(_))));
        assert!(matches!(
            parse_template(r#"{"documents": "nope"}"#),
            Err(Error::InvalidTemplate(_))
        ));
        assert!(matches!(parse_template("not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_decode_base64_variants() {
        assert_eq!(decode_base64("aGVs\nbG8=").unwrap(), b"hello");
        assert_eq!(
            decode_base64("data:application/pdf;base64,aGVsbG8=").unwrap(),
            b"hello"
        );
        assert!(matches!(decode_base64("***"), Err(Error::Base64(_))));
    }

    #[test]
    fn test_undecodable_documents() {
        let template = parse_template(TEMPLATE).unwrap();
        let err = decode_documents(&template, false).unwrap_err();
        assert!(matches!(err, Error::NoDecodableDocuments(1)));
    }

    #[test]
    fn test_missing_payload() {
        let doc = TemplateDocument::default();
        let err = decode_document(&doc, 2).unwrap_err();
        assert!(err.to_string().contains("document 3"));
    }
}
