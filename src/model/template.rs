//! Template export root and recipient structure.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::tab::Tab;
use super::value::LooseValue;

/// Tab lists keyed by list name (`signHereTabs`, `textTabs`, ...).
pub type TabLists = BTreeMap<String, Vec<Tab>>;

/// Root of a DocuSign template JSON export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateExport {
    pub documents: Vec<TemplateDocument>,
    pub recipients: Option<Recipients>,
    /// Legacy flat list of tab lists, not tied to a recipient.
    #[serde(deserialize_with = "legacy_tab_lists")]
    pub recipient_tabs: Vec<TabLists>,
}

/// One embedded source document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateDocument {
    pub document_id: Option<LooseValue>,
    pub name: Option<String>,
    pub document_base64: Option<String>,
    pub document_base64_bytes: Option<String>,
}

/// Recipients grouped by role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipients {
    pub signers: Vec<Recipient>,
    pub agents: Vec<Recipient>,
    pub editors: Vec<Recipient>,
    pub in_person_signers: Vec<Recipient>,
    pub witnesses: Vec<Recipient>,
    pub carbon_copies: Vec<Recipient>,
    pub certified_deliveries: Vec<Recipient>,
    pub intermediaries: Vec<Recipient>,
}

/// A recipient owning tab lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipient {
    pub recipient_id: Option<LooseValue>,
    pub role_name: Option<String>,
    pub name: Option<String>,
    #[serde(deserialize_with = "tab_lists")]
    pub tabs: TabLists,
}

impl TemplateDocument {
    /// Create a document from an id and its base64 payload.
    pub fn new(document_id: impl Into<String>, base64: impl Into<String>) -> Self {
        Self {
            document_id: Some(LooseValue::Text(document_id.into())),
            name: None,
            document_base64: Some(base64.into()),
            document_base64_bytes: None,
        }
    }

    /// Normalized id; documents without one are numbered by position (1-based).
    pub fn id_key(&self, index: usize) -> String {
        self.document_id
            .as_ref()
            .and_then(LooseValue::to_trimmed_text)
            .unwrap_or_else(|| (index + 1).to_string())
    }

    /// The base64 payload, whichever key carries it.
    pub fn base64_payload(&self) -> Option<&str> {
        self.document_base64
            .as_deref()
            .or(self.document_base64_bytes.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

impl Recipients {
    /// Every role with its recipients, in a stable order.
    pub fn by_role(&self) -> [(&'static str, &[Recipient]); 8] {
        [
            ("signers", self.signers.as_slice()),
            ("agents", self.agents.as_slice()),
            ("editors", self.editors.as_slice()),
            ("inPersonSigners", self.in_person_signers.as_slice()),
            ("witnesses", self.witnesses.as_slice()),
            ("carbonCopies", self.carbon_copies.as_slice()),
            ("certifiedDeliveries", self.certified_deliveries.as_slice()),
            ("intermediaries", self.intermediaries.as_slice()),
        ]
    }
}

/// Keep only the entries that are arrays, and within them only the
/// elements that read as tabs.
fn filter_tab_lists(raw: BTreeMap<String, serde_json::Value>) -> TabLists {
    raw.into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::Array(items) => {
                let tabs = parse_tabs(&key, items);
                Some((key, tabs))
            }
            _ => None,
        })
        .collect()
}

fn parse_tabs(list_name: &str, items: Vec<serde_json::Value>) -> Vec<Tab> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Tab>(item) {
            Ok(tab) => Some(tab),
            Err(e) => {
                log::warn!("Ignoring malformed tab {} in '{}': {}", index, list_name, e);
                None
            }
        })
        .collect()
}

fn tab_lists<'de, D>(deserializer: D) -> Result<TabLists, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(filter_tab_lists).unwrap_or_default())
}

fn legacy_tab_lists<'de, D>(deserializer: D) -> Result<Vec<TabLists>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| match entry {
            serde_json::Value::Object(map) => Some(filter_tab_lists(map.into_iter().collect())),
            _ => None,
        })
        .collect())
}
