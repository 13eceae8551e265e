//! Tab records: single field placements inside a template.

use super::value::{loose_string, null_as_default, LooseValue, Numeric};
use serde::{Deserialize, Serialize};

/// A DocuSign tab.
///
/// Every key is optional and most numeric keys exist in a plain and a
/// `*String` variant. A tab is read-only input to the conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tab {
    pub tab_id: Option<LooseValue>,
    #[serde(deserialize_with = "loose_string")]
    pub tab_type: Option<String>,
    /// Legacy spelling of `tabType`.
    #[serde(rename = "type", deserialize_with = "loose_string")]
    pub legacy_type: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub stamp_type: Option<String>,

    pub document_id: Option<LooseValue>,
    pub page_number: Option<LooseValue>,
    pub page: Option<LooseValue>,

    pub x_position: Option<LooseValue>,
    pub x_position_string: Option<LooseValue>,
    pub y_position: Option<LooseValue>,
    pub y_position_string: Option<LooseValue>,
    pub width: Option<LooseValue>,
    pub width_string: Option<LooseValue>,
    pub height: Option<LooseValue>,
    pub height_string: Option<LooseValue>,

    #[serde(deserialize_with = "loose_string")]
    pub tab_label: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub name: Option<String>,
    pub value: Option<LooseValue>,
    pub default_value: Option<LooseValue>,
    #[serde(deserialize_with = "loose_string")]
    pub tooltip: Option<String>,

    pub required: Option<LooseValue>,
    pub locked: Option<LooseValue>,
    pub selected: Option<LooseValue>,

    /// Radio group name.
    #[serde(deserialize_with = "loose_string")]
    pub group_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub radios: Vec<RadioOption>,
    /// Dropdown entries.
    #[serde(deserialize_with = "null_as_default")]
    pub list_items: Vec<ListItem>,
}

/// One button of a radio group, positioned independently of its group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadioOption {
    pub page_number: Option<LooseValue>,
    pub x_position: Option<LooseValue>,
    pub x_position_string: Option<LooseValue>,
    pub y_position: Option<LooseValue>,
    pub y_position_string: Option<LooseValue>,
    pub width: Option<LooseValue>,
    pub height: Option<LooseValue>,
    pub value: Option<LooseValue>,
    pub selected: Option<LooseValue>,
}

/// One entry of a dropdown list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListItem {
    pub text: Option<LooseValue>,
    pub value: Option<LooseValue>,
    pub selected: Option<LooseValue>,
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn positive_page(value: Option<&LooseValue>) -> Option<u32> {
    let n = value?.to_numeric().value()?;
    (n >= 1.0 && n <= u32::MAX as f64).then(|| n.floor() as u32)
}

impl Tab {
    /// Create an empty tab of the given type.
    pub fn new(tab_type: impl Into<String>) -> Self {
        Self {
            tab_type: Some(tab_type.into()),
            ..Default::default()
        }
    }

    /// The declared type, `tabType` first then legacy `type`.
    pub fn type_name(&self) -> Option<&str> {
        non_empty(&self.tab_type).or_else(|| non_empty(&self.legacy_type))
    }

    pub fn stamp_type(&self) -> Option<&str> {
        non_empty(&self.stamp_type)
    }

    /// `tabLabel`, falling back to `name`.
    pub fn label(&self) -> Option<&str> {
        non_empty(&self.tab_label).or_else(|| non_empty(&self.name))
    }

    /// One-based page number from `pageNumber` or `page`.
    pub fn page_number(&self) -> Option<u32> {
        positive_page(self.page_number.as_ref()).or_else(|| positive_page(self.page.as_ref()))
    }

    pub fn has_page_number(&self) -> bool {
        self.page_number.is_some() || self.page.is_some()
    }

    /// Document id normalized to text (`1` and `"1"` are the same document).
    pub fn document_id(&self) -> Option<String> {
        self.document_id.as_ref()?.to_trimmed_text()
    }

    pub fn x_position(&self) -> Numeric {
        Numeric::first_of([self.x_position.as_ref(), self.x_position_string.as_ref()])
    }

    pub fn y_position(&self) -> Numeric {
        Numeric::first_of([self.y_position.as_ref(), self.y_position_string.as_ref()])
    }

    pub fn width(&self) -> Numeric {
        Numeric::first_of([self.width.as_ref(), self.width_string.as_ref()])
    }

    pub fn height(&self) -> Numeric {
        Numeric::first_of([self.height.as_ref(), self.height_string.as_ref()])
    }

    /// Explicit `value`, falling back to `defaultValue`; empty strings count as missing.
    pub fn explicit_value(&self) -> Option<String> {
        self.value
            .as_ref()
            .and_then(LooseValue::to_trimmed_text)
            .or_else(|| self.default_value.as_ref().and_then(LooseValue::to_trimmed_text))
    }

    pub fn is_selected(&self) -> bool {
        self.selected.as_ref().is_some_and(LooseValue::is_truthy)
    }

    pub fn is_required(&self) -> bool {
        self.required.as_ref().is_some_and(LooseValue::is_truthy)
    }

    pub fn is_locked(&self) -> bool {
        self.locked.as_ref().is_some_and(LooseValue::is_truthy)
    }

    pub fn tooltip(&self) -> Option<&str> {
        non_empty(&self.tooltip)
    }

    pub fn group_name(&self) -> Option<&str> {
        non_empty(&self.group_name)
    }

    /// Identifier used in log lines.
    pub fn display_id(&self) -> String {
        self.tab_id
            .as_ref()
            .and_then(LooseValue::to_trimmed_text)
            .or_else(|| self.label().map(str::to_string))
            .unwrap_or_else(|| "<unlabeled>".to_string())
    }

    pub fn with_document(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = Some(LooseValue::Text(document_id.into()));
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page_number = Some(LooseValue::Number(page as f64));
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x_position = Some(LooseValue::Number(x));
        self.y_position = Some(LooseValue::Number(y));
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(LooseValue::Number(width));
        self.height = Some(LooseValue::Number(height));
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.tab_label = Some(label.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(LooseValue::Text(value.into()));
        self
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = Some(LooseValue::Bool(selected));
        self
    }
}

impl RadioOption {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x_position: Some(LooseValue::Number(x)),
            y_position: Some(LooseValue::Number(y)),
            ..Default::default()
        }
    }

    pub fn page_number(&self) -> Option<u32> {
        positive_page(self.page_number.as_ref())
    }

    pub fn x_position(&self) -> Numeric {
        Numeric::first_of([self.x_position.as_ref(), self.x_position_string.as_ref()])
    }

    pub fn y_position(&self) -> Numeric {
        Numeric::first_of([self.y_position.as_ref(), self.y_position_string.as_ref()])
    }

    pub fn width(&self) -> Numeric {
        Numeric::first_of([self.width.as_ref()])
    }

    pub fn height(&self) -> Numeric {
        Numeric::first_of([self.height.as_ref()])
    }

    /// Export value; the literal strings `undefined` and `null` count as missing.
    pub fn value(&self) -> Option<String> {
        self.value
            .as_ref()
            .and_then(LooseValue::to_trimmed_text)
            .filter(|v| v != "undefined" && v != "null")
    }

    pub fn is_selected(&self) -> bool {
        self.selected.as_ref().is_some_and(LooseValue::is_truthy)
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page_number = Some(LooseValue::Number(page as f64));
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(LooseValue::Text(value.into()));
        self
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = Some(LooseValue::Bool(selected));
        self
    }
}

impl ListItem {
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: Some(LooseValue::Text(text.into())),
            value: Some(LooseValue::Text(value.into())),
            selected: None,
        }
    }

    /// Display label, falling back to the value.
    pub fn label(&self) -> Option<String> {
        self.text
            .as_ref()
            .and_then(LooseValue::to_trimmed_text)
            .or_else(|| self.value.as_ref().and_then(LooseValue::to_trimmed_text))
    }

    /// Export value, falling back to the label.
    pub fn export_value(&self) -> Option<String> {
        self.value
            .as_ref()
            .and_then(LooseValue::to_trimmed_text)
            .or_else(|| self.text.as_ref().and_then(LooseValue::to_trimmed_text))
    }

    pub fn is_selected(&self) -> bool {
        self.selected.as_ref().is_some_and(LooseValue::is_truthy)
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = Some(LooseValue::Bool(selected));
        self
    }
}
