//! Conversion results, counters and per-tab reports.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::fields::{FieldTier, Rejection};
use crate::model::{FieldCategory, FieldKind};
use crate::pdf::PageMapping;

/// Tally of processed tabs by output category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldTypeCounters {
    pub text: usize,
    pub signature: usize,
    pub date: usize,
    pub checkbox: usize,
    pub radio: usize,
    pub dropdown: usize,
    pub attachment: usize,
    pub other: usize,
}

impl FieldTypeCounters {
    pub fn increment(&mut self, category: FieldCategory) {
        *self.slot(category) += 1;
    }

    pub fn get(&self, category: FieldCategory) -> usize {
        match category {
            FieldCategory::Text => self.text,
            FieldCategory::Signature => self.signature,
            FieldCategory::Date => self.date,
            FieldCategory::Checkbox => self.checkbox,
            FieldCategory::Radio => self.radio,
            FieldCategory::Dropdown => self.dropdown,
            FieldCategory::Attachment => self.attachment,
            FieldCategory::Other => self.other,
        }
    }

    fn slot(&mut self, category: FieldCategory) -> &mut usize {
        match category {
            FieldCategory::Text => &mut self.text,
            FieldCategory::Signature => &mut self.signature,
            FieldCategory::Date => &mut self.date,
            FieldCategory::Checkbox => &mut self.checkbox,
            FieldCategory::Radio => &mut self.radio,
            FieldCategory::Dropdown => &mut self.dropdown,
            FieldCategory::Attachment => &mut self.attachment,
            FieldCategory::Other => &mut self.other,
        }
    }

    pub fn total(&self) -> usize {
        self.text
            + self.signature
            + self.date
            + self.checkbox
            + self.radio
            + self.dropdown
            + self.attachment
            + self.other
    }
}

impl fmt::Display for FieldTypeCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "text={} signature={} date={} checkbox={} radio={} dropdown={} attachment={} other={}",
            self.text,
            self.signature,
            self.date,
            self.checkbox,
            self.radio,
            self.dropdown,
            self.attachment,
            self.other
        )
    }
}

/// Why a tab was skipped before dispatch. Skipped tabs are not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// No document matches the tab's `documentId`.
    NoPageMapping,
    /// The page number does not exist in the tab's document.
    PageOutOfRange,
    /// A position could not be parsed.
    InvalidGeometry,
    /// Dropped by the system-tab filter.
    SystemTab,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::NoPageMapping => "no page mapping",
            SkipReason::PageOutOfRange => "page out of range",
            SkipReason::InvalidGeometry => "invalid geometry",
            SkipReason::SystemTab => "system tab",
        })
    }
}

/// What happened to one tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum TabOutcome {
    /// A field was built for the tab's kind.
    Placed { tier: FieldTier },
    /// The dispatcher rejected the tab; a plain text field took its place.
    TextFallback { rejection: Rejection },
    /// The dispatcher rejected the tab and nothing was placed.
    Rejected { rejection: Rejection },
    /// The tab never reached the dispatcher.
    Skipped { reason: SkipReason },
}

impl TabOutcome {
    /// Whether a field exists in the output for this tab.
    pub fn has_field(&self) -> bool {
        matches!(self, TabOutcome::Placed { .. } | TabOutcome::TextFallback { .. })
    }
}

/// Per-tab record of a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabReport {
    pub tab: String,
    pub list_name: String,
    pub role: &'static str,
    pub kind: FieldKind,
    pub document_id: Option<String>,
    /// Zero-based page in the output, when the tab could be mapped.
    pub page_index: Option<usize>,
    pub outcome: TabOutcome,
}

/// Result of converting a template.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// The merged PDF with its form fields
    pub pdf: Vec<u8>,

    /// Processed tabs by category
    pub counters: FieldTypeCounters,

    /// One entry per collected tab, in collection order
    pub reports: Vec<TabReport>,

    /// Where each decoded document's pages landed
    pub pages: Vec<PageMapping>,

    /// Documents that failed to decode
    pub skipped_documents: Vec<String>,
}

impl ConvertResult {
    /// Number of fields placed in the output.
    pub fn field_count(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.has_field()).count()
    }

    /// Number of tabs skipped for the given reason.
    pub fn skipped(&self, reason: SkipReason) -> usize {
        self.reports
            .iter()
            .filter(|r| r.outcome == TabOutcome::Skipped { reason })
            .count()
    }

    pub fn page_count(&self) -> usize {
        self.pages.iter().map(|m| m.page_count).sum()
    }
}

/// One document as seen by `inspect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub document_id: String,
    pub name: Option<String>,
    pub has_content: bool,
}

/// Classification of a template without building a PDF.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectReport {
    pub documents: Vec<DocumentSummary>,
    pub total_tabs: usize,
    pub kinds: BTreeMap<FieldKind, usize>,
    pub roles: BTreeMap<&'static str, usize>,
    /// Tabs the system-tab filter would drop.
    pub system_tabs: usize,
}
