//! Template to fillable-PDF conversion.
//!
//! The converter decodes every source document, concatenates their pages,
//! then walks every tab of the template: map it to an output page, compute
//! its rectangle, apply the system-tab filter and hand it to the field
//! translator. Masks are painted after all fields are placed.
//!
//! # Example
//!
//! ```no_run
//! use docuform::convert::{ConvertOptions, TemplateConverter};
//!
//! fn main() -> docuform::Result<()> {
//!     let json = std::fs::read_to_string("template.json")?;
//!     let converter = TemplateConverter::new(ConvertOptions::new().with_header_mask(36.0));
//!     let result = converter.convert_json(&json)?;
//!     std::fs::write("output.pdf", &result.pdf)?;
//!     println!("{}", result.counters);
//!     Ok(())
//! }
//! ```

mod options;
mod result;

pub use options::ConvertOptions;
pub use result::{
    ConvertResult, DocumentSummary, FieldTypeCounters, InspectReport, SkipReason, TabOutcome,
    TabReport,
};

use crate::error::Result;
use crate::fields::{Placement, Translator};
use crate::filter::is_system_tab;
use crate::geometry::tab_rectangle;
use crate::model::{FieldCategory, RadioOption, TemplateExport};
use crate::pdf::{
    apply_masks, merge_documents, FormBackend, LopdfFormBackend, PageTable, SourceDocument,
};
use crate::template::{collect_tabs, decode_documents, parse_template, TabRecord};

/// Converts DocuSign template exports into fillable PDFs.
///
/// A converter holds only options; every call builds its own output
/// document and counters, so one converter can serve many conversions.
#[derive(Debug, Clone, Default)]
pub struct TemplateConverter {
    options: ConvertOptions,
}

impl TemplateConverter {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Parse and convert a template JSON export.
    pub fn convert_json(&self, json: &str) -> Result<ConvertResult> {
        let template = parse_template(json)?;
        self.convert(&template)
    }

    /// Convert a parsed template.
    pub fn convert(&self, template: &TemplateExport) -> Result<ConvertResult> {
        let decoded = decode_documents(template, self.options.parallel)?;
        let skipped_documents: Vec<String> = decoded
            .failures
            .iter()
            .map(|f| f.document_id.clone())
            .collect();

        let sources: Vec<SourceDocument> = decoded.documents.into_iter().map(Into::into).collect();
        let merged = merge_documents(sources)?;
        let table = merged.table.clone();
        log::debug!(
            "Merged {} documents into {} pages",
            table.mappings().len(),
            table.total_pages()
        );

        let mut backend = LopdfFormBackend::new(merged);
        let (counters, reports) = self.place_fields(&mut backend, &table, template);
        apply_masks(
            &mut backend,
            self.options.mask_header_height,
            self.options.mask_footer_height,
        )?;
        let pdf = backend.save_to_bytes()?;

        log::info!(
            "Converted template: {} pages, {} tabs ({})",
            table.total_pages(),
            reports.len(),
            counters
        );

        Ok(ConvertResult {
            pdf,
            counters,
            reports,
            pages: table.mappings().to_vec(),
            skipped_documents,
        })
    }

    /// Place a field for every tab of the template on `backend`.
    ///
    /// Never fails: per-tab problems are recorded in the reports.
    pub fn place_fields(
        &self,
        backend: &mut dyn FormBackend,
        table: &PageTable,
        template: &TemplateExport,
    ) -> (FieldTypeCounters, Vec<TabReport>) {
        let mut translator = Translator::new(backend, &self.options.registry, self.options.field_sizes)
            .with_field_names(self.options.show_field_names);
        let mut counters = FieldTypeCounters::default();

        let reports = collect_tabs(template)
            .into_iter()
            .map(|record| self.place_tab(&mut translator, table, &record, &mut counters))
            .collect();

        (counters, reports)
    }

    fn place_tab(
        &self,
        translator: &mut Translator<'_>,
        table: &PageTable,
        record: &TabRecord<'_>,
        counters: &mut FieldTypeCounters,
    ) -> TabReport {
        let tab = record.tab;
        let kind = record.kind();
        let document_id = tab.document_id();
        let mut report = TabReport {
            tab: tab.display_id(),
            list_name: record.list_name.to_string(),
            role: record.role,
            kind,
            document_id: document_id.clone(),
            page_index: None,
            outcome: TabOutcome::Skipped {
                reason: SkipReason::NoPageMapping,
            },
        };

        let skip = |mut report: TabReport, reason: SkipReason| {
            log::debug!("Skipping tab {} ({}): {}", report.tab, kind, reason);
            report.outcome = TabOutcome::Skipped { reason };
            report
        };

        let Some(mapping) = table.lookup(document_id.as_deref()) else {
            log::warn!(
                "Tab {} references unknown document {:?}",
                report.tab,
                document_id
            );
            return skip(report, SkipReason::NoPageMapping);
        };

        // Radio group records usually carry no page of their own.
        let page_number = match tab.page_number() {
            Some(number) => number,
            None if tab.has_page_number() => return skip(report, SkipReason::PageOutOfRange),
            None => tab
                .radios
                .iter()
                .find_map(RadioOption::page_number)
                .unwrap_or(1),
        };
        let page_index = match mapping.page_index(page_number) {
            Some(index) if index < translator.backend().page_count() => index,
            _ => return skip(report, SkipReason::PageOutOfRange),
        };
        report.page_index = Some(page_index);

        let page = match translator.backend().page_size(page_index) {
            Ok(page) => page,
            Err(e) => {
                log::warn!("Cannot read size of page {}: {}", page_index + 1, e);
                return skip(report, SkipReason::PageOutOfRange);
            }
        };

        let default = self.options.field_sizes.default_for(
            kind,
            self.options.field_width,
            self.options.field_height,
        );
        let Some(rect) = tab_rectangle(tab, &page, default) else {
            return skip(report, SkipReason::InvalidGeometry);
        };

        if !self.options.include_system_tabs && is_system_tab(tab) {
            return skip(report, SkipReason::SystemTab);
        }

        let placement = Placement {
            mapping,
            page_index,
            page,
            rect,
        };
        report.outcome = match translator.translate(kind, tab, &placement) {
            Ok(tier) => {
                counters.increment(kind.category());
                log::debug!("Tab {} placed as {} ({})", report.tab, kind, tier);
                TabOutcome::Placed { tier }
            }
            Err(rejection) => {
                counters.increment(FieldCategory::Other);
                if self.options.text_fallback {
                    match translator.fallback_text(tab, &placement) {
                        Ok(()) => {
                            log::debug!("Tab {} ({}): {}, placed as text", report.tab, kind, rejection);
                            TabOutcome::TextFallback { rejection }
                        }
                        Err(e) => {
                            log::warn!("Tab {} ({}): text fallback failed: {}", report.tab, kind, e);
                            TabOutcome::Rejected { rejection }
                        }
                    }
                } else {
                    log::debug!("Tab {} ({}): {}", report.tab, kind, rejection);
                    TabOutcome::Rejected { rejection }
                }
            }
        };
        report
    }

    /// Classify every tab without decoding documents or building a PDF.
    pub fn inspect(&self, template: &TemplateExport) -> InspectReport {
        let mut report = InspectReport {
            documents: template
                .documents
                .iter()
                .enumerate()
                .map(|(index, doc)| DocumentSummary {
                    document_id: doc.id_key(index),
                    name: doc.name.clone(),
                    has_content: doc.base64_payload().is_some(),
                })
                .collect(),
            ..Default::default()
        };

        for record in collect_tabs(template) {
            report.total_tabs += 1;
            *report.kinds.entry(record.kind()).or_insert(0) += 1;
            *report.roles.entry(record.role).or_insert(0) += 1;
            if is_system_tab(record.tab) {
                report.system_tabs += 1;
            }
        }
        report
    }

    /// Parse a template and inspect it.
    pub fn inspect_json(&self, json: &str) -> Result<InspectReport> {
        let template = parse_template(json)?;
        Ok(self.inspect(&template))
    }
}
