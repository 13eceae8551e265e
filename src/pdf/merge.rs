//! Page concatenation into a single output document.
//!
//! Every source document is renumbered into a shared object-id space, its
//! pages are re-parented under one page tree, and a [`PageTable`] records
//! where each source document's pages landed.

use std::collections::HashMap;

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use serde::Serialize;

use crate::error::{Error, Result};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Depth limit when walking `/Parent` chains of malformed files.
const MAX_TREE_DEPTH: usize = 32;

/// A loaded source document waiting to be merged.
#[derive(Debug)]
pub struct SourceDocument {
    pub document_id: String,
    pub pdf: Document,
}

impl SourceDocument {
    pub fn new(document_id: impl Into<String>, pdf: Document) -> Self {
        Self {
            document_id: document_id.into(),
            pdf,
        }
    }
}

/// Where one source document's pages live in the merged output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMapping {
    pub document_id: String,
    /// Zero-based index of the first page in the output.
    pub start_page_index: usize,
    /// Zero-based index of the last page (equal to the start for empty documents).
    pub end_page_index: usize,
    pub page_count: usize,
}

impl PageMapping {
    /// Output page index of a one-based page number within this document.
    pub fn page_index(&self, page_number: u32) -> Option<usize> {
        let offset = (page_number as usize).checked_sub(1)?;
        (offset < self.page_count).then(|| self.start_page_index + offset)
    }
}

/// Source-document to page-range table, built once during the merge.
#[derive(Debug, Clone, Default)]
pub struct PageTable {
    mappings: Vec<PageMapping>,
    by_document: HashMap<String, usize>,
}

impl PageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next document's page range.
    pub fn push(&mut self, document_id: impl Into<String>, page_count: usize) {
        let document_id = document_id.into();
        let start = self.total_pages();
        let mapping = PageMapping {
            document_id: document_id.clone(),
            start_page_index: start,
            end_page_index: start + page_count.saturating_sub(1),
            page_count,
        };
        // First occurrence wins when a template repeats a document id.
        self.by_document
            .entry(document_id)
            .or_insert(self.mappings.len());
        self.mappings.push(mapping);
    }

    pub fn get(&self, document_id: &str) -> Option<&PageMapping> {
        self.by_document
            .get(document_id)
            .map(|&idx| &self.mappings[idx])
    }

    /// Look up a mapping; a missing id resolves to the only document, if
    /// there is exactly one.
    pub fn lookup(&self, document_id: Option<&str>) -> Option<&PageMapping> {
        match document_id {
            Some(id) => self.get(id),
            None if self.mappings.len() == 1 => self.mappings.first(),
            None => None,
        }
    }

    pub fn mappings(&self) -> &[PageMapping] {
        &self.mappings
    }

    pub fn total_pages(&self) -> usize {
        self.mappings.iter().map(|m| m.page_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Output of [`merge_documents`].
#[derive(Debug)]
pub struct MergedDocument {
    pub document: Document,
    /// Page object ids in output order.
    pub pages: Vec<ObjectId>,
    pub table: PageTable,
}

/// Concatenate source documents in order.
pub fn merge_documents(sources: Vec<SourceDocument>) -> Result<MergedDocument> {
    if sources.is_empty() {
        return Err(Error::NoDocuments);
    }

    let mut output = Document::with_version("1.7");
    let mut table = PageTable::new();
    let mut pages: Vec<(ObjectId, Dictionary)> = Vec::new();
    let mut next_id = 1;

    for source in sources {
        let mut doc = source.pdf;
        doc.renumber_objects_with(next_id);
        next_id = doc.max_id + 1;

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        for &page_id in &page_ids {
            let mut page = doc.get_dictionary(page_id)?.clone();
            for key in INHERITABLE {
                if !page.has(key) {
                    if let Some(value) = inherited_attribute(&doc, &page, key) {
                        page.set(key.to_vec(), value);
                    }
                }
            }
            pages.push((page_id, page));
        }
        log::debug!(
            "Merged document '{}': {} pages",
            source.document_id,
            page_ids.len()
        );
        table.push(source.document_id, page_ids.len());

        for (object_id, object) in doc.objects {
            if is_structural(&object) {
                continue;
            }
            output.objects.insert(object_id, object);
        }
    }

    output.max_id = output
        .objects
        .keys()
        .chain(pages.iter().map(|(id, _)| id))
        .map(|(num, _)| *num)
        .max()
        .unwrap_or(0);

    let pages_id = output.new_object_id();
    let kids: Vec<Object> = pages.iter().map(|(id, _)| Object::Reference(*id)).collect();
    let page_ids: Vec<ObjectId> = pages.iter().map(|(id, _)| *id).collect();

    for (page_id, mut page) in pages {
        page.set("Parent", Object::Reference(pages_id));
        output.objects.insert(page_id, Object::Dictionary(page));
    }

    output.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_ids.len() as i64),
        }),
    );

    let catalog_id = output.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    output.trailer.set("Root", Object::Reference(catalog_id));

    Ok(MergedDocument {
        document: output,
        pages: page_ids,
        table,
    })
}

/// Objects rebuilt by the merge rather than copied.
fn is_structural(object: &Object) -> bool {
    let Ok(dict) = object.as_dict() else {
        return false;
    };
    matches!(
        dict.get(b"Type").and_then(Object::as_name),
        Ok(b"Catalog" | b"Pages" | b"Page" | b"Outlines" | b"Outline")
    )
}

/// Walk the `/Parent` chain for an inheritable attribute.
pub(super) fn inherited_attribute(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut current = page.get(b"Parent").and_then(Object::as_reference).ok();
    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_dictionary(current?).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        current = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}
