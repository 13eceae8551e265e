//! PDF capability layer.
//!
//! Everything that touches the PDF object model lives here: page merging,
//! the [`FormBackend`] seam used by the field translators, its lopdf
//! implementation and page masking.

pub mod backend;
mod lopdf_backend;
mod mask;
pub mod merge;

pub use backend::{
    CheckboxSpec, DropdownSpec, FieldAttributes, FormBackend, RadioButtonSpec, RadioGroupSpec,
    Rgb, SignatureFieldSpec, TextFieldSpec, WidgetStyle, BLACK, LIGHT_GRAY,
};
pub use lopdf_backend::LopdfFormBackend;
pub use mask::{apply_masks, WHITE};
pub use merge::{merge_documents, MergedDocument, PageMapping, PageTable, SourceDocument};
