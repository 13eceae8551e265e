//! Data model for DocuSign template exports and form geometry.
//!
//! The template side mirrors the loosely-typed JSON export: numbers may
//! arrive as numbers or numeric strings, any key may be absent. The field
//! side holds the closed set of semantic kinds and PDF rectangles the
//! conversion works with.

mod field;
mod tab;
mod template;
mod value;

pub use field::{FieldCategory, FieldKind, PageSize, Rectangle};
pub use tab::{ListItem, RadioOption, Tab};
pub use template::{Recipient, Recipients, TabLists, TemplateDocument, TemplateExport};
pub use value::{LooseValue, Numeric};
