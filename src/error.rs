//! Error types for docuform library.

use std::io;
use thiserror::Error;

/// Result type alias for docuform operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a template.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The template JSON could not be parsed.
    #[error("Invalid template JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The template is structurally unusable.
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// The template carries no documents at all.
    #[error("Template contains no documents")]
    NoDocuments,

    /// None of the template documents could be decoded and loaded.
    #[error("None of the {0} template documents could be decoded")]
    NoDecodableDocuments(usize),

    /// Base64 payload of a document could not be decoded.
    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes are not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error reading or manipulating PDF objects.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// The PDF form layer rejected a field name.
    #[error("Invalid field name: {0:?}")]
    InvalidFieldName(String),

    /// A field with the same fully qualified name already exists.
    #[error("Duplicate field name: {0}")]
    DuplicateFieldName(String),

    /// The backend cannot build the requested field type.
    #[error("Unsupported field construction: {0}")]
    Unsupported(String),

    /// Writing the final document failed.
    #[error("Failed to generate the output PDF")]
    Save,
}

impl Error {
    /// Whether this error aborts a whole conversion.
    ///
    /// Everything else is recovered per document, per tab or per field.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::Json(_)
                | Error::InvalidTemplate(_)
                | Error::NoDocuments
                | Error::NoDecodableDocuments(_)
                | Error::Save
        )
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Pdf(err.to_string()),
        }
    }
}
