//! Error types for DOCX operations

use doc_model::ValidationError;
use thiserror::Error;

/// Errors raised while opening or decoding a package
#[derive(Debug, Error)]
pub enum PackageError {
    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// IO error (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// A part is not well-formed XML, or lacks its root element
    #[error("Malformed XML in {part}: {message}")]
    MalformedXml { part: String, message: String },

    /// Invalid DOCX structure
    #[error("Invalid DOCX structure: {0}")]
    InvalidStructure(String),
}

/// Errors that can occur during DOCX import/export
#[derive(Debug, Error)]
pub enum DocxError {
    /// The model has a broken cross-reference; nothing was written
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Package(#[from] PackageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<zip::result::ZipError> for DocxError {
    fn from(err: zip::result::ZipError) -> Self {
        DocxError::Package(PackageError::Zip(err))
    }
}

impl From<std::io::Error> for DocxError {
    fn from(err: std::io::Error) -> Self {
        DocxError::Package(PackageError::Io(err))
    }
}

/// Result type for DOCX operations
pub type DocxResult<T> = std::result::Result<T, DocxError>;

/// XML decoding failure, not yet attributed to a part
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub(crate) struct XmlError(pub String);

impl XmlError {
    pub fn new(message: impl Into<String>) -> Self {
        XmlError(message.into())
    }

    /// Attribute the failure to the part it was found in
    pub fn in_part(self, part: &str) -> PackageError {
        PackageError::MalformedXml {
            part: part.to_string(),
            message: self.0,
        }
    }
}

impl From<quick_xml::Error> for XmlError {
    fn from(err: quick_xml::Error) -> Self {
        XmlError(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for XmlError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        XmlError(format!("Attribute error: {}", err))
    }
}

pub(crate) type XmlResult<T> = std::result::Result<T, XmlError>;
