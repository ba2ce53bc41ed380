//! Error types for XML parsing, searching and writing.

use thiserror::Error;

/// Result type alias for citekey-xml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading, querying or writing XML.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// XML syntax error from quick-xml.
    #[error("XML syntax error: {message}{}", .position.map(|p| format!(" at byte {}", p)).unwrap_or_default())]
    XmlSyntax {
        message: String,
        /// Byte offset where the error occurred.
        position: Option<u64>,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// What was expected when EOF was encountered.
        expected: String,
    },

    /// Mismatched end tag.
    #[error("Mismatched end tag: expected </{expected}>, found </{found}>")]
    MismatchedEndTag { expected: String, found: String },

    /// Invalid XML structure.
    #[error("Invalid XML structure: {message}")]
    InvalidStructure { message: String },

    /// Empty document (no root element).
    #[error("Empty XML document: no root element found")]
    EmptyDocument,

    /// Multiple root elements.
    #[error("Invalid XML: multiple root elements (second root <{name}>)")]
    MultipleRoots { name: String },

    /// A search path could not be compiled.
    #[error("Invalid element path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    /// Serialization failed.
    #[error("Failed to write XML: {message}")]
    Write { message: String },
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlSyntax {
            message: err.to_string(),
            position: None,
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlSyntax {
            message: format!("Attribute error: {}", err),
            position: None,
        }
    }
}
