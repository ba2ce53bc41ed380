//! Error types for citekey-core.
//!
//! Everything here aborts the run. Problems local to a single placeholder
//! never surface as a [`CitekeyError`]; they are reported as
//! [`Notice`](crate::Notice)s instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CitekeyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid DOCX container: {0}")]
    Container(#[from] zip::result::ZipError),

    #[error("Failed to process XML part '{part}': {source}")]
    Xml {
        part: String,
        #[source]
        source: citekey_xml::Error,
    },

    #[error("Failed to parse bibliography: {0}")]
    Bibliography(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl CitekeyError {
    pub fn xml(part: impl Into<String>, source: citekey_xml::Error) -> Self {
        Self::Xml {
            part: part.into(),
            source,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CitekeyError>;
