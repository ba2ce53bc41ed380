//! Mutable XML trees for rewriting word-processing document parts.
//!
//! This crate wraps [`quick-xml`] to provide a tree of [`XmlElement`]s that can
//! be searched with ElementTree-style paths, edited in place, and written back
//! out without losing the parts of the document the caller never touched.
//!
//! # Overview
//!
//! The main types are:
//! - [`XmlDocument`]: The parsed document (prolog plus root element)
//! - [`XmlElement`]: An element with name, prefix, attributes and children
//! - [`XmlChild`]: One child node (element, text, CDATA, comment or processing instruction)
//! - [`XmlPath`]: A compiled search path such as `./sdtContent//r/t`
//!
//! # Example
//!
//! ```rust
//! use citekey_xml::{XmlPath, parse};
//!
//! let mut doc = parse(r#"<w:body><w:p><w:r><w:t>Hello</w:t></w:r></w:p></w:body>"#).unwrap();
//!
//! let path = XmlPath::parse(".//t").unwrap();
//! let position = doc.root.locate(&path).unwrap();
//! let text = doc.root.element_at_mut(&position).unwrap();
//! text.set_text("Hello, world");
//!
//! assert_eq!(
//!     doc.to_xml_string().unwrap(),
//!     "<w:body><w:p><w:r><w:t>Hello, world</w:t></w:r></w:p></w:body>"
//! );
//! ```

pub mod error;
pub mod parser;
pub mod path;
pub mod types;
pub mod writer;

// Re-export main types
pub use error::{Error, Result};
pub use parser::parse;
pub use path::{ElementPosition, XmlPath};
pub use types::{XmlAttribute, XmlChild, XmlDocument, XmlElement};
