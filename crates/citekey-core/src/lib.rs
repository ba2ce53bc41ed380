//! Citation placeholder resolution for word-processing documents.
//!
//! Reference managers embed their citations in DOCX parts as structured
//! document tags whose field instructions carry a base64-encoded JSON
//! payload. This crate recovers those payloads, matches every cited title
//! against a BibTeX bibliography and appends a Pandoc-style citation marker
//! (`[@key, pages]`) to the visible text of the placeholder.
//!
//! # Architecture
//!
//! ```text
//! XML part ──► payload::assemble_payload ──► metadata::decode_payload
//!                                                   │
//!                                                   ▼
//!          bibliography::BibliographyIndex ◄── resolve::resolve_references
//!                                                   │
//!                                                   ▼
//!          patch::DocumentPatcher ◄────────── render::render_citations
//! ```
//!
//! [`convert`] drives the pipeline over the parts of a [`DocxContainer`].
//!
//! # Example
//!
//! ```rust
//! use citekey_core::{BibliographyIndex, DocumentPatcher, PlaceholderConfig};
//!
//! let index = BibliographyIndex::from_bibtex(
//!     "@book{Smith2001, title = {Die Okonomie}, year = {2001}}",
//! ).unwrap();
//! let pattern = PlaceholderConfig::default().compile().unwrap();
//!
//! let mut doc = citekey_xml::parse("<body><p>No placeholders here</p></body>").unwrap();
//! let report = DocumentPatcher::new(&index, &pattern).patch(&mut doc);
//! assert_eq!(report.citations, 0);
//! ```

pub mod bibliography;
pub mod config;
pub mod container;
pub mod convert;
pub mod error;
pub mod metadata;
pub mod normalize;
pub mod patch;
pub mod payload;
pub mod render;
pub mod resolve;

// Re-export main types
pub use bibliography::{BibliographyEntry, BibliographyIndex, load_bibtex};
pub use config::{ConvertConfig, PartConfig, PlaceholderConfig, PlaceholderPattern};
pub use container::{DocxContainer, FOOTNOTES_PART, MAIN_DOCUMENT_PART};
pub use convert::{
    ConversionOutcome, PartInspection, PartOutcome, PlaceholderPayload, convert_container,
    convert_part, inspect_container, inspect_part,
};
pub use error::{CitekeyError, Result};
pub use metadata::{PayloadError, PayloadErrorKind, ReferenceRecord, decode_payload};
pub use normalize::normalize_title;
pub use patch::{DocumentPatcher, Notice, NoticeKind, PatchReport};
pub use payload::{CITAVI_MARKER, assemble_payload};
pub use render::render_citations;
pub use resolve::{Resolution, ResolvedCitation, resolve_references};
