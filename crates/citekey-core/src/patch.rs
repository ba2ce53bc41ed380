/*
 * patch.rs
 * Copyright (c) 2026 citekey contributors
 *
 * Rewriting placeholder elements in an XML part.
 */

//! Rewriting placeholder elements in an XML part.
//!
//! For every placeholder element the patcher runs
//! assemble → decode → resolve → render and appends the rendered citation
//! to the placeholder's visible text. Nothing that goes wrong inside one
//! placeholder affects any other: the problem is recorded as a [`Notice`]
//! and the placeholder is left untouched.

use std::fmt;

use citekey_xml::{ElementPosition, XmlDocument, XmlElement};
use tracing::{debug, info, warn};

use crate::bibliography::BibliographyIndex;
use crate::config::PlaceholderPattern;
use crate::metadata::{PayloadErrorKind, decode_payload};
use crate::payload::assemble_payload;
use crate::render::render_citations;
use crate::resolve::resolve_references;

/// A non-fatal event while processing one placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Zero-based ordinal of the placeholder element within the part.
    pub placeholder: usize,
    pub kind: NoticeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    /// The marker was present but nothing followed it.
    EmptyPayload,
    /// The payload was not valid base64.
    DecodeFailure(String),
    /// The decoded metadata did not have the expected shape.
    MetadataShape(String),
    /// A cited title matched no bibliography entry.
    UnresolvedTitle(String),
    /// The placeholder has no visible text node to append to.
    MissingTextNode,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "placeholder {}: ", self.placeholder)?;
        match &self.kind {
            NoticeKind::EmptyPayload => write!(f, "empty payload"),
            NoticeKind::DecodeFailure(message) => {
                write!(f, "could not decode payload: {}", message)
            }
            NoticeKind::MetadataShape(message) => {
                write!(f, "unexpected payload metadata: {}", message)
            }
            NoticeKind::UnresolvedTitle(title) => write!(
                f,
                "no bibliography entry matches '{}' (normalized: {})",
                title,
                crate::normalize::normalize_title(title)
            ),
            NoticeKind::MissingTextNode => write!(f, "no visible text node to append to"),
        }
    }
}

impl Notice {
    fn log(&self) {
        match self.kind {
            NoticeKind::DecodeFailure(_) | NoticeKind::MetadataShape(_) => warn!("{}", self),
            NoticeKind::UnresolvedTitle(_) | NoticeKind::EmptyPayload => info!("{}", self),
            NoticeKind::MissingTextNode => debug!("{}", self),
        }
    }
}

/// Summary of one patcher pass over a part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// Elements matched by the placeholder path.
    pub elements: usize,
    /// Placeholders whose text node received a citation marker.
    pub patched: usize,
    /// References resolved to a citation key, summed over the part.
    pub citations: usize,
    pub notices: Vec<Notice>,
}

impl PatchReport {
    fn notice(&mut self, placeholder: usize, kind: NoticeKind) {
        let notice = Notice { placeholder, kind };
        notice.log();
        self.notices.push(notice);
    }
}

/// Pending text replacement computed for one placeholder.
struct TextPatch {
    target: ElementPosition,
    rendered: String,
}

/// Resolves and rewrites the placeholders of an XML part.
pub struct DocumentPatcher<'a> {
    index: &'a BibliographyIndex,
    pattern: &'a PlaceholderPattern,
}

impl<'a> DocumentPatcher<'a> {
    pub fn new(index: &'a BibliographyIndex, pattern: &'a PlaceholderPattern) -> Self {
        Self { index, pattern }
    }

    /// Process every placeholder of `document` in document order, editing
    /// the tree in place.
    pub fn patch(&self, document: &mut XmlDocument) -> PatchReport {
        let mut report = PatchReport::default();
        let positions = document.root.locate_all(&self.pattern.element);
        report.elements = positions.len();

        for (ordinal, position) in positions.iter().enumerate() {
            let Some(element) = document.root.element_at(position) else {
                continue;
            };
            let Some(patch) = self.prepare(element, position, ordinal, &mut report) else {
                continue;
            };

            if let Some(text_node) = document.root.element_at_mut(&patch.target) {
                let original = text_node.text();
                text_node.set_text(format!("{} {}", original, patch.rendered));
                report.patched += 1;
            }
        }

        report
    }

    fn prepare(
        &self,
        element: &XmlElement,
        position: &ElementPosition,
        ordinal: usize,
        report: &mut PatchReport,
    ) -> Option<TextPatch> {
        let Some(payload) = extract_payload(element, self.pattern) else {
            debug!(placeholder = ordinal, "Element carries no citation payload");
            return None;
        };
        if payload.is_empty() {
            report.notice(ordinal, NoticeKind::EmptyPayload);
            return None;
        }

        let references = match decode_payload(&payload) {
            Ok(references) => references,
            Err(err) => {
                let kind = match err.kind() {
                    PayloadErrorKind::DecodeFailure => NoticeKind::DecodeFailure(err.to_string()),
                    PayloadErrorKind::MetadataShape => NoticeKind::MetadataShape(err.to_string()),
                };
                report.notice(ordinal, kind);
                return None;
            }
        };

        let resolution = resolve_references(&references, self.index);
        report.citations += resolution.resolved;
        for title in resolution.unresolved_titles() {
            report.notice(ordinal, NoticeKind::UnresolvedTitle(title.to_string()));
        }

        let rendered = render_citations(&resolution.citations);
        debug!(placeholder = ordinal, rendered = %rendered, "Rendered citation");

        let Some(text_position) = element.locate(&self.pattern.text_node) else {
            report.notice(ordinal, NoticeKind::MissingTextNode);
            return None;
        };

        Some(TextPatch {
            target: position.join(&text_position),
            rendered,
        })
    }
}

/// Assemble the payload of a placeholder element from its fragments.
pub(crate) fn extract_payload(element: &XmlElement, pattern: &PlaceholderPattern) -> Option<String> {
    let fragments = element
        .find_all(&pattern.fragments)
        .into_iter()
        .map(XmlElement::text);
    assemble_payload(fragments, &pattern.marker)
}
