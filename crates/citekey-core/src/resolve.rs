/*
 * resolve.rs
 * Copyright (c) 2026 citekey contributors
 *
 * Matching decoded references against the bibliography.
 */

//! Matching decoded references against the bibliography.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::bibliography::BibliographyIndex;
use crate::metadata::ReferenceRecord;

/// A reference paired with its citation key, if one was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedCitation {
    pub title: String,
    pub year: Option<String>,
    /// `None` when no bibliography entry has a matching title.
    pub citation_key: Option<String>,
    /// Page or page range, e.g. `12` or `12-14`.
    pub pages: Option<String>,
}

impl ResolvedCitation {
    pub fn is_resolved(&self) -> bool {
        self.citation_key.is_some()
    }
}

impl fmt::Display for ResolvedCitation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Title: {}, Year: {}, CitationKey: {}",
            self.title,
            self.year.as_deref().unwrap_or(""),
            self.citation_key.as_deref().unwrap_or("")
        )
    }
}

/// Result of resolving the references of one placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// One citation per input reference, in input order.
    pub citations: Vec<ResolvedCitation>,
    /// Number of citations with a citation key.
    pub resolved: usize,
}

impl Resolution {
    /// Titles that did not match any bibliography entry.
    pub fn unresolved_titles(&self) -> impl Iterator<Item = &str> {
        self.citations
            .iter()
            .filter(|c| !c.is_resolved())
            .map(|c| c.title.as_str())
    }
}

/// Look up every reference in `index`.
///
/// Misses are not errors: the citation is kept, without a key.
pub fn resolve_references(references: &[ReferenceRecord], index: &BibliographyIndex) -> Resolution {
    let citations: Vec<ResolvedCitation> = references
        .iter()
        .map(|reference| {
            let citation = ResolvedCitation {
                title: reference.title.clone(),
                year: reference.year.clone(),
                citation_key: index.find_by_title(&reference.title).map(str::to_string),
                pages: reference.pages(),
            };
            debug!(citation = %citation, "Resolved reference");
            citation
        })
        .collect();

    let resolved = citations.iter().filter(|c| c.is_resolved()).count();
    Resolution {
        citations,
        resolved,
    }
}
