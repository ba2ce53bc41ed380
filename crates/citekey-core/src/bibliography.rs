/*
 * bibliography.rs
 * Copyright (c) 2026 citekey contributors
 *
 * Bibliography entries and title lookup.
 */

//! Bibliography entries and title lookup.
//!
//! Entries are loaded once from a BibTeX/BibLaTeX source and never change
//! afterwards, so a [`BibliographyIndex`] can be shared across threads that
//! process different document parts.

use std::collections::BTreeMap;
use std::path::Path;

use biblatex::{Bibliography, ChunksExt};

use crate::error::{CitekeyError, Result};
use crate::normalize::normalize_title;

/// One bibliography record: a citation key plus its fields as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BibliographyEntry {
    /// Citation key, e.g. `Smith2001`.
    pub key: String,

    /// Field values keyed by lower-case field name.
    pub fields: BTreeMap<String, String>,
}

impl BibliographyEntry {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.insert(name.to_lowercase(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.field("title")
    }
}

/// Parse a BibTeX/BibLaTeX source into entries, keeping source order.
///
/// Field values are flattened to plain text.
///
/// # Errors
///
/// Returns [`CitekeyError::Bibliography`] if the source cannot be parsed.
pub fn load_bibtex(source: &str) -> Result<Vec<BibliographyEntry>> {
    let bibliography =
        Bibliography::parse(source).map_err(|e| CitekeyError::Bibliography(e.to_string()))?;

    Ok(bibliography
        .iter()
        .map(|entry| BibliographyEntry {
            key: entry.key.clone(),
            fields: entry
                .fields
                .iter()
                .map(|(name, chunks)| (name.to_lowercase(), chunks.format_verbatim()))
                .collect(),
        })
        .collect())
}

/// Title lookup over an immutable list of entries.
#[derive(Debug, Clone, Default)]
pub struct BibliographyIndex {
    entries: Vec<BibliographyEntry>,
    /// Normalized title per entry, `None` for entries without a title.
    title_keys: Vec<Option<String>>,
}

impl BibliographyIndex {
    pub fn new(entries: Vec<BibliographyEntry>) -> Self {
        let title_keys = entries
            .iter()
            .map(|entry| entry.title().map(normalize_title))
            .collect();
        Self {
            entries,
            title_keys,
        }
    }

    /// Build an index from BibTeX source text.
    pub fn from_bibtex(source: &str) -> Result<Self> {
        Ok(Self::new(load_bibtex(source)?))
    }

    /// Read and index a BibTeX file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_bibtex(&source)
    }

    /// Citation key of the first entry whose title normalizes to the same
    /// key as `title`.
    ///
    /// Entries without a title or with an empty key are skipped. Duplicate
    /// titles always resolve to the earliest entry.
    pub fn find_by_title(&self, title: &str) -> Option<&str> {
        let wanted = normalize_title(title);

        self.entries
            .iter()
            .zip(&self.title_keys)
            .find(|(entry, title_key)| {
                title_key.as_deref() == Some(wanted.as_str()) && !entry.key.is_empty()
            })
            .map(|(entry, _)| entry.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
