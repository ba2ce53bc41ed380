/*
 * normalize.rs
 * Copyright (c) 2026 citekey contributors
 *
 * Title normalization.
 */

//! Title normalization.

/// Canonical comparison key for a title.
///
/// Lowercases, folds the German umlauts and sharp s to their ASCII
/// spellings, then drops everything that is not alphanumeric. Two titles
/// match iff their keys are equal.
pub fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .replace('ä', "a")
        .replace('ö', "o")
        .replace('ü', "u")
        .replace('ß', "ss")
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}
