/*
 * render.rs
 * Copyright (c) 2026 citekey contributors
 *
 * Pandoc citation markers.
 */

//! Pandoc citation markers.

use crate::resolve::ResolvedCitation;

/// Render citations as Pandoc citation tokens.
///
/// Every citation becomes ` [@key]` or ` [@key, pages]`; tokens are
/// concatenated as-is since each carries its own leading space. A citation
/// without a key renders as ` [@]`.
pub fn render_citations(citations: &[ResolvedCitation]) -> String {
    let mut out = String::new();
    for citation in citations {
        out.push_str(" [@");
        out.push_str(citation.citation_key.as_deref().unwrap_or_default());
        match citation.pages.as_deref() {
            Some(pages) if !pages.is_empty() => {
                out.push_str(", ");
                out.push_str(pages);
            }
            _ => {}
        }
        out.push(']');
    }
    out
}
