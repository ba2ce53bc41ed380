/*
 * payload.rs
 * Copyright (c) 2026 citekey contributors
 *
 * Payload assembly from field-instruction fragments.
 */

//! Payload assembly from field-instruction fragments.
//!
//! Word may split one long field instruction across several text runs. The
//! encoded payload is the concatenation of those runs, in document order,
//! with the marker prefix and the closing brace removed:
//!
//! ```text
//! "ADDIN CitaviPlaceholder{eyJF"   "bnRyaWVz"   "Ijpbxd0=}"   "ignored"
//!                         ^^^^^^ + ^^^^^^^^^^ + ^^^^^^^^^^^   (stops here)
//! ```

/// Marker that opens a Citavi citation placeholder.
pub const CITAVI_MARKER: &str = "ADDIN CitaviPlaceholder";

const OPENING_DELIMITER: char = '{';
const CLOSING_DELIMITER: char = '}';

/// Reassemble one encoded payload from the text fragments of a placeholder.
///
/// Returns `None` when the first fragment does not start with `marker`
/// (the element is not a placeholder). The returned payload may be empty.
pub fn assemble_payload<I, S>(fragments: I, marker: &str) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut fragments = fragments.into_iter();
    let first = fragments.next()?;
    if !first.as_ref().starts_with(marker) {
        return None;
    }

    let mut payload = String::new();
    for fragment in std::iter::once(first).chain(fragments) {
        let mut text = fragment.as_ref();
        if let Some(rest) = text.strip_prefix(marker) {
            text = rest.strip_prefix(OPENING_DELIMITER).unwrap_or(rest);
        }
        if let Some(last) = text.strip_suffix(CLOSING_DELIMITER) {
            payload.push_str(last);
            break;
        }
        payload.push_str(text);
    }

    Some(payload)
}
