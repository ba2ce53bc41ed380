/*
 * metadata.rs
 * Copyright (c) 2026 citekey contributors
 *
 * Decoding of placeholder payloads into reference records.
 */

//! Decoding of placeholder payloads into reference records.
//!
//! A payload is base64-encoded JSON with no published schema. The parts this
//! crate depends on look like this:
//!
//! ```json
//! {
//!   "Entries": [
//!     {
//!       "Reference": { "Title": "Die Ökonomie", "Subtitle": "Eine Einführung", "Year": "2001" },
//!       "PageRange": {
//!         "StartPage": { "OriginalString": "12" },
//!         "EndPage": { "OriginalString": "14" }
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! `Entries` and every `Reference` are mandatory; anything else is optional.
//! A shape error anywhere rejects the whole payload.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

type Object = Map<String, Value>;

/// One cited work as recorded by the reference manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceRecord {
    /// Title, with the subtitle appended after a single space.
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_end: Option<String>,
}

impl ReferenceRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// The cited pages, `None` when no page information is present.
    ///
    /// `12` + `14` gives `12-14`; an end page equal to the start page is
    /// dropped.
    pub fn pages(&self) -> Option<String> {
        let mut pages = self.page_start.clone().unwrap_or_default();
        if let Some(end) = &self.page_end {
            if *end != pages {
                pages = format!("{}-{}", pages, end);
            }
        }
        (!pages.is_empty()).then_some(pages)
    }
}

/// Coarse classification of [`PayloadError`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadErrorKind {
    /// The payload text is not valid base64.
    DecodeFailure,
    /// The decoded metadata does not have the expected shape.
    MetadataShape,
}

/// Why a payload was rejected.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("decoded payload is not a JSON object")]
    NotAnObject,

    #[error("decoded payload has no `Entries` list")]
    MissingEntries,

    #[error("entry {index} of `Entries` is not an object")]
    EntryNotObject { index: usize },

    #[error("entry {index} of `Entries` has no `Reference` object")]
    MissingReference { index: usize },
}

impl PayloadError {
    pub fn kind(&self) -> PayloadErrorKind {
        match self {
            PayloadError::Base64(_) => PayloadErrorKind::DecodeFailure,
            _ => PayloadErrorKind::MetadataShape,
        }
    }
}

/// Decode an assembled payload into its reference records, in `Entries` order.
///
/// Line breaks inside the base64 text are ignored.
pub fn decode_payload(payload: &str) -> Result<Vec<ReferenceRecord>, PayloadError> {
    let compact: String = payload
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n'))
        .collect();
    let bytes = STANDARD.decode(compact)?;
    let metadata: Value = serde_json::from_slice(&bytes)?;
    parse_metadata(&metadata)
}

/// Extract reference records from already-decoded metadata.
pub fn parse_metadata(metadata: &Value) -> Result<Vec<ReferenceRecord>, PayloadError> {
    let root = metadata.as_object().ok_or(PayloadError::NotAnObject)?;
    let entries = root
        .get("Entries")
        .and_then(Value::as_array)
        .ok_or(PayloadError::MissingEntries)?;

    // Every entry must be an object before any of them is read
    let entries = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            entry
                .as_object()
                .ok_or(PayloadError::EntryNotObject { index })
        })
        .collect::<Result<Vec<_>, _>>()?;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| read_entry(index, entry))
        .collect()
}

fn read_entry(index: usize, entry: &Object) -> Result<ReferenceRecord, PayloadError> {
    let reference =
        object_field(entry, "Reference").ok_or(PayloadError::MissingReference { index })?;

    let mut title = string_field(reference, "Title")
        .unwrap_or_default()
        .to_string();
    if let Some(subtitle) = string_field(reference, "Subtitle") {
        title = format!("{} {}", title, subtitle);
    }

    let page_range = object_field(entry, "PageRange");
    let page = |name: &str| {
        page_range
            .and_then(|range| object_field(range, name))
            .and_then(|page| string_field(page, "OriginalString"))
            .map(str::to_string)
    };

    Ok(ReferenceRecord {
        title,
        year: string_field(reference, "Year").map(str::to_string),
        page_start: page("StartPage"),
        page_end: page("EndPage"),
    })
}

fn object_field<'a>(object: &'a Object, name: &str) -> Option<&'a Object> {
    object.get(name).and_then(Value::as_object)
}

fn string_field<'a>(object: &'a Object, name: &str) -> Option<&'a str> {
    object.get(name).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode(value: &Value) -> String {
        STANDARD.encode(value.to_string())
    }

    fn record(start: Option<&str>, end: Option<&str>) -> ReferenceRecord {
        ReferenceRecord {
            page_start: start.map(str::to_string),
            page_end: end.map(str::to_string),
            ..ReferenceRecord::new("t")
        }
    }

    #[test]
    fn test_page_composition() {
        assert_eq!(record(Some("10"), Some("10")).pages().as_deref(), Some("10"));
        assert_eq!(record(Some("10"), Some("15")).pages().as_deref(), Some("10-15"));
        assert_eq!(record(Some("10"), None).pages().as_deref(), Some("10"));
        assert_eq!(record(None, None).pages(), None);
        assert_eq!(record(None, Some("15")).pages().as_deref(), Some("-15"));
    }

    #[test]
    fn test_decode_full_entry() {
        let payload = encode(&json!({
            "$id": "1",
            "Entries": [{
                "Id": "abc",
                "Reference": {
                    "Title": "Die Ökonomie",
                    "Subtitle": "Eine Einführung",
                    "Year": "2001"
                },
                "PageRange": {
                    "StartPage": { "OriginalString": "12" },
                    "EndPage": { "OriginalString": "14" }
                }
            }]
        }));

        let records = decode_payload(&payload).unwrap();
        assert_eq!(
            records,
            vec![ReferenceRecord {
                title: "Die Ökonomie Eine Einführung".to_string(),
                year: Some("2001".to_string()),
                page_start: Some("12".to_string()),
                page_end: Some("14".to_string()),
            }]
        );
        assert_eq!(records[0].pages().as_deref(), Some("12-14"));
    }

    #[test]
    fn test_page_ranges_stay_with_their_entry() {
        let payload = encode(&json!({
            "Entries": [
                { "Reference": { "Title": "No pages" } },
                {
                    "Reference": { "Title": "With pages" },
                    "PageRange": { "StartPage": { "OriginalString": "5" } }
                }
            ]
        }));

        let records = decode_payload(&payload).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].pages(), None);
        assert_eq!(records[1].pages().as_deref(), Some("5"));
    }

    #[test]
    fn test_optional_fields_of_wrong_type_are_ignored() {
        let payload = encode(&json!({
            "Entries": [{
                "Reference": { "Title": 42, "Year": 2001 },
                "PageRange": { "StartPage": "12" }
            }]
        }));

        let records = decode_payload(&payload).unwrap();
        assert_eq!(records, vec![ReferenceRecord::default()]);
    }

    #[test]
    fn test_subtitle_without_title() {
        let payload = encode(&json!({
            "Entries": [{ "Reference": { "Subtitle": "Only" } }]
        }));
        assert_eq!(decode_payload(&payload).unwrap()[0].title, " Only");
    }

    #[test]
    fn test_empty_entries_list() {
        let payload = encode(&json!({ "Entries": [] }));
        assert!(decode_payload(&payload).unwrap().is_empty());
    }

    #[test]
    fn test_line_wrapped_payload() {
        let payload = encode(&json!({
            "Entries": [{ "Reference": { "Title": "Die Ökonomie", "Year": "2001" } }]
        }));
        let wrapped = payload
            .as_bytes()
            .chunks(16)
            .map(|chunk| std::str::from_utf8(chunk).unwrap())
            .collect::<Vec<_>>()
            .join("\r\n");
        assert!(wrapped.contains("\r\n"));

        let records = decode_payload(&wrapped).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Die Ökonomie");
        assert_eq!(decode_payload(&format!("{payload}\n")).unwrap(), records);
    }

    #[test]
    fn test_invalid_base64() {
        let err = decode_payload("not*base64!").unwrap_err();
        assert!(matches!(err, PayloadError::Base64(_)));
        assert_eq!(err.kind(), PayloadErrorKind::DecodeFailure);
    }

    #[test]
    fn test_invalid_json() {
        let err = decode_payload(&STANDARD.encode("{not json")).unwrap_err();
        assert!(matches!(err, PayloadError::Json(_)));
        assert_eq!(err.kind(), PayloadErrorKind::MetadataShape);
    }

    #[test]
    fn test_missing_entries() {
        for value in [json!({}), json!({ "Entries": {} }), json!({ "entries": [] })] {
            let err = decode_payload(&encode(&value)).unwrap_err();
            assert!(matches!(err, PayloadError::MissingEntries), "{value}");
        }
    }

    #[test]
    fn test_top_level_must_be_object() {
        let err = decode_payload(&encode(&json!([1, 2]))).unwrap_err();
        assert!(matches!(err, PayloadError::NotAnObject));
    }

    #[test]
    fn test_non_object_entry_rejects_payload() {
        let payload = encode(&json!({
            "Entries": [{ "Reference": { "Title": "fine" } }, "oops"]
        }));
        let err = decode_payload(&payload).unwrap_err();
        assert!(matches!(err, PayloadError::EntryNotObject { index: 1 }));
    }

    #[test]
    fn test_missing_reference_rejects_whole_payload() {
        let payload = encode(&json!({
            "Entries": [
                { "Reference": { "Title": "fine" } },
                { "PageRange": {} }
            ]
        }));
        let err = decode_payload(&payload).unwrap_err();
        assert!(matches!(err, PayloadError::MissingReference { index: 1 }));
        assert_eq!(err.kind(), PayloadErrorKind::MetadataShape);
    }

    #[test]
    fn test_records_serialize_without_empty_fields() {
        let json = serde_json::to_value(ReferenceRecord::new("Title")).unwrap();
        assert_eq!(json, json!({ "title": "Title" }));
    }
}
