/*
 * convert.rs
 * Copyright (c) 2026 citekey contributors
 *
 * Running the pipeline over whole parts and packages.
 */

//! Running the pipeline over whole parts and packages.

use std::collections::BTreeMap;
use std::io::{Read, Seek};

use serde::Serialize;
use tracing::info;

use crate::bibliography::BibliographyIndex;
use crate::config::{ConvertConfig, PartConfig, PlaceholderPattern};
use crate::container::DocxContainer;
use crate::error::{CitekeyError, Result};
use crate::metadata::{ReferenceRecord, decode_payload};
use crate::patch::{DocumentPatcher, PatchReport, extract_payload};

/// A converted part.
#[derive(Debug, Clone)]
pub struct PartOutcome {
    /// Part name inside the package, e.g. `word/document.xml`.
    pub name: String,
    /// File name the converted XML is meant to be written to.
    pub output: String,
    /// The rewritten part.
    pub xml: String,
    pub report: PatchReport,
}

/// Outcomes of a package conversion, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct ConversionOutcome {
    pub parts: Vec<PartOutcome>,
}

impl ConversionOutcome {
    pub fn total_citations(&self) -> usize {
        self.parts.iter().map(|p| p.report.citations).sum()
    }

    /// Rewritten parts keyed by part name, for [`DocxContainer::write_patched`].
    pub fn replacements(&self) -> BTreeMap<String, String> {
        self.parts
            .iter()
            .map(|p| (p.name.clone(), p.xml.clone()))
            .collect()
    }
}

/// Parse, patch and serialize a single part.
pub fn convert_part(
    part: &PartConfig,
    xml: &str,
    index: &BibliographyIndex,
    pattern: &PlaceholderPattern,
) -> Result<PartOutcome> {
    let mut document = citekey_xml::parse(xml).map_err(|e| CitekeyError::xml(&part.name, e))?;
    let report = DocumentPatcher::new(index, pattern).patch(&mut document);
    let xml = document
        .to_xml_string()
        .map_err(|e| CitekeyError::xml(&part.name, e))?;

    info!(
        part = %part.name,
        placeholders = report.elements,
        patched = report.patched,
        citations = report.citations,
        "Converted part"
    );

    Ok(PartOutcome {
        name: part.name.clone(),
        output: part.output.clone(),
        xml,
        report,
    })
}

/// Convert every configured part present in `container`.
///
/// Parts are processed independently; absent parts are skipped.
pub fn convert_container<R: Read + Seek>(
    container: &mut DocxContainer<R>,
    index: &BibliographyIndex,
    config: &ConvertConfig,
) -> Result<ConversionOutcome> {
    let pattern = config.placeholder.compile()?;
    let mut outcome = ConversionOutcome::default();

    for part in &config.parts {
        let Some(xml) = container.read_part(&part.name)? else {
            info!(part = %part.name, "Part not present, skipping");
            continue;
        };
        outcome.parts.push(convert_part(part, &xml, index, &pattern)?);
    }

    info!(citations = outcome.total_citations(), "Conversion finished");
    Ok(outcome)
}

/// The decoded content of one placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderPayload {
    /// Zero-based ordinal among the elements matched in the part.
    pub ordinal: usize,
    pub references: Vec<ReferenceRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Placeholders found in one part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartInspection {
    pub part: String,
    pub placeholders: Vec<PlaceholderPayload>,
}

/// Decode every placeholder of a part without changing it.
///
/// Elements without a payload are left out; undecodable payloads are listed
/// with their error.
pub fn inspect_part(
    name: &str,
    xml: &str,
    pattern: &PlaceholderPattern,
) -> Result<PartInspection> {
    let document = citekey_xml::parse(xml).map_err(|e| CitekeyError::xml(name, e))?;

    let placeholders = document
        .root
        .find_all(&pattern.element)
        .into_iter()
        .enumerate()
        .filter_map(|(ordinal, element)| {
            let payload = extract_payload(element, pattern)?;
            Some(match decode_payload(&payload) {
                Ok(references) => PlaceholderPayload {
                    ordinal,
                    references,
                    error: None,
                },
                Err(err) => PlaceholderPayload {
                    ordinal,
                    references: Vec::new(),
                    error: Some(err.to_string()),
                },
            })
        })
        .collect();

    Ok(PartInspection {
        part: name.to_string(),
        placeholders,
    })
}

/// Inspect every configured part present in `container`.
pub fn inspect_container<R: Read + Seek>(
    container: &mut DocxContainer<R>,
    config: &ConvertConfig,
) -> Result<Vec<PartInspection>> {
    let pattern = config.placeholder.compile()?;
    let mut inspections = Vec::new();

    for part in &config.parts {
        if let Some(xml) = container.read_part(&part.name)? {
            inspections.push(inspect_part(&part.name, &xml, &pattern)?);
        }
    }

    Ok(inspections)
}
