/*
 * config.rs
 * Copyright (c) 2026 citekey contributors
 *
 * Conversion configuration.
 */

//! Conversion configuration.
//!
//! All settings have defaults matching Citavi placeholders in Word
//! documents, so a configuration file is only needed for other layouts.
//!
//! ```toml
//! [placeholder]
//! element = "//sdt"
//! fragments = ".//instrText"
//! marker = "ADDIN CitaviPlaceholder"
//! text_node = "./sdtContent//r/t"
//!
//! [[parts]]
//! name = "word/document.xml"
//! output = "NEWDOC.xml"
//! ```

use std::collections::HashSet;
use std::path::Path;

use citekey_xml::XmlPath;
use serde::{Deserialize, Serialize};

use crate::container::{FOOTNOTES_PART, MAIN_DOCUMENT_PART};
use crate::error::{CitekeyError, Result};
use crate::payload::CITAVI_MARKER;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    pub placeholder: PlaceholderConfig,
    /// Document parts to convert, in processing order.
    pub parts: Vec<PartConfig>,
}

/// Where placeholders live in a part and how to recognise them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaceholderConfig {
    /// Path to placeholder elements, searched from the part's root element.
    pub element: String,
    /// Path to the payload fragments, relative to a placeholder.
    pub fragments: String,
    /// Text the first fragment must start with.
    pub marker: String,
    /// Path to the visible text node, relative to a placeholder.
    pub text_node: String,
}

/// One document part and the file its converted XML is written to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartConfig {
    pub name: String,
    pub output: String,
}

/// Compiled form of [`PlaceholderConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderPattern {
    pub element: XmlPath,
    pub fragments: XmlPath,
    pub marker: String,
    pub text_node: XmlPath,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            placeholder: PlaceholderConfig::default(),
            parts: vec![
                PartConfig::new(MAIN_DOCUMENT_PART, "NEWDOC.xml"),
                PartConfig::new(FOOTNOTES_PART, "NEWFN.xml"),
            ],
        }
    }
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            element: "//sdt".to_string(),
            fragments: ".//instrText".to_string(),
            marker: CITAVI_MARKER.to_string(),
            text_node: "./sdtContent//r/t".to_string(),
        }
    }
}

impl PartConfig {
    pub fn new(name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            output: output.into(),
        }
    }
}

impl ConvertConfig {
    /// Parse and validate a TOML configuration.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|e| CitekeyError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Check the configuration before any document is touched.
    pub fn validate(&self) -> Result<()> {
        self.placeholder.compile()?;

        if self.parts.is_empty() {
            return Err(CitekeyError::config("no document parts configured"));
        }

        let mut outputs = HashSet::new();
        for part in &self.parts {
            if part.name.trim().is_empty() || part.output.trim().is_empty() {
                return Err(CitekeyError::config(
                    "document parts need a name and an output file",
                ));
            }
            if !outputs.insert(part.output.as_str()) {
                return Err(CitekeyError::config(format!(
                    "output file '{}' is used by more than one part",
                    part.output
                )));
            }
        }

        Ok(())
    }
}

impl PlaceholderConfig {
    /// Compile the element paths.
    pub fn compile(&self) -> Result<PlaceholderPattern> {
        if self.marker.is_empty() {
            return Err(CitekeyError::config("placeholder marker must not be empty"));
        }

        let path = |source: &str| {
            XmlPath::parse(source).map_err(|e| CitekeyError::config(e.to_string()))
        };

        Ok(PlaceholderPattern {
            element: path(&self.element)?,
            fragments: path(&self.fragments)?,
            marker: self.marker.clone(),
            text_node: path(&self.text_node)?,
        })
    }
}
