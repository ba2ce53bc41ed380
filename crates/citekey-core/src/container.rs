/*
 * container.rs
 * Copyright (c) 2026 citekey contributors
 *
 * Access to the XML parts of a DOCX package.
 */

//! Access to the XML parts of a DOCX package.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek, Write};
use std::path::Path;

use tracing::debug;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::Result;

/// Main document body.
pub const MAIN_DOCUMENT_PART: &str = "word/document.xml";

/// Footnotes.
pub const FOOTNOTES_PART: &str = "word/footnotes.xml";

/// A DOCX package opened for reading.
pub struct DocxContainer<R> {
    archive: ZipArchive<R>,
}

impl DocxContainer<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> DocxContainer<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        Ok(Self {
            archive: ZipArchive::new(reader)?,
        })
    }

    /// Read a part as text. A part that does not exist is `None`.
    pub fn read_part(&mut self, name: &str) -> Result<Option<String>> {
        let mut entry = match self.archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let mut content = String::new();
        entry.read_to_string(&mut content)?;
        Ok(Some(content))
    }

    /// Write a copy of the package with some parts replaced.
    ///
    /// Entries not named in `replacements` are copied without recompression.
    /// Replacements for parts the source lacks are appended.
    pub fn write_patched<W: Write + Seek>(
        &mut self,
        out: W,
        replacements: &BTreeMap<String, String>,
    ) -> Result<W> {
        let mut writer = ZipWriter::new(out);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut written = Vec::new();

        for index in 0..self.archive.len() {
            let entry = self.archive.by_index_raw(index)?;
            let name = entry.name().to_string();
            match replacements.get(&name) {
                Some(content) => {
                    drop(entry);
                    debug!(part = %name, "Replacing part");
                    writer.start_file(name.as_str(), options)?;
                    writer.write_all(content.as_bytes())?;
                    written.push(name);
                }
                None => writer.raw_copy_file(entry)?,
            }
        }

        for (name, content) in replacements {
            if !written.contains(name) {
                debug!(part = %name, "Adding part");
                writer.start_file(name.as_str(), options)?;
                writer.write_all(content.as_bytes())?;
            }
        }

        Ok(writer.finish()?)
    }
}
