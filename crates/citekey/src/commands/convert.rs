/*
 * convert.rs
 * Copyright (c) 2026 citekey contributors
 *
 * Convert command implementation.
 */

//! Convert command implementation.
//!
//! Resolves every placeholder of the configured parts and writes each
//! converted part to its own XML file. With `--docx` a complete package
//! with the converted parts is written as well. The package is staged in
//! a temporary file next to the target and moved into place once complete.

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use citekey_core::{BibliographyIndex, DocxContainer, convert_container};

/// Arguments for the convert command
#[derive(Debug)]
pub struct ConvertArgs {
    pub input: PathBuf,
    pub bib: PathBuf,
    pub out_dir: PathBuf,
    pub docx: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Execute the convert command
pub fn execute(args: ConvertArgs) -> Result<()> {
    if let Some(docx) = &args.docx {
        ensure_distinct(&args.input, docx)?;
    }

    let config = super::load_config(args.config.as_deref())?;

    let index = BibliographyIndex::open(&args.bib)
        .with_context(|| format!("Failed to load bibliography {}", args.bib.display()))?;
    info!(entries = index.len(), "Loaded bibliography");

    let mut container = DocxContainer::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    let outcome = convert_container(&mut container, &index, &config)
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;

    for part in &outcome.parts {
        let path = args.out_dir.join(&part.output);
        fs::write(&path, &part.xml)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(path = %path.display(), "Wrote converted part");

        println!(
            "{}: {} citations ({} of {} placeholders patched) -> {}",
            part.name,
            part.report.citations,
            part.report.patched,
            part.report.elements,
            path.display()
        );
    }

    if let Some(docx) = &args.docx {
        write_docx(&mut container, docx, &outcome.replacements())?;
        info!(path = %docx.display(), "Wrote converted document");
    }

    println!("Total: {} citations", outcome.total_citations());
    Ok(())
}

/// Refuse a target that resolves to the input document.
fn ensure_distinct(input: &Path, target: &Path) -> Result<()> {
    let same = match (fs::canonicalize(input), fs::canonicalize(target)) {
        (Ok(input), Ok(target)) => input == target,
        _ => input == target,
    };
    if same {
        bail!(
            "Refusing to overwrite the input document {}; choose a different --docx path",
            input.display()
        );
    }
    Ok(())
}

/// Write the patched package to `target` via a temporary file in the same directory.
fn write_docx<R: Read + Seek>(
    container: &mut DocxContainer<R>,
    target: &Path,
    replacements: &BTreeMap<String, String>,
) -> Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create a temporary file in {}", dir.display()))?;

    let mut writer = container
        .write_patched(BufWriter::new(staged), replacements)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    writer.flush()?;
    let staged = writer.into_inner().map_err(|err| err.into_error())?;

    staged
        .persist(target)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    Ok(())
}
