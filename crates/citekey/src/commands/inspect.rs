/*
 * inspect.rs
 * Copyright (c) 2026 citekey contributors
 *
 * Inspect command implementation
 */

//! Inspect command implementation

use std::path::PathBuf;

use anyhow::{Context, Result};

use citekey_core::{DocxContainer, inspect_container};

/// Arguments for the inspect command
#[derive(Debug)]
pub struct InspectArgs {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
}

/// Execute the inspect command
pub fn execute(args: InspectArgs) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;

    let mut container = DocxContainer::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let inspections = inspect_container(&mut container, &config)
        .with_context(|| format!("Failed to inspect {}", args.input.display()))?;

    println!("{}", serde_json::to_string_pretty(&inspections)?);
    Ok(())
}
