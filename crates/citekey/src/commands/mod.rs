//! Command implementations for the citekey CLI
//!
//! Each command module handles the CLI interface and delegates to
//! citekey-core for the actual work.

use std::path::Path;

use anyhow::{Context, Result};
use citekey_core::ConvertConfig;

pub mod convert;
pub mod inspect;

/// Load the configuration file if one was given, defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<ConvertConfig> {
    match path {
        Some(path) => ConvertConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display())),
        None => Ok(ConvertConfig::default()),
    }
}
