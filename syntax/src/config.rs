//! Enablement configuration files.
//!
//! A configuration is a flat JSON object keyed by block unique key. Only the
//! `enabled` flag of each entry is restored on load.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::block::{BlockConfig, SyntaxBlock};
use crate::error::{Error, Result};
use crate::schema;

/// Parsed configuration file.
pub type EnableConfig = IndexMap<String, BlockConfig>;

/// Collects the entries of `blocks` that pass the [`SyntaxBlock::to_config`]
/// filter.
#[must_use]
pub fn collect(
    blocks: &IndexMap<String, SyntaxBlock>,
    print_depth: usize,
    verbose: bool,
) -> EnableConfig {
    blocks
        .iter()
        .filter_map(|(key, block)| {
            block
                .to_config(print_depth, verbose)
                .map(|entry| (key.clone(), entry))
        })
        .collect()
}

/// Writes the configuration of `blocks` and returns the written path.
///
/// # Errors
///
/// See [`schema::write_json`].
pub fn write(
    blocks: &IndexMap<String, SyntaxBlock>,
    path: impl AsRef<Path>,
    print_depth: usize,
    verbose: bool,
) -> Result<PathBuf> {
    let config = collect(blocks, print_depth, verbose);
    let written = schema::write_json(&config, path)?;
    tracing::info!(path = %written.display(), entries = config.len(), "wrote syntax configuration");
    Ok(written)
}

/// Reads a configuration file.
///
/// # Errors
///
/// Returns [`Error::Io`] or [`Error::Json`].
pub fn read(path: impl AsRef<Path>) -> Result<EnableConfig> {
    let value = schema::read_json(path)?;
    Ok(serde_json::from_value(value)?)
}

/// Copies the `enabled` flags of `config` onto `blocks`.
///
/// # Errors
///
/// Returns [`Error::UnknownSyntax`] for an entry naming no block; flags
/// applied before the failing entry are kept.
pub fn apply(blocks: &mut IndexMap<String, SyntaxBlock>, config: &EnableConfig) -> Result<()> {
    for (key, entry) in config {
        let block = blocks
            .get_mut(key)
            .ok_or_else(|| Error::UnknownSyntax(key.clone()))?;
        block.enabled = entry.enabled;
    }
    Ok(())
}
