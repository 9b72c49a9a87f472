//! Shared start-up for the catbird command-line clients.
//!
//! Every client obtains a schema the same way (`--exec` or `--json`),
//! enables either the default syntax or the roots named with `--enable`,
//! applies an optional `--config`, and generates classes.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use catbird_codegen::Factory;
use catbird_syntax::schema;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the stderr log subscriber. `RUST_LOG` overrides the default
/// `info` filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Schema source and syntax selection.
#[derive(Debug, clap::Args)]
pub struct SchemaArgs {
    /// Engine executable to run with `--json`.
    #[arg(
        long,
        value_name = "PATH",
        conflicts_with = "json",
        required_unless_present = "json"
    )]
    pub exec: Option<PathBuf>,

    /// Previously dumped schema file.
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Enablement configuration applied on top of the selected syntax.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Root syntax to enable instead of the default set. Repeatable.
    #[arg(long = "enable", value_name = "BLOCK")]
    pub enable: Vec<String>,
}

impl SchemaArgs {
    /// Builds a factory with classes generated for the selected syntax.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be obtained, a named root is
    /// unknown, the configuration does not apply, or class generation
    /// fails.
    pub fn load(&self) -> Result<Factory> {
        let schema = match (&self.exec, &self.json) {
            (Some(exe), _) => schema::from_exec(exe)
                .with_context(|| format!("failed to dump schema from {}", exe.display()))?,
            (None, Some(path)) => schema::read_json(path)
                .with_context(|| format!("failed to read schema {}", path.display()))?,
            (None, None) => anyhow::bail!("either --exec or --json is required"),
        };

        let mut factory = Factory::new(schema).context("failed to build syntax registry")?;
        if self.enable.is_empty() {
            factory.enable_defaults()?;
        } else {
            for name in &self.enable {
                factory
                    .enable_syntax(name, None)
                    .with_context(|| format!("cannot enable {name}"))?;
            }
        }
        if let Some(path) = &self.config {
            factory
                .load_config(path)
                .with_context(|| format!("failed to apply configuration {}", path.display()))?;
        }
        factory
            .load_enabled_objects()
            .context("failed to generate classes")?;
        tracing::debug!(classes = factory.classes().len(), "factory ready");
        Ok(factory)
    }
}
