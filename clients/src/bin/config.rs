//! `catbird-config`: Writes the syntax enablement configuration of an
//! engine schema.
//!
//! **Outputs:**
//! - `<out>`: JSON object keyed by syntax path with each block's `enabled`
//!   flag (plus `available syntax` with `--verbose`)
//!
//! **Usage:**
//! ```
//! catbird-config (--exec <app> | --json <schema>) [--config <path>]
//!     [--enable <Block>]... [--out <path>] [--depth <n>] [--verbose]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use catbird_clients::{init_logging, SchemaArgs};
use catbird_codegen::DEFAULT_PRINT_DEPTH;
use clap::Parser;

/// Write the syntax enablement configuration of an engine schema.
#[derive(Parser)]
#[command(
    name = "catbird-config",
    about = "Write the syntax enablement configuration of an engine schema"
)]
struct Args {
    #[command(flatten)]
    source: SchemaArgs,

    /// Configuration file to write (`.json` is appended when missing).
    #[arg(long, default_value = "syntax_config.json")]
    out: PathBuf,

    /// Only blocks shallower than this are written.
    #[arg(long, default_value_t = DEFAULT_PRINT_DEPTH)]
    depth: usize,

    /// Write every block, enabled or not, with its available syntax.
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let factory = args.source.load()?;
    let written = factory
        .write_config(&args.out, args.depth, args.verbose)
        .with_context(|| format!("failed to write {}", args.out.display()))?;

    println!("Syntax configuration written.");
    println!(
        "  Blocks: {} enabled of {}",
        factory.enabled_blocks().count(),
        factory.blocks().len()
    );
    println!("  Classes: {}", factory.classes().len());
    println!("  Config: {}", written.display());

    Ok(())
}
