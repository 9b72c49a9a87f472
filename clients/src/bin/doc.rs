//! `catbird-doc`: Prints the parameter documentation of the classes
//! generated from an engine schema.
//!
//! **Outputs:**
//! - stdout, or `<out>` when given: one section per generated class
//!
//! **Usage:**
//! ```
//! catbird-doc (--exec <app> | --json <schema>) [--config <path>]
//!     [--enable <Block>]... [--root <Block>] [--out <path>]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use catbird_clients::{init_logging, SchemaArgs};
use clap::Parser;

/// Print parameter documentation of generated classes.
#[derive(Parser)]
#[command(
    name = "catbird-doc",
    about = "Print parameter documentation of generated classes"
)]
struct Args {
    #[command(flatten)]
    source: SchemaArgs,

    /// Only document classes below this root (dotted longname).
    #[arg(long, value_name = "BLOCK")]
    root: Option<String>,

    /// Write the documentation to a file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let factory = args.source.load()?;
    let mut text = String::new();
    let mut count = 0usize;
    for class in factory.classes().values() {
        let key = class.key();
        if args.root.as_deref().is_some_and(|root| key.parent != root) {
            continue;
        }
        let title = format!("{} ({})", class.longname(), key.relation);
        let _ = writeln!(text, "{title}\n{}\n{}", "=".repeat(title.len()), class.doc());
        count += 1;
    }

    match &args.out {
        Some(path) => {
            fs::write(path, &text).with_context(|| format!("failed to write {}", path.display()))?;
            println!("Documented {count} classes.");
            println!("  Docs: {}", path.display());
        }
        None => print!("{text}"),
    }

    Ok(())
}
