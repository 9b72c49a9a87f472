//! Indented-block text writer.
//!
//! Produces the engine's input syntax:
//!
//! ```text
//! [Mesh]
//!   type=GeneratedMesh
//!   [Sub]
//!     param=value
//!   []
//! []
//! ```

use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::Path;

use catbird_syntax::{Parameter, Value};

use crate::error::Result;

/// One level of indentation.
pub const INDENT: &str = "  ";

/// Accumulates rendered blocks.
#[derive(Debug, Default)]
pub struct BlockWriter {
    /// The accumulated text.
    pub buf: String,
}

impl BlockWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `[name]` at `level`.
    pub fn open(&mut self, level: usize, name: &str) {
        let _ = writeln!(self.buf, "{}[{name}]", INDENT.repeat(level));
    }

    /// Writes `[]` at `level`.
    pub fn close(&mut self, level: usize) {
        let _ = writeln!(self.buf, "{}[]", INDENT.repeat(level));
    }

    /// Writes one `name=value` line at `level` unless suppressed. Returns
    /// true if a line was written.
    pub fn attr(&mut self, level: usize, param: &Parameter, force: bool) -> bool {
        match attr_to_str(param, force) {
            Some(text) => {
                let _ = writeln!(self.buf, "{}{text}", INDENT.repeat(level));
                true
            }
            None => false,
        }
    }

    /// Consumes the writer and returns the text.
    #[must_use]
    pub fn finish(self) -> String {
        self.buf
    }
}

/// Renders a value as it appears after `=`. Arrays are single-quoted.
#[must_use]
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Array(_) => format!("'{value}'"),
        scalar => scalar.to_string(),
    }
}

/// `name=value` for a parameter, or `None` when the value equals its
/// default (and `force` is unset) or there is no value at all.
#[must_use]
pub fn attr_to_str(param: &Parameter, force: bool) -> Option<String> {
    if param.is_default() && !force {
        return None;
    }
    let value = param.value()?;
    Some(format!("{}={}", param.name(), format_value(value)))
}

/// Writes `content` to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an I/O error if a directory or the file cannot be written.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| catbird_syntax::Error::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| catbird_syntax::Error::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catbird_syntax::{ParamType, ScalarType};

    #[test]
    fn nested_blocks_indent_by_two() {
        let mut w = BlockWriter::new();
        w.open(0, "Mesh");
        w.open(1, "Sub");
        w.close(1);
        w.close(0);
        assert_eq!(w.finish(), "[Mesh]\n  [Sub]\n  []\n[]\n");
    }

    #[test]
    fn defaults_are_suppressed_unless_forced() {
        let mut p = Parameter::new("dim", ParamType::scalar(ScalarType::Integer))
            .unwrap()
            .with_default(2)
            .unwrap();
        assert_eq!(attr_to_str(&p, false), None);
        assert_eq!(attr_to_str(&p, true).as_deref(), Some("dim=2"));
        p.set(3).unwrap();
        assert_eq!(attr_to_str(&p, false).as_deref(), Some("dim=3"));
    }

    #[test]
    fn arrays_are_quoted() {
        let mut p = Parameter::new("boundary", ParamType::array(ScalarType::String, 1)).unwrap();
        p.set("left right").unwrap();
        let mut w = BlockWriter::new();
        assert!(w.attr(2, &p, false));
        assert_eq!(w.finish(), "    boundary='left right'\n");
    }

    #[test]
    fn valueless_parameters_never_render() {
        let p = Parameter::new("file", ParamType::scalar(ScalarType::String)).unwrap();
        assert_eq!(attr_to_str(&p, true), None);
    }
}
