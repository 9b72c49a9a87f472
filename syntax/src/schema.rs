//! Schema retrieval and raw lookups.
//!
//! The engine prints its schema when run with `--json`, wrapped between two
//! sentinel lines and surrounded by arbitrary log output.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value as Json};

use crate::error::{Error, Result};
use crate::path::{SyntaxPath, PARAMETERS_KEY, SEPARATOR};

/// Line that opens the JSON payload.
pub const START_MARKER: &str = "**START JSON DATA**";

/// Line that closes the JSON payload.
pub const END_MARKER: &str = "**END JSON DATA**";

/// Parses the payload found strictly between the sentinel lines of `output`.
/// A missing end sentinel takes everything up to the end of the output.
///
/// # Errors
///
/// Returns [`Error::MissingPayload`] if the start sentinel is absent or
/// nothing follows it, and [`Error::Json`] if the payload does not parse.
pub fn extract_json(output: &str) -> Result<Json> {
    let missing = || Error::MissingPayload {
        start: START_MARKER,
        end: END_MARKER,
    };
    let mut lines = output.lines();
    lines
        .by_ref()
        .find(|line| line.trim() == START_MARKER)
        .ok_or_else(missing)?;
    let payload: Vec<&str> = lines.take_while(|line| line.trim() != END_MARKER).collect();
    if payload.iter().all(|line| line.trim().is_empty()) {
        return Err(missing());
    }
    Ok(serde_json::from_str(&payload.join("\n"))?)
}

/// Runs `<exe> --json` to completion and parses its schema.
///
/// A non-zero exit status is logged; the payload is still used if present.
///
/// # Errors
///
/// Returns [`Error::Io`] if the process cannot be run, and the errors of
/// [`extract_json`].
pub fn from_exec(exe: impl AsRef<Path>) -> Result<Json> {
    let exe = exe.as_ref();
    tracing::info!(exe = %exe.display(), "requesting schema");
    let output = Command::new(exe)
        .arg("--json")
        .output()
        .map_err(|e| Error::io(exe, e))?;
    if !output.status.success() {
        tracing::warn!(exe = %exe.display(), status = %output.status, "schema dump exited unsuccessfully");
    }
    extract_json(&String::from_utf8_lossy(&output.stdout))
}

/// Reads a JSON document from disk.
///
/// # Errors
///
/// Returns [`Error::Io`] or [`Error::Json`].
pub fn read_json(path: impl AsRef<Path>) -> Result<Json> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

/// Writes `value` as indented JSON, appending a `.json` extension when the
/// path lacks one. Returns the path actually written.
///
/// # Errors
///
/// Returns [`Error::Io`] or [`Error::Json`].
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> Result<PathBuf> {
    let mut path = path.as_ref().to_path_buf();
    if path.extension().map_or(true, |ext| ext != "json") {
        let mut name = path.as_os_str().to_owned();
        name.push(".json");
        path = PathBuf::from(name);
    }
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    fs::write(&path, buf).map_err(|e| Error::io(&path, e))?;
    tracing::debug!(path = %path.display(), "wrote JSON");
    Ok(path)
}

/// Object at the raw key path of `node`.
///
/// # Errors
///
/// Returns [`Error::MissingKey`] if a key is absent or does not hold an
/// object.
pub fn block_at<'a>(schema: &'a Json, node: &SyntaxPath) -> Result<&'a Map<String, Json>> {
    let mut current = schema;
    let mut walked: Vec<&str> = Vec::new();
    for key in node.path() {
        current = current
            .get(key)
            .filter(|v| v.is_object())
            .ok_or_else(|| Error::MissingKey {
                path: walked.join(SEPARATOR),
                key: key.clone(),
            })?;
        walked.push(key);
    }
    current.as_object().ok_or_else(|| Error::MissingKey {
        path: String::new(),
        key: node.unique_key().to_owned(),
    })
}

/// The `parameters` mapping of `node`. A null mapping is returned as
/// `None`.
///
/// # Errors
///
/// Returns [`Error::MissingKey`] if the node has no `parameters` key or it
/// holds something other than an object or null.
pub fn parameters_of<'a>(
    schema: &'a Json,
    node: &SyntaxPath,
) -> Result<Option<&'a Map<String, Json>>> {
    let missing = || Error::MissingKey {
        path: node.unique_key().to_owned(),
        key: PARAMETERS_KEY.to_owned(),
    };
    match block_at(schema, node)?.get(PARAMETERS_KEY) {
        Some(Json::Object(params)) => Ok(Some(params)),
        Some(Json::Null) => Ok(None),
        _ => Err(missing()),
    }
}
