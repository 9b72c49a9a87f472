//! Error taxonomy for schema loading, syntax graph construction, and
//! parameter constraints.

use thiserror::Error;

/// Result alias used throughout the syntax crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while turning a schema into syntax blocks
/// or while assigning parameter values.
#[derive(Debug, Error)]
pub enum Error {
    /// A flattened key path could not be parsed into a syntax node.
    #[error("malformed syntax path `{path}`: {reason}")]
    MalformedPath {
        /// The offending path, slash-joined.
        path: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// The structural keys between a child and its parent do not form a
    /// known relation.
    #[error("unknown relation {sequence:?} above block `{child}`")]
    UnknownRelation {
        /// Structural keys in parent-to-child order.
        sequence: Vec<String>,
        /// Name of the child block.
        child: String,
    },

    /// The schema walk reached its nesting bound.
    #[error("schema nesting exceeds {limit} levels at `{path}`")]
    DepthExceeded {
        /// Path at which the bound was hit.
        path: String,
        /// The configured bound.
        limit: usize,
    },

    /// An expected key is absent (or not an object) in the schema.
    #[error("schema entry `{path}` has no object key `{key}`")]
    MissingKey {
        /// Path of the entry being inspected.
        path: String,
        /// The key that was expected.
        key: String,
    },

    /// A `basic_type` tag outside the supported vocabulary.
    #[error("parameter `{param}` has unsupported basic type `{basic_type}`")]
    UnknownBasicType {
        /// Parameter name.
        param: String,
        /// The full `basic_type` string.
        basic_type: String,
    },

    /// An allowed-value option could not be converted to the parameter type.
    #[error("parameter `{param}` lists option `{option}` which is not a valid {expected}")]
    InvalidOption {
        /// Parameter name.
        param: String,
        /// The option text.
        option: String,
        /// Expected element type.
        expected: String,
    },

    /// Two syntax nodes resolved to the same unique key.
    #[error("duplicate syntax key `{0}`")]
    DuplicateKey(String),

    /// A lookup by unique key or block name failed.
    #[error("unknown syntax `{0}`")]
    UnknownSyntax(String),

    /// A parameter name uses the reserved `_syntax_` marker.
    #[error("'_syntax_' is a reserved attribute string; cannot create attribute `{0}`")]
    ReservedName(String),

    /// A parameter was registered twice on one class.
    #[error("attribute `{0}` is already declared")]
    DuplicateParam(String),

    /// A value of the wrong type was assigned.
    #[error("incorrect type `{found}` for attribute `{name}`; expected `{expected}`")]
    TypeMismatch {
        /// Attribute name.
        name: String,
        /// Type of the rejected value.
        found: String,
        /// Declared type.
        expected: String,
    },

    /// A value outside the closed choice set was assigned.
    #[error("value {value} for attribute `{name}` is not one of [{allowed}]")]
    NotAllowed {
        /// Attribute name.
        name: String,
        /// Rendered offending value.
        value: String,
        /// Rendered allowed values.
        allowed: String,
    },

    /// An array of the wrong nesting depth was assigned.
    #[error("attribute `{name}` expects a {expected}-D value, got {found}-D")]
    Dimension {
        /// Attribute name.
        name: String,
        /// Declared dimensionality.
        expected: usize,
        /// Dimensionality of the rejected value.
        found: usize,
    },

    /// The engine's `--json` output had no payload between the sentinels.
    #[error("no JSON payload between `{start}` and `{end}` markers")]
    MissingPayload {
        /// Start sentinel.
        start: &'static str,
        /// End sentinel.
        end: &'static str,
    },

    /// File or process I/O failed.
    #[error("I/O error on `{path}`: {source}")]
    Io {
        /// File or executable involved.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wraps an I/O error with the path it concerns.
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// True for the constraint-violation family (type, choice, dimension).
    #[must_use]
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Error::TypeMismatch { .. } | Error::NotAllowed { .. } | Error::Dimension { .. }
        )
    }
}
