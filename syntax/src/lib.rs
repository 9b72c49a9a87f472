//! Syntax model of a simulation engine's input-file schema.
//!
//! The engine describes every block it understands in one nested JSON
//! document. This crate flattens that document into a [`SyntaxRegistry`] of
//! [`SyntaxPath`] nodes linked by a closed [`Relation`] taxonomy, projects
//! nodes into [`SyntaxBlock`] views, and turns each `parameters` mapping
//! into typed [`Parameter`] descriptors.
//!
//! # Entry Point
//!
//! ```
//! use catbird_syntax::{Relation, SyntaxRegistry};
//!
//! # fn main() -> Result<(), catbird_syntax::Error> {
//! let schema = serde_json::json!({"blocks": {"Mesh": {"types": {
//!     "GeneratedMesh": {"parameters": {"dim": {"basic_type": "Integer", "default": "2"}}},
//!     "FileMesh": {"parameters": {}}
//! }}}});
//! let registry = SyntaxRegistry::build(&schema)?;
//! assert_eq!(
//!     registry.children_of_type("blocks/Mesh", Relation::Type)?,
//!     ["GeneratedMesh", "FileMesh"]
//! );
//! # Ok(())
//! # }
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod block;
pub mod config;
pub mod error;
pub mod param;
pub mod path;
pub mod registry;
pub mod relation;
pub mod schema;

pub use block::{BlockConfig, SyntaxBlock};
pub use config::EnableConfig;
pub use error::{Error, Result};
pub use param::{ParamSet, ParamType, Parameter, ScalarType, Value};
pub use path::{ParentLink, SyntaxPath};
pub use registry::{AvailableSyntax, SyntaxRegistry};
pub use relation::{Flavor, Relation};
