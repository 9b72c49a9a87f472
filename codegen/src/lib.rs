//! Catbird class factory.
//!
//! Turns the syntax graph of `catbird-syntax` into type-checked block
//! classes and renders assembled models as engine input files. One
//! [`ClassDef`] is generated per enabled leaf block; a root block becomes
//! instantiable by composing one [`Mixin`] per relation it offers
//! ([`Factory::derive_class`]). Values are assigned through [`Block::set`],
//! which enforces each parameter's declared type, choices and
//! dimensionality.
//!
//! # Entry Point
//!
//! ```
//! use catbird_codegen::{Args, Factory};
//!
//! # fn main() -> Result<(), catbird_codegen::FactoryError> {
//! let schema = serde_json::json!({"blocks": {"Mesh": {"types": {
//!     "GeneratedMesh": {"parameters": {"dim": {"basic_type": "Integer", "default": "2"}}}
//! }}}});
//! let mut factory = Factory::new(schema)?;
//! factory.enable_syntax("Mesh", None)?;
//! factory.load_enabled_objects()?;
//!
//! let mesh = factory.construct_root("Mesh", &Args::new().with("obj_type", "GeneratedMesh"))?;
//! assert_eq!(mesh.to_str(false), "[Mesh]\n  type=GeneratedMesh\n[]\n");
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

pub mod args;
pub mod block;
pub mod class;
pub mod collection;
pub mod emit;
pub mod error;
pub mod factory;
pub mod mapping;
pub mod mixin;
pub mod model;

pub use args::Args;
pub use block::{Block, BlockClass};
pub use class::{ClassDef, ClassKey};
pub use collection::Collection;
pub use error::{FactoryError, Result};
pub use factory::{EnableFilter, Factory, DEFAULT_PRINT_DEPTH};
pub use mixin::{ActionParams, Mixin, ObjectParams, ParamMixin, SystemParams};
pub use model::Model;
