//! Usage and namespace errors raised while generating and composing classes.

use catbird_syntax::Relation;
use thiserror::Error;

/// Result alias used throughout the codegen crate.
pub type Result<T, E = FactoryError> = std::result::Result<T, E>;

/// Failures of class generation, composition and model assembly.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// Schema, constraint or I/O failure from the syntax layer.
    #[error(transparent)]
    Syntax(#[from] catbird_syntax::Error),

    /// No block of that name exists in the schema.
    #[error("cannot find syntax `{0}`")]
    UnknownBlock(String),

    /// The block exists but was not enabled before generation.
    #[error("syntax `{0}` is not enabled")]
    NotEnabled(String),

    /// A relation was chosen that the root does not offer.
    #[error("`{relation}` is not an available mixin of `{root}`")]
    UnavailableRelation {
        /// Root block longname.
        root: String,
        /// The rejected relation.
        relation: Relation,
    },

    /// No class was generated for the chosen name.
    #[error("no generated class `{name}` under `{parent}` {relation}")]
    UnknownClass {
        /// Parent longname.
        parent: String,
        /// Relation to the parent.
        relation: Relation,
        /// Requested class name.
        name: String,
    },

    /// An assignment named an attribute no mixin owns.
    #[error("object type `{block}` does not have attribute `{name}`")]
    UnknownAttribute {
        /// Class name of the block.
        block: String,
        /// The unknown attribute.
        name: String,
    },

    /// Two leaf blocks resolved to the same class namespace entry.
    #[error("duplicated class name `{0}`")]
    DuplicateClass(String),

    /// A collection already holds an entry of that name.
    #[error("collection `{collection}` already contains named block `{name}`")]
    DuplicateEntry {
        /// Collection root name.
        collection: String,
        /// The duplicated lookup name.
        name: String,
    },

    /// A collection has no entry of that name.
    #[error("collection `{collection}` has no block named `{name}`")]
    MissingEntry {
        /// Collection root name.
        collection: String,
        /// The missing lookup name.
        name: String,
    },

    /// A block derived from another root was offered to a collection.
    #[error("collection of `{expected}` cannot hold a `{found}` block")]
    WrongBase {
        /// Root accepted by the collection.
        expected: String,
        /// Root of the rejected block.
        found: String,
    },

    /// Collection construction without any relation choice.
    #[error("must specify a relation type to add `{0}` to a collection")]
    MissingRelation(String),

    /// A model lookup named a block that was never added.
    #[error("model has no block `{0}`")]
    MissingModelBlock(String),

    /// A model block would overwrite an existing one.
    #[error("`{parent}` already has attribute `{name}`")]
    DuplicateAttribute {
        /// Owner of the attribute (`model` at the top level).
        parent: String,
        /// The attribute name.
        name: String,
    },

    /// The block composes no collection mixin.
    #[error("block `{0}` has no collection")]
    NotACollection(String),

    /// A parameter-bearing block cannot become a class.
    #[error("syntax `{0}` has no parent and cannot be generated as a class")]
    RootLeaf(String),

    /// A leaf block was used where a composite root is required.
    #[error("syntax `{0}` is a leaf and offers no mixins")]
    NotARoot(String),
}
