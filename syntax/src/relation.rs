//! Relation taxonomy between a syntax block and its children.
//!
//! The schema links a parent block to its children through a short sequence
//! of structural keys (`types`, `actions`, `subblocks`, `star/...`). Those
//! sequences form a closed vocabulary; anything outside it is a malformed
//! schema.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// Structural keys that never name a block themselves.
pub const STRUCTURAL_KEYS: &[&str] = &[
    "blocks",
    "subblocks",
    "actions",
    "star",
    "types",
    "subblock_types",
];

/// Returns true if `key` belongs to the structural vocabulary.
#[must_use]
pub fn is_structural(key: &str) -> bool {
    STRUCTURAL_KEYS.contains(&key)
}

/// The parameter flavor a relation contributes to a composed block.
///
/// Each flavor owns its own parameter table inside a composite, so two
/// flavors never share storage even when their parameter names overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flavor {
    /// Unordered object parameters; renders its `type` discriminator first.
    Object,
    /// Ordered action parameters; never renders `type`.
    Action,
    /// Grouping system parameters.
    System,
}

impl Flavor {
    /// Human-readable flavor name used in generated documentation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Flavor::Object => "Object",
            Flavor::Action => "Action",
            Flavor::System => "System",
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a child block hangs off its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relation {
    /// `types/<name>`: one concrete type is chosen for the parent.
    Type,
    /// `actions/<name>`: an action attached to the parent.
    Action,
    /// `subblocks/<name>`: a nested system block.
    System,
    /// `star/...`: any number of named children of the inner flavor.
    Collection(Flavor),
}

impl Relation {
    /// Every relation in canonical order. Available-syntax maps and mixin
    /// lists follow this order.
    pub const ALL: [Relation; 6] = [
        Relation::Type,
        Relation::Action,
        Relation::System,
        Relation::Collection(Flavor::Object),
        Relation::Collection(Flavor::Action),
        Relation::Collection(Flavor::System),
    ];

    /// Maps a sequence of structural keys (parent to child order) onto a
    /// relation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownRelation`] if the sequence is not one of the
    /// six known shapes.
    pub fn from_keys<S: AsRef<str>>(keys: &[S], child: &str) -> Result<Self> {
        let seq: Vec<&str> = keys.iter().map(AsRef::as_ref).collect();
        match seq.as_slice() {
            ["types"] => Ok(Relation::Type),
            ["actions"] => Ok(Relation::Action),
            ["subblocks"] => Ok(Relation::System),
            ["star", "subblock_types"] => Ok(Relation::Collection(Flavor::Object)),
            ["star", "actions"] => Ok(Relation::Collection(Flavor::Action)),
            ["star", "subblocks"] => Ok(Relation::Collection(Flavor::System)),
            _ => Err(Error::UnknownRelation {
                sequence: seq.iter().map(|s| (*s).to_owned()).collect(),
                child: child.to_owned(),
            }),
        }
    }

    /// The structural keys joined as they appear in a unique key, with a
    /// trailing separator (e.g. `"star/subblock_types/"`).
    #[must_use]
    pub fn path_infix(self) -> &'static str {
        match self {
            Relation::Type => "types/",
            Relation::Action => "actions/",
            Relation::System => "subblocks/",
            Relation::Collection(Flavor::Object) => "star/subblock_types/",
            Relation::Collection(Flavor::Action) => "star/actions/",
            Relation::Collection(Flavor::System) => "star/subblocks/",
        }
    }

    /// Display name used in configuration files (e.g. `"type collections"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Relation::Type => "types",
            Relation::Action => "actions",
            Relation::System => "systems",
            Relation::Collection(Flavor::Object) => "type collections",
            Relation::Collection(Flavor::Action) => "action collections",
            Relation::Collection(Flavor::System) => "system collections",
        }
    }

    /// Keyword that selects a concrete class for this relation in
    /// construction arguments (e.g. `obj_type`, `collection_action`).
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Relation::Type => "obj_type",
            Relation::Action => "action",
            Relation::System => "system",
            Relation::Collection(Flavor::Object) => "collection_type",
            Relation::Collection(Flavor::Action) => "collection_action",
            Relation::Collection(Flavor::System) => "collection_system",
        }
    }

    /// Looks up a relation by its construction keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Relation::ALL.into_iter().find(|r| r.keyword() == keyword)
    }

    /// The parameter flavor of a child reached through this relation.
    #[must_use]
    pub fn flavor(self) -> Flavor {
        match self {
            Relation::Type => Flavor::Object,
            Relation::Action => Flavor::Action,
            Relation::System => Flavor::System,
            Relation::Collection(inner) => inner,
        }
    }

    /// Returns true for the `star/...` relations.
    #[must_use]
    pub fn is_collection(self) -> bool {
        matches!(self, Relation::Collection(_))
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Relation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
