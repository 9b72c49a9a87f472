//! Relation → mixin mapping tables.
//!
//! Deterministic tables that decide which base mixin stands in for a
//! relation until the caller chooses a concrete class, and which syntax a
//! factory enables out of the box.

use catbird_syntax::{Flavor, Relation};

/// Base mixin placed in a composite for a relation with no concrete choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseSlot {
    /// An empty parameter table of one flavor.
    Params(Flavor),
    /// The composite's collection of named children.
    Collection,
}

/// Base mixin for `relation`.
///
/// For a root composite every relation has a base: the three collection
/// relations share one [`BaseSlot::Collection`]. For a collection element
/// only the collection relations apply, each standing in with its element
/// flavor.
#[must_use]
pub fn base_slot(relation: Relation, in_collection: bool) -> Option<BaseSlot> {
    match (relation, in_collection) {
        (Relation::Collection(flavor), true) => Some(BaseSlot::Params(flavor)),
        (_, true) => None,
        (Relation::Collection(_), false) => Some(BaseSlot::Collection),
        (other, false) => Some(BaseSlot::Params(other.flavor())),
    }
}

/// One entry of the default enablement set.
#[derive(Debug, Clone, Copy)]
pub struct DefaultSyntax {
    /// Root block name.
    pub name: &'static str,
    /// If non-empty, only these type choices are enabled.
    pub types: &'static [&'static str],
}

/// Syntax enabled by [`Factory::enable_defaults`](crate::Factory::enable_defaults).
pub const DEFAULT_SYNTAX: &[DefaultSyntax] = &[
    DefaultSyntax { name: "Mesh", types: &[] },
    DefaultSyntax {
        name: "Executioner",
        types: &["Steady", "Transient"],
    },
    DefaultSyntax { name: "Problem", types: &[] },
    DefaultSyntax { name: "Variables", types: &[] },
    DefaultSyntax { name: "Kernels", types: &[] },
    DefaultSyntax { name: "BCs", types: &[] },
    DefaultSyntax { name: "Materials", types: &[] },
    DefaultSyntax {
        name: "VectorPostprocessors",
        types: &[],
    },
    DefaultSyntax { name: "Outputs", types: &[] },
];
