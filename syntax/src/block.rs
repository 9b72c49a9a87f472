//! User-facing view of one registry node.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::path::SEPARATOR;
use crate::registry::AvailableSyntax;
use crate::relation::Relation;

/// Denormalized projection of a [`SyntaxPath`](crate::SyntaxPath) with its
/// registry context. `enabled` is the only state a caller changes.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxBlock {
    /// Short name.
    pub name: String,
    /// Unique key of the node.
    pub path: String,
    /// True if the node carries a `parameters` mapping.
    pub has_params: bool,
    /// Selected for class generation.
    pub enabled: bool,
    /// Relation to the parent, `None` for roots.
    pub relation: Option<Relation>,
    /// Ancestor names, outermost first.
    pub parent_blocks: Vec<String>,
    /// Number of ancestors.
    pub depth: usize,
    /// Child names by relation.
    pub available_syntax: AvailableSyntax,
}

impl SyntaxBlock {
    /// True if no further syntax hangs off this block.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.available_syntax.is_empty()
    }

    /// True if the block has no parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    /// Dotted ancestor chain plus the name, e.g. `Executioner.Predictor`.
    #[must_use]
    pub fn longname(&self) -> String {
        let mut parts = self.parent_blocks.clone();
        parts.push(self.name.clone());
        parts.join(".")
    }

    /// Dotted ancestor chain, `None` for roots.
    #[must_use]
    pub fn parent_longname(&self) -> Option<String> {
        (!self.parent_blocks.is_empty()).then(|| self.parent_blocks.join("."))
    }

    /// Unique key of the child `name` reached through `relation`.
    #[must_use]
    pub fn path_to_child(&self, relation: Relation, name: &str) -> String {
        format!("{}{SEPARATOR}{}{name}", self.path, relation.path_infix())
    }

    /// Relations for which a concrete mixin must be chosen.
    pub fn mixin_relations(&self) -> impl Iterator<Item = Relation> + '_ {
        self.available_syntax.keys().copied()
    }

    /// Configuration entry for this block, or `None` when it is filtered
    /// out: a block is written when it is enabled and shallower than
    /// `print_depth`, or always when `verbose`.
    #[must_use]
    pub fn to_config(&self, print_depth: usize, verbose: bool) -> Option<BlockConfig> {
        if !(verbose || (self.enabled && self.depth < print_depth)) {
            return None;
        }
        let available_syntax = verbose.then(|| {
            self.available_syntax
                .iter()
                .map(|(relation, names)| (relation.as_str().to_owned(), names.clone()))
                .collect()
        });
        Some(BlockConfig {
            name: self.name.clone(),
            enabled: self.enabled,
            params: self.has_params,
            available_syntax,
        })
    }
}

/// One entry of the enablement configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockConfig {
    /// Short block name.
    #[serde(default)]
    pub name: String,
    /// Enabled flag; the only field restored on load.
    pub enabled: bool,
    /// True if the block has parameters.
    #[serde(default)]
    pub params: bool,
    /// Child names by relation display name, written in verbose mode.
    #[serde(
        rename = "available syntax",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub available_syntax: Option<IndexMap<String, Vec<String>>>,
}
