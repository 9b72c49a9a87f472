//! One node of the flattened schema.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::relation::{is_structural, Relation};

/// Marker key under which a schema node lists its parameters.
pub const PARAMETERS_KEY: &str = "parameters";

/// Top-level key that holds every root block.
pub const BLOCKS_KEY: &str = "blocks";

/// Separator used to join keys into a unique key.
pub const SEPARATOR: &str = "/";

/// A node in the flattened schema graph.
///
/// Built from the raw key path that leads to it, e.g.
/// `["blocks", "Mesh", "types", "GeneratedMesh", "parameters"]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxPath {
    name: String,
    unique_key: String,
    has_params: bool,
    path: Vec<String>,
    parent: Option<ParentLink>,
    children: IndexMap<Relation, Vec<String>>,
}

/// How a non-root node attaches to its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentLink {
    /// Raw key path of the parent node.
    pub path: Vec<String>,
    /// Unique key of the parent node.
    pub key: String,
    /// Relation of this node to its parent.
    pub relation: Relation,
}

impl SyntaxPath {
    /// Parses a raw key path.
    ///
    /// A trailing `parameters` marker is dropped and sets the has-parameters
    /// flag; the new trailing key is the node name. Walking backwards, the
    /// structural keys directly above the name form the relation to the
    /// parent, and the first non-structural key is the parent. A node whose
    /// walk ends at `blocks` (or at the start of the path) without any other
    /// structural key is a root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedPath`] for empty paths or a walk that
    /// exhausts the path after collecting relation keys, and
    /// [`Error::UnknownRelation`] for a relation sequence outside the
    /// closed vocabulary.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self> {
        let mut keys: Vec<String> = raw.iter().map(|k| k.as_ref().to_owned()).collect();
        let joined = keys.join(SEPARATOR);
        let malformed = |reason| Error::MalformedPath {
            path: joined.clone(),
            reason,
        };

        let mut has_params = false;
        if keys.last().map(String::as_str) == Some(PARAMETERS_KEY) {
            keys.pop();
            has_params = true;
        }
        let name = keys.last().cloned().ok_or_else(|| malformed("no block name"))?;
        if is_structural(&name) {
            return Err(malformed("block name is a structural key"));
        }
        let unique_key = keys.join(SEPARATOR);

        let above = &keys[..keys.len() - 1];
        let parent_pos = above.iter().rposition(|k| !is_structural(k));
        let relation_keys = &above[parent_pos.map_or(0, |p| p + 1)..];

        let parent = match parent_pos {
            Some(pos) => {
                let parent_path = above[..=pos].to_vec();
                Some(ParentLink {
                    key: parent_path.join(SEPARATOR),
                    path: parent_path,
                    relation: Relation::from_keys(relation_keys, &name)?,
                })
            }
            None if relation_keys.is_empty() || relation_keys == [BLOCKS_KEY] => None,
            None => return Err(malformed("relation keys without a parent block")),
        };

        Ok(Self {
            name,
            unique_key,
            has_params,
            path: keys,
            parent,
            children: IndexMap::new(),
        })
    }

    /// Short block name (the last key).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full slash-joined key path, unique within a registry.
    #[must_use]
    pub fn unique_key(&self) -> &str {
        &self.unique_key
    }

    /// Raw key path, without the `parameters` marker.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// True if the node carries a `parameters` mapping.
    #[must_use]
    pub fn has_params(&self) -> bool {
        self.has_params
    }

    /// True if the node has no parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Parent linkage, `None` for roots.
    #[must_use]
    pub fn parent(&self) -> Option<&ParentLink> {
        self.parent.as_ref()
    }

    /// Unique key of the parent, `None` for roots.
    #[must_use]
    pub fn parent_key(&self) -> Option<&str> {
        self.parent.as_ref().map(|p| p.key.as_str())
    }

    /// Relation to the parent, `None` for roots.
    #[must_use]
    pub fn relation(&self) -> Option<Relation> {
        self.parent.as_ref().map(|p| p.relation)
    }

    /// Child unique keys grouped by relation, in insertion order.
    #[must_use]
    pub fn children(&self) -> &IndexMap<Relation, Vec<String>> {
        &self.children
    }

    /// Child unique keys for one relation (empty if none).
    #[must_use]
    pub fn children_of(&self, relation: Relation) -> &[String] {
        self.children.get(&relation).map_or(&[], Vec::as_slice)
    }

    /// True if at least one child hangs off this relation.
    #[must_use]
    pub fn has_child_type(&self, relation: Relation) -> bool {
        !self.children_of(relation).is_empty()
    }

    /// Records `child` under its relation to this node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedPath`] if `child` does not declare this node
    /// as its parent.
    pub fn add_child(&mut self, child: &SyntaxPath) -> Result<()> {
        let link = child
            .parent
            .as_ref()
            .filter(|p| p.key == self.unique_key)
            .ok_or_else(|| Error::MalformedPath {
                path: child.unique_key.clone(),
                reason: "child does not declare this parent",
            })?;
        self.children
            .entry(link.relation)
            .or_default()
            .push(child.unique_key.clone());
        Ok(())
    }

    /// Appends a child key under `relation` without re-validating it.
    pub(crate) fn push_child(&mut self, relation: Relation, child_key: String) {
        self.children.entry(relation).or_default().push(child_key);
    }
}
