//! The flattened syntax graph of one schema.
//!
//! [`SyntaxRegistry::build`] walks the whole schema for every object that
//! carries a `parameters` key, parses each hit into a [`SyntaxPath`], and
//! links it under its parent. Parents that carry no parameters themselves
//! (root blocks such as `blocks/Mesh`) are registered on the way up.

use indexmap::IndexMap;
use serde_json::Value as Json;

use crate::block::SyntaxBlock;
use crate::error::{Error, Result};
use crate::path::{SyntaxPath, PARAMETERS_KEY, SEPARATOR};
use crate::relation::Relation;

/// Nesting bound of the schema walk.
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Child names available under one node, grouped by relation in canonical
/// order. Relations without children are absent.
pub type AvailableSyntax = IndexMap<Relation, Vec<String>>;

/// Finds the key path of every object in `schema` that carries a
/// `parameters` key. Each returned path ends with the `parameters` marker.
///
/// The walk does not descend into an object once it has matched.
///
/// # Errors
///
/// Returns [`Error::DepthExceeded`] if an object nested deeper than
/// `max_depth` keys would have to be inspected.
pub fn find_parameter_paths(schema: &Json, max_depth: usize) -> Result<Vec<Vec<String>>> {
    let mut found = Vec::new();
    let mut trail = Vec::new();
    walk(schema, &mut trail, max_depth, &mut found)?;
    Ok(found)
}

fn walk(
    value: &Json,
    trail: &mut Vec<String>,
    max_depth: usize,
    found: &mut Vec<Vec<String>>,
) -> Result<()> {
    let Json::Object(map) = value else {
        return Ok(());
    };
    if map.contains_key(PARAMETERS_KEY) {
        let mut hit = trail.clone();
        hit.push(PARAMETERS_KEY.to_owned());
        found.push(hit);
        return Ok(());
    }
    if trail.len() >= max_depth {
        if map.values().any(Json::is_object) {
            return Err(Error::DepthExceeded {
                path: trail.join(SEPARATOR),
                limit: max_depth,
            });
        }
        return Ok(());
    }
    for (key, child) in map {
        trail.push(key.clone());
        walk(child, trail, max_depth, found)?;
        trail.pop();
    }
    Ok(())
}

/// Every syntax node of one schema, keyed by unique key.
#[derive(Debug, Clone, Default)]
pub struct SyntaxRegistry {
    nodes: IndexMap<String, SyntaxPath>,
}

impl SyntaxRegistry {
    /// Builds the registry for a schema with the default nesting bound.
    ///
    /// # Errors
    ///
    /// See [`SyntaxRegistry::build_with_depth`].
    pub fn build(schema: &Json) -> Result<Self> {
        Self::build_with_depth(schema, DEFAULT_MAX_DEPTH)
    }

    /// Builds the registry for a schema, bounding the walk at `max_depth`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DepthExceeded`] if the walk hits its bound, and
    /// every error of [`SyntaxRegistry::from_paths`].
    pub fn build_with_depth(schema: &Json, max_depth: usize) -> Result<Self> {
        let paths = find_parameter_paths(schema, max_depth)?;
        let registry = Self::from_paths(&paths)?;
        tracing::debug!(
            candidates = paths.len(),
            nodes = registry.len(),
            "syntax registry built"
        );
        Ok(registry)
    }

    /// Builds the registry from raw key paths.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if two paths share a unique key, and
    /// any parse error of [`SyntaxPath::parse`].
    pub fn from_paths<S: AsRef<str>>(paths: &[Vec<S>]) -> Result<Self> {
        let mut registry = Self::default();
        for raw in paths {
            let node = SyntaxPath::parse(raw)?;
            registry.insert(node)?;
        }
        Ok(registry)
    }

    /// Registers `node`, then its missing ancestors, and links it under its
    /// parent.
    fn insert(&mut self, node: SyntaxPath) -> Result<()> {
        let key = node.unique_key().to_owned();
        if self.nodes.contains_key(&key) {
            return Err(Error::DuplicateKey(key));
        }
        let link = node.parent().cloned();
        self.nodes.insert(key.clone(), node);

        if let Some(link) = link {
            if !self.nodes.contains_key(&link.key) {
                self.insert(SyntaxPath::parse(&link.path)?)?;
            }
            let parent = self
                .nodes
                .get_mut(&link.key)
                .ok_or_else(|| Error::UnknownSyntax(link.key.clone()))?;
            parent.push_child(link.relation, key);
        }
        Ok(())
    }

    /// Looks up a node.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SyntaxPath> {
        self.nodes.get(key)
    }

    /// Looks up a node, failing on unknown keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSyntax`] if `key` is not registered.
    pub fn node(&self, key: &str) -> Result<&SyntaxPath> {
        self.nodes
            .get(key)
            .ok_or_else(|| Error::UnknownSyntax(key.to_owned()))
    }

    /// Number of registered nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Unique keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Nodes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &SyntaxPath> {
        self.nodes.values()
    }

    /// Names of the children of `key` under one relation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSyntax`] if `key` or one of its children is
    /// not registered.
    pub fn children_of_type(&self, key: &str, relation: Relation) -> Result<Vec<&str>> {
        self.node(key)?
            .children_of(relation)
            .iter()
            .map(|child| self.node(child).map(SyntaxPath::name))
            .collect()
    }

    /// Child names of `key` for every relation that has at least one child.
    ///
    /// # Errors
    ///
    /// See [`SyntaxRegistry::children_of_type`].
    pub fn available_syntax(&self, key: &str) -> Result<AvailableSyntax> {
        let mut available = AvailableSyntax::new();
        for relation in Relation::ALL {
            let names = self.children_of_type(key, relation)?;
            if !names.is_empty() {
                available.insert(relation, names.into_iter().map(str::to_owned).collect());
            }
        }
        Ok(available)
    }

    /// Materializes the view of one node. New views start disabled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSyntax`] for an unknown key or a dangling
    /// parent link, and [`Error::MalformedPath`] if the parent chain does
    /// not end at a root.
    pub fn make_block(&self, key: &str) -> Result<SyntaxBlock> {
        let node = self.node(key)?;
        let mut parent_blocks = Vec::new();
        let mut cursor = node;
        while let Some(parent_key) = cursor.parent_key() {
            if parent_blocks.len() >= self.nodes.len() {
                return Err(Error::MalformedPath {
                    path: key.to_owned(),
                    reason: "parent chain does not terminate",
                });
            }
            cursor = self.node(parent_key)?;
            parent_blocks.push(cursor.name().to_owned());
        }
        parent_blocks.reverse();

        Ok(SyntaxBlock {
            name: node.name().to_owned(),
            path: node.unique_key().to_owned(),
            has_params: node.has_params(),
            enabled: false,
            relation: node.relation(),
            depth: parent_blocks.len(),
            parent_blocks,
            available_syntax: self.available_syntax(key)?,
        })
    }

    /// One view per registered node, keyed by unique key, in registration
    /// order.
    ///
    /// # Errors
    ///
    /// See [`SyntaxRegistry::make_block`].
    pub fn available_blocks(&self) -> Result<IndexMap<String, SyntaxBlock>> {
        self.nodes
            .keys()
            .map(|key| Ok((key.clone(), self.make_block(key)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::Flavor;
    use serde_json::json;

    fn schema() -> Json {
        json!({
            "blocks": {
                "Mesh": {
                    "types": {
                        "GeneratedMesh": {"parameters": {"dim": {"basic_type": "Integer"}}},
                        "FileMesh": {"parameters": {}}
                    },
                    "actions": {
                        "SetupMeshAction": {"parameters": {}}
                    }
                },
                "Variables": {
                    "star": {
                        "subblock_types": {"MooseVariable": {"parameters": {}}},
                        "actions": {"AddVariableAction": {"parameters": {}}}
                    }
                },
                "Executioner": {
                    "types": {"Steady": {"parameters": {}}},
                    "subblocks": {
                        "Predictor": {
                            "types": {"SimplePredictor": {"parameters": {}}}
                        }
                    }
                }
            },
            "global": {"parameters": {}}
        })
    }

    #[test]
    fn walk_finds_every_parameter_holder() {
        let paths = find_parameter_paths(&schema(), DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(paths.len(), 8);
        assert_eq!(
            paths[0],
            ["blocks", "Mesh", "types", "GeneratedMesh", "parameters"]
        );
        assert!(paths.iter().all(|p| p.last().map(String::as_str) == Some("parameters")));
    }

    #[test]
    fn walk_enforces_its_bound() {
        let deep = json!({"a": {"b": {"c": {"d": {"parameters": {}}}}}});
        assert_eq!(find_parameter_paths(&deep, 4).unwrap().len(), 1);
        let err = find_parameter_paths(&deep, 3).unwrap_err();
        assert!(matches!(err, Error::DepthExceeded { limit: 3, .. }));
    }

    #[test]
    fn parents_are_registered_and_linked() {
        let reg = SyntaxRegistry::build(&schema()).unwrap();
        let mesh = reg.get("blocks/Mesh").unwrap();
        assert!(mesh.is_root());
        assert!(!mesh.has_params());
        assert_eq!(
            reg.children_of_type("blocks/Mesh", Relation::Type).unwrap(),
            ["GeneratedMesh", "FileMesh"]
        );
        let predictor = reg.get("blocks/Executioner/subblocks/Predictor").unwrap();
        assert_eq!(predictor.relation(), Some(Relation::System));
        assert_eq!(
            reg.children_of_type("blocks/Executioner", Relation::System).unwrap(),
            ["Predictor"]
        );
    }

    #[test]
    fn child_links_are_reciprocal() {
        let reg = SyntaxRegistry::build(&schema()).unwrap();
        for node in reg.iter() {
            if let Some(link) = node.parent() {
                let parent = reg.get(&link.key).unwrap();
                assert!(parent
                    .children_of(link.relation)
                    .iter()
                    .any(|k| k == node.unique_key()));
            }
            for (relation, keys) in node.children() {
                for key in keys {
                    assert_eq!(reg.get(key).unwrap().relation(), Some(*relation));
                }
            }
        }
    }

    #[test]
    fn duplicate_paths_are_rejected() {
        let paths = vec![
            vec!["blocks", "Mesh", "types", "GeneratedMesh", "parameters"],
            vec!["blocks", "Mesh", "types", "GeneratedMesh", "parameters"],
        ];
        let err = SyntaxRegistry::from_paths(&paths).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(ref k) if k == "blocks/Mesh/types/GeneratedMesh"));
    }

    #[test]
    fn available_syntax_follows_canonical_order() {
        let reg = SyntaxRegistry::build(&schema()).unwrap();
        let available = reg.available_syntax("blocks/Variables").unwrap();
        let relations: Vec<_> = available.keys().copied().collect();
        assert_eq!(
            relations,
            [
                Relation::Collection(Flavor::Object),
                Relation::Collection(Flavor::Action)
            ]
        );
        assert!(reg
            .available_syntax("blocks/Mesh/types/FileMesh")
            .unwrap()
            .is_empty());
        assert!(reg.available_syntax("blocks/Nope").is_err());
    }

    #[test]
    fn blocks_know_their_ancestry() {
        let reg = SyntaxRegistry::build(&schema()).unwrap();
        let block = reg
            .make_block("blocks/Executioner/subblocks/Predictor/types/SimplePredictor")
            .unwrap();
        assert_eq!(block.depth, 2);
        assert_eq!(block.parent_blocks, ["Executioner", "Predictor"]);
        assert_eq!(block.longname(), "Executioner.Predictor.SimplePredictor");
        assert!(block.is_leaf());
        assert!(!block.enabled);

        let all = reg.available_blocks().unwrap();
        assert_eq!(all.len(), reg.len());
        assert!(all["blocks/Mesh"].is_root());
        assert!(all["global"].is_root());
    }
}
