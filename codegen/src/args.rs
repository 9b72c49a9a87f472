//! Construction arguments: relation choices plus attribute assignments.

use catbird_syntax::{Relation, Value};
use indexmap::IndexMap;

/// Arguments of [`Factory::construct_root`](crate::Factory::construct_root)
/// and [`Factory::construct`](crate::Factory::construct).
///
/// ```
/// use catbird_codegen::Args;
/// use catbird_syntax::Relation;
///
/// let args = Args::new()
///     .with("obj_type", "GeneratedMesh")
///     .with("nx", 10);
/// assert_eq!(args.choice(Relation::Type), Some("GeneratedMesh"));
/// assert_eq!(args.params().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    choices: IndexMap<Relation, String>,
    params: IndexMap<String, Value>,
}

impl Args {
    /// No choices and no assignments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a keyword argument. Relation keywords (`obj_type`, `action`,
    /// `system`, `collection_type`, `collection_action`,
    /// `collection_system`) choose a class; anything else assigns an
    /// attribute.
    #[must_use]
    pub fn with(self, keyword: &str, value: impl Into<Value>) -> Self {
        match Relation::from_keyword(keyword) {
            Some(relation) => self.relation(relation, value.into().to_string()),
            None => self.param(keyword, value),
        }
    }

    /// Chooses the class `name` for `relation`.
    #[must_use]
    pub fn relation(mut self, relation: Relation, name: impl Into<String>) -> Self {
        self.choices.insert(relation, name.into());
        self
    }

    /// Chooses `name` for `relation` unless a choice already exists.
    #[must_use]
    pub fn or_relation(mut self, relation: Relation, name: impl Into<String>) -> Self {
        self.choices.entry(relation).or_insert_with(|| name.into());
        self
    }

    /// Assigns an attribute.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// The class chosen for `relation`, if any.
    #[must_use]
    pub fn choice(&self, relation: Relation) -> Option<&str> {
        self.choices.get(&relation).map(String::as_str)
    }

    /// Relation choices in the order given.
    #[must_use]
    pub fn choices(&self) -> &IndexMap<Relation, String> {
        &self.choices
    }

    /// Attribute assignments in the order given.
    #[must_use]
    pub fn params(&self) -> &IndexMap<String, Value> {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catbird_syntax::Flavor;

    #[test]
    fn keywords_split_into_choices_and_params() {
        let args = Args::new()
            .with("collection_type", "MooseVariable")
            .with("collection_action", "AddVariableAction")
            .with("order", "SECOND");
        assert_eq!(
            args.choice(Relation::Collection(Flavor::Object)),
            Some("MooseVariable")
        );
        assert_eq!(
            args.choice(Relation::Collection(Flavor::Action)),
            Some("AddVariableAction")
        );
        assert_eq!(args.params()["order"], Value::from("SECOND"));
    }

    #[test]
    fn or_relation_keeps_explicit_choices() {
        let args = Args::new()
            .relation(Relation::Type, "FileMesh")
            .or_relation(Relation::Type, "GeneratedMesh")
            .or_relation(Relation::Action, "SetupMeshAction");
        assert_eq!(args.choice(Relation::Type), Some("FileMesh"));
        assert_eq!(args.choice(Relation::Action), Some("SetupMeshAction"));
    }
}
