//! Generated parameter-bearing classes.
//!
//! One [`ClassDef`] is generated per enabled leaf block. It owns the typed
//! parameter table of that block and stamps out fresh [`Mixin`] instances
//! for every composite that chooses it.

use std::fmt;

use catbird_syntax::{Flavor, ParamSet, ParamType, Parameter, Relation, ScalarType, SyntaxBlock};
use serde_json::{Map, Value as Json};

use crate::error::{FactoryError, Result};
use crate::mixin::Mixin;

/// Name of the discriminator parameter of object-flavored classes.
pub const TYPE_PARAM: &str = "type";

/// Namespace entry of a generated class: the parent it hangs off, the
/// relation it hangs by, and its own name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassKey {
    /// Parent longname, e.g. `Executioner.Predictor`.
    pub parent: String,
    /// Relation to the parent.
    pub relation: Relation,
    /// Short class name.
    pub name: String,
}

impl ClassKey {
    /// Builds a key.
    pub fn new(parent: impl Into<String>, relation: Relation, name: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            relation,
            name: name.into(),
        }
    }
}

impl fmt::Display for ClassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} ({})", self.parent, self.name, self.relation)
    }
}

/// A class generated from one leaf block.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    key: ClassKey,
    longname: String,
    path: String,
    flavor: Flavor,
    params: ParamSet,
}

impl ClassDef {
    /// Generates the class of a leaf block from its schema `parameters`
    /// mapping (`None` for a block without parameters).
    ///
    /// Object-flavored classes always carry a `type` string parameter whose
    /// default is the block name when the schema leaves it unset.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::RootLeaf`] for a block without a parent, and
    /// any schema error raised while parsing the parameters.
    pub fn from_block(block: &SyntaxBlock, params: Option<&Map<String, Json>>) -> Result<Self> {
        let (Some(relation), Some(parent)) = (block.relation, block.parent_longname()) else {
            return Err(FactoryError::RootLeaf(block.path.clone()));
        };
        let mut table = match params {
            Some(params) => ParamSet::from_schema(params)?,
            None => ParamSet::new(),
        };
        let flavor = relation.flavor();
        if flavor == Flavor::Object {
            inject_type(&mut table, &block.name)?;
        }
        Ok(Self {
            key: ClassKey::new(parent, relation, block.name.clone()),
            longname: block.longname(),
            path: block.path.clone(),
            flavor,
            params: table,
        })
    }

    /// Namespace entry.
    #[must_use]
    pub fn key(&self) -> &ClassKey {
        &self.key
    }

    /// Short class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.key.name
    }

    /// Dotted longname, e.g. `Mesh.GeneratedMesh`.
    #[must_use]
    pub fn longname(&self) -> &str {
        &self.longname
    }

    /// Unique key of the syntax node the class was generated from.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Parameter flavor.
    #[must_use]
    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// Declared parameters at their defaults.
    #[must_use]
    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    /// A fresh mixin instance with every parameter at its default.
    #[must_use]
    pub fn instantiate(&self) -> Mixin {
        Mixin::with_params(self.flavor, self.longname.clone(), self.params.clone())
    }

    /// Parameter documentation of the class.
    #[must_use]
    pub fn doc(&self) -> String {
        param_doc(self.flavor, &self.params)
    }
}

/// Ensures `params` has a `type` string parameter defaulting to `name`.
fn inject_type(params: &mut ParamSet, name: &str) -> Result<()> {
    let declared = params.remove(TYPE_PARAM);
    let param = match declared {
        Some(p) if p.default().is_some_and(|d| d.as_str() != Some("")) => p,
        Some(p) => p.with_default(name)?,
        None => Parameter::new(TYPE_PARAM, ParamType::scalar(ScalarType::String))?
            .with_default(name)?,
    };
    params.add(param)?;
    Ok(())
}

/// Documentation block for one flavor's parameters: header, dash underline,
/// one paragraph per parameter except `type`, and a dashed footer.
#[must_use]
pub fn param_doc(flavor: Flavor, params: &ParamSet) -> String {
    let header = format!("{flavor} Parameters");
    let mut doc = format!("{header}\n{}", "-".repeat(header.len()));
    for param in params.iter().filter(|p| p.name() != TYPE_PARAM) {
        doc.push_str(&param.doc());
    }
    doc.push_str(&"-".repeat(65));
    doc.push('\n');
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use catbird_syntax::{AvailableSyntax, Value};
    use serde_json::json;

    fn leaf(name: &str, relation: Relation) -> SyntaxBlock {
        SyntaxBlock {
            name: name.into(),
            path: format!("blocks/Mesh/{}{name}", relation.path_infix()),
            has_params: true,
            enabled: true,
            relation: Some(relation),
            parent_blocks: vec!["Mesh".into()],
            depth: 1,
            available_syntax: AvailableSyntax::new(),
        }
    }

    fn params() -> Map<String, Json> {
        json!({
            "dim": {"basic_type": "Integer", "default": "2", "description": "Dimension"},
            "type": {"basic_type": "String", "default": ""}
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn object_classes_default_their_type() {
        let class = ClassDef::from_block(&leaf("GeneratedMesh", Relation::Type), Some(&params()))
            .unwrap();
        assert_eq!(class.flavor(), Flavor::Object);
        assert_eq!(class.longname(), "Mesh.GeneratedMesh");
        assert_eq!(class.key(), &ClassKey::new("Mesh", Relation::Type, "GeneratedMesh"));
        let ty = class.params().get(TYPE_PARAM).unwrap();
        assert_eq!(ty.default(), Some(&Value::from("GeneratedMesh")));

        let bare = ClassDef::from_block(&leaf("FileMesh", Relation::Type), None).unwrap();
        assert_eq!(
            bare.params().get(TYPE_PARAM).unwrap().value(),
            Some(&Value::from("FileMesh"))
        );
    }

    #[test]
    fn action_classes_keep_their_table() {
        let class =
            ClassDef::from_block(&leaf("SetupMeshAction", Relation::Action), Some(&params()))
                .unwrap();
        assert_eq!(class.flavor(), Flavor::Action);
        assert_eq!(class.params().get(TYPE_PARAM).unwrap().default(), None);
    }

    #[test]
    fn roots_cannot_be_classes() {
        let mut block = leaf("Mesh", Relation::Type);
        block.relation = None;
        block.parent_blocks.clear();
        assert!(matches!(
            ClassDef::from_block(&block, None),
            Err(FactoryError::RootLeaf(_))
        ));
    }

    #[test]
    fn doc_skips_the_discriminator() {
        let class = ClassDef::from_block(&leaf("GeneratedMesh", Relation::Type), Some(&params()))
            .unwrap();
        let doc = class.doc();
        assert!(doc.starts_with("Object Parameters\n-----------------\n"));
        assert!(doc.contains("dim : Integer\n  Dimension\n  Default value: 2\n"));
        assert!(!doc.contains("type :"));
        assert!(doc.ends_with(&format!("{}\n", "-".repeat(65))));
    }
}
