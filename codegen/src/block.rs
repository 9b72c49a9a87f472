//! Composite blocks.
//!
//! A [`BlockClass`] is the composition of one mixin per relation a root
//! block offers. A [`Block`] is one instance of it: the values a model
//! assigns live there, and it renders itself as one bracketed block.

use std::collections::HashSet;

use catbird_syntax::{Parameter, Value};
use indexmap::IndexMap;

use crate::collection::Collection;
use crate::emit::{self, BlockWriter};
use crate::error::{FactoryError, Result};
use crate::mixin::Mixin;

/// A composed class: ordered mixins with attribute collisions resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockClass {
    class_name: String,
    root: String,
    mixins: Vec<Mixin>,
}

impl BlockClass {
    /// Composes `mixins` in order. When two mixins declare the same
    /// attribute the first keeps it and the later one drops it with a
    /// warning.
    #[must_use]
    pub fn new(
        class_name: impl Into<String>,
        root: impl Into<String>,
        mut mixins: Vec<Mixin>,
    ) -> Self {
        let class_name = class_name.into();
        let mut owned: HashSet<String> = HashSet::new();
        for mixin in &mut mixins {
            let Some(view) = mixin.as_params_mut() else {
                continue;
            };
            let params = view.params_mut();
            let collided: Vec<String> = params
                .names()
                .filter(|name| owned.contains(*name))
                .map(str::to_owned)
                .collect();
            for name in &collided {
                tracing::warn!(
                    attribute = %name,
                    class = %class_name,
                    "syntax collision between mixins; keeping the first"
                );
                params.remove(name);
            }
            owned.extend(params.names().map(str::to_owned));
        }
        Self {
            class_name,
            root: root.into(),
            mixins,
        }
    }

    /// Dotted class name.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Root longname the class was derived from.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Mixins in composition order.
    #[must_use]
    pub fn mixins(&self) -> &[Mixin] {
        &self.mixins
    }

    /// A fresh instance with every attribute at its default.
    #[must_use]
    pub fn instantiate(&self) -> Block {
        Block {
            class_name: self.class_name.clone(),
            root: self.root.clone(),
            lookup_name: None,
            mixins: self.mixins.clone(),
            subblocks: IndexMap::new(),
        }
    }

    /// Concatenated parameter documentation of the mixins.
    #[must_use]
    pub fn doc(&self) -> String {
        self.mixins.iter().map(Mixin::doc).collect()
    }
}

/// One constructed block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    class_name: String,
    root: String,
    lookup_name: Option<String>,
    mixins: Vec<Mixin>,
    subblocks: IndexMap<String, Block>,
}

impl Block {
    /// Dotted class name, e.g. `Variables.Variable`.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Root longname the block was derived from.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Name set by the owning collection, if any.
    #[must_use]
    pub fn lookup_name(&self) -> Option<&str> {
        self.lookup_name.as_deref()
    }

    pub(crate) fn set_lookup_name(&mut self, name: String) {
        self.lookup_name = Some(name);
    }

    /// Name printed in the block header: the lookup name if set, else the
    /// last segment of the class name.
    #[must_use]
    pub fn print_name(&self) -> &str {
        self.lookup_name.as_deref().unwrap_or_else(|| {
            self.class_name
                .rsplit('.')
                .next()
                .unwrap_or(&self.class_name)
        })
    }

    /// Nesting depth below the model root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.class_name.matches('.').count()
    }

    /// Mixins in composition order.
    #[must_use]
    pub fn mixins(&self) -> &[Mixin] {
        &self.mixins
    }

    /// The first mixin that owns `name`.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::UnknownAttribute`] if no mixin owns it.
    pub fn lookup_param(&self, name: &str) -> Result<&Parameter> {
        self.mixins
            .iter()
            .filter_map(Mixin::as_params)
            .find_map(|m| m.param(name))
            .ok_or_else(|| self.unknown(name))
    }

    fn lookup_param_mut(&mut self, name: &str) -> Result<&mut Parameter> {
        let found = self
            .mixins
            .iter_mut()
            .filter_map(Mixin::as_params_mut)
            .find_map(|m| m.params_mut().get_mut(name));
        match found {
            Some(param) => Ok(param),
            None => Err(FactoryError::UnknownAttribute {
                block: self.class_name.clone(),
                name: name.to_owned(),
            }),
        }
    }

    /// True if an attribute of that name exists.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.lookup_param(name).is_ok()
    }

    /// Every attribute name, in mixin order.
    pub fn attr_names(&self) -> impl Iterator<Item = &str> {
        self.mixins
            .iter()
            .filter_map(Mixin::as_params)
            .flat_map(|m| m.params().names())
    }

    /// Current value of an attribute.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::UnknownAttribute`] if no mixin owns it.
    pub fn get(&self, name: &str) -> Result<Option<&Value>> {
        Ok(self.lookup_param(name)?.value())
    }

    /// Assigns an attribute. On failure the old value is kept.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::UnknownAttribute`] for an unknown name and
    /// the constraint violations of [`Parameter::set`].
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.lookup_param_mut(name)?.set(value)?;
        Ok(())
    }

    /// True if an attribute holds its default.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::UnknownAttribute`] if no mixin owns it.
    pub fn is_default(&self, name: &str) -> Result<bool> {
        Ok(self.lookup_param(name)?.is_default())
    }

    /// `name=value`, or an empty string when suppressed.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::UnknownAttribute`] if no mixin owns it.
    pub fn attr_to_str(&self, name: &str, print_default: bool) -> Result<String> {
        let param = self.lookup_param(name)?;
        Ok(emit::attr_to_str(param, print_default).unwrap_or_default())
    }

    /// The composed collection, if any.
    #[must_use]
    pub fn collection(&self) -> Option<&Collection> {
        self.mixins.iter().find_map(Mixin::as_collection)
    }

    /// The composed collection for mutation, if any.
    pub fn collection_mut(&mut self) -> Option<&mut Collection> {
        self.mixins.iter_mut().find_map(Mixin::as_collection_mut)
    }

    /// Nested blocks keyed by attribute name.
    #[must_use]
    pub fn subblocks(&self) -> &IndexMap<String, Block> {
        &self.subblocks
    }

    /// Looks up a nested block.
    #[must_use]
    pub fn subblock(&self, attr: &str) -> Option<&Block> {
        self.subblocks.get(attr)
    }

    /// Looks up a nested block for mutation.
    pub fn subblock_mut(&mut self, attr: &str) -> Option<&mut Block> {
        self.subblocks.get_mut(attr)
    }

    /// Nests `block` under `attr`.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::DuplicateAttribute`] if `attr` is taken.
    pub fn add_subblock(&mut self, attr: impl Into<String>, block: Block) -> Result<()> {
        let attr = attr.into();
        if self.subblocks.contains_key(&attr) {
            return Err(FactoryError::DuplicateAttribute {
                parent: self.class_name.clone(),
                name: attr,
            });
        }
        self.subblocks.insert(attr, block);
        Ok(())
    }

    /// Rendered attributes, collection entries and nested blocks, without
    /// the enclosing header.
    #[must_use]
    pub fn inner_to_str(&self, print_default: bool) -> String {
        let mut out = BlockWriter::new();
        self.write_body(&mut out, print_default);
        out.finish()
    }

    /// The block rendered with its header and closing line.
    #[must_use]
    pub fn to_str(&self, print_default: bool) -> String {
        let mut out = BlockWriter::new();
        self.write(&mut out, print_default);
        out.finish()
    }

    /// Renders the block into `out`.
    pub fn write(&self, out: &mut BlockWriter, print_default: bool) {
        let depth = self.depth();
        out.open(depth, self.print_name());
        self.write_body(out, print_default);
        out.close(depth);
    }

    fn write_body(&self, out: &mut BlockWriter, print_default: bool) {
        let level = self.depth() + 1;
        for mixin in &self.mixins {
            mixin.write_inner(out, level, print_default);
        }
        for sub in self.subblocks.values() {
            sub.write(out, print_default);
        }
    }

    /// Concatenated parameter documentation of the mixins.
    #[must_use]
    pub fn doc(&self) -> String {
        self.mixins.iter().map(Mixin::doc).collect()
    }

    fn unknown(&self, name: &str) -> FactoryError {
        FactoryError::UnknownAttribute {
            block: self.class_name.clone(),
            name: name.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catbird_syntax::{Flavor, ParamSet, ParamType, ScalarType};

    fn table(params: &[(&str, i64)]) -> ParamSet {
        let mut set = ParamSet::new();
        for (name, default) in params {
            set.add(
                Parameter::new(*name, ParamType::scalar(ScalarType::Integer))
                    .unwrap()
                    .with_default(*default)
                    .unwrap(),
            )
            .unwrap();
        }
        set
    }

    fn mesh() -> BlockClass {
        BlockClass::new(
            "Mesh",
            "Mesh",
            vec![
                Mixin::with_params(
                    Flavor::Object,
                    "Mesh.GeneratedMesh".into(),
                    table(&[("dim", 2), ("nx", 1)]),
                ),
                Mixin::with_params(
                    Flavor::Action,
                    "Mesh.SetupMeshAction".into(),
                    table(&[("dim", 3), ("uniform_refine", 0)]),
                ),
            ],
        )
    }

    #[test]
    fn union_of_mixins_first_writer_wins() {
        let block = mesh().instantiate();
        let names: Vec<&str> = block.attr_names().collect();
        assert_eq!(names, ["dim", "nx", "uniform_refine"]);
        assert_eq!(block.get("dim").unwrap(), Some(&Value::Integer(2)));
    }

    #[test]
    fn assignment_is_validated() {
        let mut block = mesh().instantiate();
        block.set("nx", 10).unwrap();
        assert!(!block.is_default("nx").unwrap());
        assert!(matches!(
            block.set("ny", 1),
            Err(FactoryError::UnknownAttribute { ref name, .. }) if name == "ny"
        ));
        assert!(matches!(block.set("nx", "ten"), Err(FactoryError::Syntax(_))));
        assert_eq!(block.get("nx").unwrap(), Some(&Value::Integer(10)));
        assert_eq!(block.attr_to_str("nx", false).unwrap(), "nx=10");
        assert_eq!(block.attr_to_str("dim", true).unwrap(), "dim=2");
    }

    #[test]
    fn fresh_instances_render_nothing_but_the_header() {
        let block = mesh().instantiate();
        for name in block.attr_names() {
            assert!(block.is_default(name).unwrap());
            assert_eq!(block.attr_to_str(name, false).unwrap(), "");
        }
        assert_eq!(block.to_str(false), "[Mesh]\n[]\n");
        assert_eq!(
            block.to_str(true),
            "[Mesh]\n  dim=2\n  nx=1\n  uniform_refine=0\n[]\n"
        );
    }

    #[test]
    fn subblocks_render_nested() {
        let mut exec = BlockClass::new("Executioner", "Executioner", Vec::new()).instantiate();
        let mut predictor = BlockClass::new(
            "Executioner.Predictor",
            "Executioner.Predictor",
            vec![Mixin::with_params(Flavor::Object, "P".into(), table(&[("scale", 1)]))],
        )
        .instantiate();
        predictor.set("scale", 2).unwrap();
        exec.add_subblock("predictor", predictor.clone()).unwrap();
        assert!(exec.add_subblock("predictor", predictor).is_err());
        assert_eq!(
            exec.to_str(false),
            "[Executioner]\n  [Predictor]\n    scale=2\n  []\n[]\n"
        );
    }
}
