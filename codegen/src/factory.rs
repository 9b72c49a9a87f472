//! The class factory.
//!
//! A [`Factory`] runs three phases in order:
//!
//! 1. **Load**: build the [`SyntaxRegistry`] and one [`SyntaxBlock`] per node.
//! 2. **Select**: [`Factory::enable_syntax`] marks the blocks reachable from
//!    a root, optionally filtered per relation.
//! 3. **Generate**: [`Factory::load_enabled_objects`] turns every enabled
//!    leaf into a [`ClassDef`] and records the relations of every enabled
//!    non-leaf block.
//!
//! Composites are then derived on demand by [`Factory::derive_class`].

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use catbird_syntax::path::{BLOCKS_KEY, SEPARATOR};
use catbird_syntax::{config, schema, Relation, SyntaxBlock, SyntaxRegistry};
use indexmap::IndexMap;
use serde_json::Value as Json;

use crate::args::Args;
use crate::block::{Block, BlockClass};
use crate::class::{ClassDef, ClassKey};
use crate::collection::Collection;
use crate::error::{FactoryError, Result};
use crate::mapping::{base_slot, BaseSlot, DEFAULT_SYNTAX};
use crate::mixin::Mixin;

/// Depth bound used when writing a configuration without an explicit one.
pub const DEFAULT_PRINT_DEPTH: usize = 3;

/// Allowed child names per relation for [`Factory::enable_syntax`].
pub type EnableFilter = IndexMap<Relation, Vec<String>>;

/// Owns the syntax graph of one schema, its enabled subset, and the classes
/// generated from it.
#[derive(Debug, Clone)]
pub struct Factory {
    schema: Json,
    registry: SyntaxRegistry,
    blocks: IndexMap<String, SyntaxBlock>,
    classes: IndexMap<ClassKey, ClassDef>,
    root_syntax: IndexMap<String, Vec<Relation>>,
}

/// One position in a composite's mixin list before instantiation.
#[derive(Debug, Clone, Copy)]
enum Slot<'a> {
    Base(BaseSlot),
    Class(&'a ClassDef),
}

impl PartialEq for Slot<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Slot::Base(a), Slot::Base(b)) => a == b,
            (Slot::Class(a), Slot::Class(b)) => a.key() == b.key(),
            _ => false,
        }
    }
}

impl Factory {
    /// Builds the registry and block views of `schema`. Nothing is enabled
    /// and no class is generated yet.
    ///
    /// # Errors
    ///
    /// Returns a schema error if the registry cannot be built.
    pub fn new(schema: Json) -> Result<Self> {
        tracing::info!("constructing syntax registry");
        let registry = SyntaxRegistry::build(&schema)?;
        let blocks = registry.available_blocks()?;
        tracing::info!(nodes = registry.len(), "syntax registry ready");
        Ok(Self {
            schema,
            registry,
            blocks,
            classes: IndexMap::new(),
            root_syntax: IndexMap::new(),
        })
    }

    /// Full start-up on an already loaded schema: build, enable the default
    /// syntax, apply `config` if given, and generate classes.
    ///
    /// # Errors
    ///
    /// Returns the first failure of any phase.
    pub fn load(schema: Json, config: Option<&Path>) -> Result<Self> {
        let mut factory = Self::new(schema)?;
        factory.enable_defaults()?;
        if let Some(path) = config {
            tracing::info!(path = %path.display(), "loading syntax configuration");
            factory.load_config(path)?;
        }
        factory.load_enabled_objects()?;
        Ok(factory)
    }

    /// Full start-up with the schema dumped by `exe --json`.
    ///
    /// # Errors
    ///
    /// Returns an I/O or payload error if the schema cannot be obtained, and
    /// the errors of [`Factory::load`].
    pub fn from_exec(exe: impl AsRef<Path>, config: Option<&Path>) -> Result<Self> {
        tracing::info!("loading syntax from application");
        let schema = schema::from_exec(exe)?;
        Self::load(schema, config)
    }

    /// The raw schema.
    #[must_use]
    pub fn schema(&self) -> &Json {
        &self.schema
    }

    /// The syntax graph.
    #[must_use]
    pub fn registry(&self) -> &SyntaxRegistry {
        &self.registry
    }

    /// Every block view, keyed by unique key.
    #[must_use]
    pub fn blocks(&self) -> &IndexMap<String, SyntaxBlock> {
        &self.blocks
    }

    /// Looks up a block by root name, unique key or dotted longname.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::UnknownBlock`] if nothing matches.
    pub fn block(&self, name: &str) -> Result<&SyntaxBlock> {
        let key = self.resolve(name)?;
        self.blocks
            .get(&key)
            .ok_or_else(|| FactoryError::UnknownBlock(key))
    }

    /// Enabled blocks in registration order.
    pub fn enabled_blocks(&self) -> impl Iterator<Item = &SyntaxBlock> {
        self.blocks.values().filter(|b| b.enabled)
    }

    /// Generated classes keyed by namespace entry.
    #[must_use]
    pub fn classes(&self) -> &IndexMap<ClassKey, ClassDef> {
        &self.classes
    }

    /// Looks up a generated class.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::UnknownClass`] if it was not generated.
    pub fn class(&self, key: &ClassKey) -> Result<&ClassDef> {
        self.classes
            .get(key)
            .ok_or_else(|| FactoryError::UnknownClass {
                parent: key.parent.clone(),
                relation: key.relation,
                name: key.name.clone(),
            })
    }

    /// Relations a root offers to composition, in canonical order. The root
    /// may be named like [`Factory::block`].
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::UnknownBlock`] if nothing matches,
    /// [`FactoryError::RootLeaf`] for an enabled parameter-bearing root,
    /// [`FactoryError::NotARoot`] for any other enabled leaf, and
    /// [`FactoryError::NotEnabled`] for a composite that was not generated.
    pub fn root_relations(&self, root: &str) -> Result<&[Relation]> {
        self.root_entry(root).map(|(_, relations)| relations)
    }

    /// Longname and relations of a generated root.
    fn root_entry(&self, root: &str) -> Result<(&str, &[Relation])> {
        let block = self.block(root)?;
        let longname = block.longname();
        if let Some((name, relations)) = self.root_syntax.get_key_value(&longname) {
            return Ok((name.as_str(), relations.as_slice()));
        }
        Err(match (block.enabled && block.is_leaf(), block.is_root()) {
            (true, true) => FactoryError::RootLeaf(longname),
            (true, false) => FactoryError::NotARoot(longname),
            (false, _) => FactoryError::NotEnabled(longname),
        })
    }

    fn resolve(&self, name: &str) -> Result<String> {
        let rooted = format!("{BLOCKS_KEY}{SEPARATOR}{name}");
        if self.blocks.contains_key(&rooted) {
            return Ok(rooted);
        }
        if self.blocks.contains_key(name) {
            return Ok(name.to_owned());
        }
        self.blocks
            .iter()
            .find(|(_, block)| block.longname() == name)
            .map(|(key, _)| key.clone())
            .ok_or_else(|| FactoryError::UnknownBlock(name.to_owned()))
    }

    /// Enables `name` and everything reachable from it, breadth first.
    ///
    /// With a non-empty `filter`, only relations it lists are followed, and
    /// only to the child names listed for them; the filter applies at every
    /// level. Enabling is additive and idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::UnknownBlock`] if `name` is unknown.
    pub fn enable_syntax(&mut self, name: &str, filter: Option<&EnableFilter>) -> Result<()> {
        let start = self.resolve(name)?;
        let filter = filter.filter(|f| !f.is_empty());
        let mut queue = VecDeque::from([start]);
        let mut enabled = 0usize;

        while let Some(key) = queue.pop_front() {
            let block = self
                .blocks
                .get_mut(&key)
                .ok_or_else(|| FactoryError::UnknownBlock(key.clone()))?;
            block.enabled = true;
            enabled += 1;

            for (relation, children) in &block.available_syntax {
                let allowed = match filter {
                    Some(f) => match f.get(relation) {
                        Some(names) => Some(names),
                        None => continue,
                    },
                    None => None,
                };
                for child in children {
                    if allowed.is_some_and(|names| !names.contains(child)) {
                        continue;
                    }
                    queue.push_back(block.path_to_child(*relation, child));
                }
            }
        }
        tracing::debug!(syntax = name, blocks = enabled, "enabled syntax");
        Ok(())
    }

    /// Enables the default syntax set. Roots absent from the schema are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Propagates errors of [`Factory::enable_syntax`].
    pub fn enable_defaults(&mut self) -> Result<()> {
        tracing::info!("configuring objects to enable");
        for entry in DEFAULT_SYNTAX {
            if self.resolve(entry.name).is_err() {
                tracing::debug!(syntax = entry.name, "default syntax absent from schema");
                continue;
            }
            if entry.types.is_empty() {
                self.enable_syntax(entry.name, None)?;
            } else {
                let mut filter = EnableFilter::new();
                filter.insert(
                    Relation::Type,
                    entry.types.iter().map(|t| (*t).to_owned()).collect(),
                );
                self.enable_syntax(entry.name, Some(&filter))?;
            }
        }
        Ok(())
    }

    /// Regenerates every class from the current enabled set.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::DuplicateClass`] if two leaves claim one
    /// namespace entry, and any schema error raised while parsing
    /// parameters.
    pub fn load_enabled_objects(&mut self) -> Result<()> {
        tracing::info!("loading enabled objects");
        let mut classes = IndexMap::new();
        let mut root_syntax = IndexMap::new();

        for (key, block) in self.blocks.iter().filter(|(_, b)| b.enabled) {
            if !block.is_leaf() {
                let relations: Vec<Relation> = block.mixin_relations().collect();
                tracing::debug!(root = %block.longname(), ?relations, "recorded root mixins");
                root_syntax.insert(block.longname(), relations);
                continue;
            }
            if block.is_root() {
                tracing::debug!(block = %key, "skipping parameter-bearing root");
                continue;
            }
            let node = self.registry.node(key)?;
            let params = if node.has_params() {
                schema::parameters_of(&self.schema, node)?
            } else {
                None
            };
            let class = ClassDef::from_block(block, params)?;
            if classes.contains_key(class.key()) {
                return Err(FactoryError::DuplicateClass(class.key().to_string()));
            }
            tracing::debug!(class = %class.longname(), params = class.params().len(), "generated class");
            classes.insert(class.key().clone(), class);
        }

        tracing::info!(
            classes = classes.len(),
            roots = root_syntax.len(),
            "enabled objects loaded"
        );
        self.classes = classes;
        self.root_syntax = root_syntax;
        Ok(())
    }

    /// Composes a class for `root`.
    ///
    /// Every relation the root offers starts with its base mixin; each entry
    /// of `choices` replaces one with the generated class of that name.
    /// Duplicate mixins collapse to their first occurrence. In collection
    /// mode only the collection relations apply and each stands in with its
    /// element flavor.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::UnavailableRelation`] for a choice the root
    /// does not offer in this mode, [`FactoryError::UnknownClass`] for an
    /// ungenerated class, and the lookup errors of
    /// [`Factory::root_relations`].
    pub fn derive_class(
        &self,
        root: &str,
        class_name: &str,
        choices: &IndexMap<Relation, String>,
        in_collection: bool,
    ) -> Result<BlockClass> {
        let (root, relations) = self.root_entry(root)?;
        let mut slots: IndexMap<Relation, Slot<'_>> = relations
            .iter()
            .filter_map(|&r| base_slot(r, in_collection).map(|base| (r, Slot::Base(base))))
            .collect();

        for (&relation, name) in choices {
            let unavailable = || FactoryError::UnavailableRelation {
                root: root.to_owned(),
                relation,
            };
            if !in_collection && relation.is_collection() {
                return Err(unavailable());
            }
            let slot = slots.get_mut(&relation).ok_or_else(unavailable)?;
            *slot = Slot::Class(self.class(&ClassKey::new(root, relation, name.clone()))?);
        }

        let mut unique: Vec<Slot<'_>> = Vec::with_capacity(slots.len());
        for slot in slots.into_values() {
            if !unique.contains(&slot) {
                unique.push(slot);
            }
        }
        let mixins = unique
            .into_iter()
            .map(|slot| match slot {
                Slot::Base(BaseSlot::Params(flavor)) => Mixin::base(flavor),
                Slot::Base(BaseSlot::Collection) => Mixin::Collection(Collection::new(root)),
                Slot::Class(class) => class.instantiate(),
            })
            .collect();
        Ok(BlockClass::new(class_name, root, mixins))
    }

    /// Constructs a root block and applies the attribute assignments of
    /// `args`.
    ///
    /// # Errors
    ///
    /// See [`Factory::construct`].
    pub fn construct_root(&self, root: &str, args: &Args) -> Result<Block> {
        let longname = self.block(root)?.longname();
        self.construct(&longname, &longname, args, false)
    }

    /// Constructs a block of class `class_name` derived from `root` and
    /// applies the attribute assignments of `args`.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Factory::derive_class`],
    /// [`FactoryError::UnknownAttribute`] for an assignment no mixin owns,
    /// and the constraint violation of a rejected value.
    pub fn construct(
        &self,
        root: &str,
        class_name: &str,
        args: &Args,
        in_collection: bool,
    ) -> Result<Block> {
        let class = self.derive_class(root, class_name, args.choices(), in_collection)?;
        let mut block = class.instantiate();
        for (name, value) in args.params() {
            block.set(name, value.clone())?;
        }
        tracing::debug!(class = class_name, mixins = block.mixins().len(), "constructed block");
        Ok(block)
    }

    /// Writes the enablement configuration and returns the written path.
    ///
    /// # Errors
    ///
    /// Returns an I/O or JSON error.
    pub fn write_config(
        &self,
        path: impl AsRef<Path>,
        print_depth: usize,
        verbose: bool,
    ) -> Result<PathBuf> {
        Ok(config::write(&self.blocks, path, print_depth, verbose)?)
    }

    /// Restores enabled flags from a configuration file. Classes are not
    /// regenerated; call [`Factory::load_enabled_objects`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns an I/O or JSON error, or an unknown-syntax error for an
    /// entry naming no block.
    pub fn load_config(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let entries = config::read(path)?;
        config::apply(&mut self.blocks, &entries)?;
        Ok(())
    }
}
