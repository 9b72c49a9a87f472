//! Uniquely named children of one root block.

use indexmap::IndexMap;

use crate::block::Block;
use crate::emit::BlockWriter;
use crate::error::{FactoryError, Result};

/// Insertion-ordered blocks keyed by lookup name. Every member must have
/// been derived from the collection's root.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    accepts: String,
    entries: IndexMap<String, Block>,
}

impl Collection {
    /// An empty collection accepting blocks derived from `root`.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            accepts: root.into(),
            entries: IndexMap::new(),
        }
    }

    /// Root longname accepted by the collection.
    #[must_use]
    pub fn accepts(&self) -> &str {
        &self.accepts
    }

    /// Adds `block` under `lookup_name`, which becomes its printed name.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::WrongBase`] if `block` was derived from a
    /// different root, and [`FactoryError::DuplicateEntry`] if the name is
    /// taken.
    pub fn add(&mut self, mut block: Block, lookup_name: impl Into<String>) -> Result<()> {
        let lookup_name = lookup_name.into();
        if block.root() != self.accepts {
            return Err(FactoryError::WrongBase {
                expected: self.accepts.clone(),
                found: block.root().to_owned(),
            });
        }
        if self.entries.contains_key(&lookup_name) {
            return Err(FactoryError::DuplicateEntry {
                collection: self.accepts.clone(),
                name: lookup_name,
            });
        }
        block.set_lookup_name(lookup_name.clone());
        self.entries.insert(lookup_name, block);
        Ok(())
    }

    /// Removes and returns the entry named `lookup_name`.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::MissingEntry`] if there is none.
    pub fn discard(&mut self, lookup_name: &str) -> Result<Block> {
        self.entries
            .shift_remove(lookup_name)
            .ok_or_else(|| FactoryError::MissingEntry {
                collection: self.accepts.clone(),
                name: lookup_name.to_owned(),
            })
    }

    /// True if an entry of that name exists.
    #[must_use]
    pub fn contains(&self, lookup_name: &str) -> bool {
        self.entries.contains_key(lookup_name)
    }

    /// Looks up an entry.
    #[must_use]
    pub fn get(&self, lookup_name: &str) -> Option<&Block> {
        self.entries.get(lookup_name)
    }

    /// Looks up an entry for mutation.
    pub fn get_mut(&mut self, lookup_name: &str) -> Option<&mut Block> {
        self.entries.get_mut(lookup_name)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Block)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders every entry as its own block.
    pub fn write_inner(&self, out: &mut BlockWriter, print_default: bool) {
        for block in self.entries.values() {
            block.write(out, print_default);
        }
    }
}
