//! A whole input file assembled from factory-built blocks.

use std::path::Path;

use catbird_syntax::{Flavor, Relation};
use indexmap::IndexMap;

use crate::args::Args;
use crate::block::Block;
use crate::emit;
use crate::error::{FactoryError, Result};
use crate::factory::Factory;

/// Top-level blocks of one input file, keyed by lower-cased attribute name
/// in insertion order.
#[derive(Debug, Clone)]
pub struct Model<'f> {
    factory: &'f Factory,
    blocks: IndexMap<String, Block>,
}

impl<'f> Model<'f> {
    /// An empty model.
    #[must_use]
    pub fn new(factory: &'f Factory) -> Self {
        Self {
            factory,
            blocks: IndexMap::new(),
        }
    }

    /// A steady-state model: `Executioner` (Steady), `Problem`
    /// (FEProblem), `Mesh` (GeneratedMesh), `Variables`, `Kernels`,
    /// `Materials`, `BCs` and `Outputs`.
    ///
    /// # Errors
    ///
    /// Returns the first failure of [`Model::add_syntax`].
    pub fn steady(factory: &'f Factory) -> Result<Self> {
        let mut model = Self::new(factory);
        model.add_syntax("Executioner", Args::new().with("obj_type", "Steady"))?;
        model.add_syntax("Problem", Args::new().with("obj_type", "FEProblem"))?;
        model.add_syntax(
            "Mesh",
            Args::new()
                .with("obj_type", "GeneratedMesh")
                .with("action", "CreateDisplacedProblemAction"),
        )?;
        for name in ["Variables", "Kernels", "Materials", "BCs", "Outputs"] {
            model.add_syntax(name, Args::new())?;
        }
        Ok(model)
    }

    /// A transient model: `Executioner` (Transient), `Mesh`, `Variables`,
    /// `Kernels`, `BCs`, `Materials` and `Outputs` (CommonOutputAction).
    ///
    /// # Errors
    ///
    /// Returns the first failure of [`Model::add_syntax`].
    pub fn transient(factory: &'f Factory) -> Result<Self> {
        let mut model = Self::new(factory);
        model.add_syntax("Executioner", Args::new().with("obj_type", "Transient"))?;
        for name in ["Mesh", "Variables", "Kernels", "BCs", "Materials"] {
            model.add_syntax(name, Args::new())?;
        }
        model.add_syntax("Outputs", Args::new().with("action", "CommonOutputAction"))?;
        Ok(model)
    }

    /// The factory blocks are built with.
    #[must_use]
    pub fn factory(&self) -> &'f Factory {
        self.factory
    }

    /// Constructs the root block `syntax_name` and adds it. A dotted name
    /// such as `Executioner.Predictor` nests the block under the
    /// already-added parent.
    ///
    /// # Errors
    ///
    /// Returns construction errors, [`FactoryError::MissingModelBlock`] if
    /// a parent was never added, and [`FactoryError::DuplicateAttribute`]
    /// if the attribute is taken.
    pub fn add_syntax(&mut self, syntax_name: &str, args: Args) -> Result<()> {
        let block = self.factory.construct_root(syntax_name, &args)?;
        let mut segments = attr_path(syntax_name);
        let attr = segments
            .pop()
            .ok_or_else(|| FactoryError::UnknownBlock(syntax_name.to_owned()))?;
        if segments.is_empty() {
            if self.blocks.contains_key(&attr) {
                return Err(FactoryError::DuplicateAttribute {
                    parent: "model".to_owned(),
                    name: attr,
                });
            }
            self.blocks.insert(attr, block);
            return Ok(());
        }
        self.resolve_mut(&segments)?.add_subblock(attr, block)
    }

    /// Constructs a collection element of class `class_name` and adds it to
    /// the collection of the already-added block `collection_name` under
    /// `object_name`.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::MissingRelation`] if `args` choose no class,
    /// construction errors, and the errors of
    /// [`Collection::add`](crate::Collection::add).
    pub fn add_to_collection(
        &mut self,
        collection_name: &str,
        class_name: &str,
        object_name: &str,
        args: Args,
    ) -> Result<()> {
        if args.choices().is_empty() {
            return Err(FactoryError::MissingRelation(object_name.to_owned()));
        }
        let long_name = format!("{collection_name}.{class_name}");
        let block = self
            .factory
            .construct(collection_name, &long_name, &args, true)?;
        let owner = self.resolve_mut(&attr_path(collection_name))?;
        let owner_name = owner.class_name().to_owned();
        owner
            .collection_mut()
            .ok_or(FactoryError::NotACollection(owner_name))?
            .add(block, object_name)
    }

    /// Adds a variable; the class defaults to `MooseVariable` and the
    /// action to `AddVariableAction`.
    ///
    /// # Errors
    ///
    /// See [`Model::add_to_collection`].
    pub fn add_variable(&mut self, name: &str, args: Args) -> Result<()> {
        let args = args
            .or_relation(Relation::Collection(Flavor::Object), "MooseVariable")
            .or_relation(Relation::Collection(Flavor::Action), "AddVariableAction");
        self.add_to_collection("Variables", "Variable", name, args)
    }

    /// Adds a kernel of class `kernel_type`.
    ///
    /// # Errors
    ///
    /// See [`Model::add_to_collection`].
    pub fn add_kernel(&mut self, name: &str, kernel_type: &str, args: Args) -> Result<()> {
        self.add_typed("Kernels", "Kernel", name, kernel_type, args)
    }

    /// Adds a boundary condition of class `bc_type`.
    ///
    /// # Errors
    ///
    /// See [`Model::add_to_collection`].
    pub fn add_bc(&mut self, name: &str, bc_type: &str, args: Args) -> Result<()> {
        self.add_typed("BCs", "BC", name, bc_type, args)
    }

    /// Adds a material of class `material_type`.
    ///
    /// # Errors
    ///
    /// See [`Model::add_to_collection`].
    pub fn add_material(&mut self, name: &str, material_type: &str, args: Args) -> Result<()> {
        self.add_typed("Materials", "Material", name, material_type, args)
    }

    /// Adds an output of class `output_type`.
    ///
    /// # Errors
    ///
    /// See [`Model::add_to_collection`].
    pub fn add_output(&mut self, name: &str, output_type: &str, args: Args) -> Result<()> {
        self.add_typed("Outputs", "Output", name, output_type, args)
    }

    /// Adds a mesh generator of class `generator_type`.
    ///
    /// # Errors
    ///
    /// See [`Model::add_to_collection`].
    pub fn add_mesh_generator(
        &mut self,
        name: &str,
        generator_type: &str,
        args: Args,
    ) -> Result<()> {
        self.add_typed("Mesh", "MeshGenerator", name, generator_type, args)
    }

    fn add_typed(
        &mut self,
        collection: &str,
        class_name: &str,
        name: &str,
        object_type: &str,
        args: Args,
    ) -> Result<()> {
        let args = args.relation(Relation::Collection(Flavor::Object), object_type);
        self.add_to_collection(collection, class_name, name, args)
    }

    /// Looks up a block by (dotted, case-insensitive) name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Block> {
        let segments = attr_path(name);
        let (first, rest) = segments.split_first()?;
        rest.iter()
            .try_fold(self.blocks.get(first)?, |block, seg| block.subblock(seg))
    }

    /// Looks up a block for mutation.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Block> {
        self.resolve_mut(&attr_path(name)).ok()
    }

    fn resolve_mut(&mut self, segments: &[String]) -> Result<&mut Block> {
        let missing = || FactoryError::MissingModelBlock(segments.join("."));
        let (first, rest) = segments.split_first().ok_or_else(missing)?;
        let mut block = self.blocks.get_mut(first).ok_or_else(missing)?;
        for seg in rest {
            block = block.subblock_mut(seg).ok_or_else(missing)?;
        }
        Ok(block)
    }

    /// Top-level attribute names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.blocks.keys().map(String::as_str)
    }

    /// The whole input file.
    #[must_use]
    pub fn to_str(&self, print_default: bool) -> String {
        self.blocks
            .values()
            .map(|block| block.to_str(print_default))
            .collect()
    }

    /// Writes the input file to `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn write(&self, path: impl AsRef<Path>, print_default: bool) -> Result<()> {
        let path = path.as_ref();
        emit::write_file(path, &self.to_str(print_default))?;
        tracing::info!(path = %path.display(), blocks = self.blocks.len(), "wrote input file");
        Ok(())
    }
}

/// Lower-cased attribute path of a dotted syntax name.
fn attr_path(name: &str) -> Vec<String> {
    name.split('.').map(str::to_lowercase).collect()
}
