//! Whole input files assembled through [`Model`] on a recorded engine schema.

use catbird_codegen::{Args, Factory, FactoryError, Model};
use catbird_syntax::schema;

const FIXTURE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/heat_conduction.json"
);

fn loaded() -> Factory {
    Factory::load(schema::read_json(FIXTURE).unwrap(), None).unwrap()
}

const STEADY_HEAT: &str = "\
[Executioner]
  type=Steady
[]
[Problem]
  type=FEProblem
[]
[Mesh]
  type=GeneratedMesh
  nx=10
[]
[Variables]
  [T]
    type=MooseVariable
  []
[]
[Kernels]
  [heat]
    type=HeatConduction
    variable=T
  []
[]
[Materials]
  [k]
    type=GenericConstantMaterial
    prop_names='thermal_conductivity'
    prop_values='5.0'
  []
[]
[BCs]
  [left]
    type=DirichletBC
    boundary='left'
    value=300.0
    variable=T
  []
  [right]
    type=NeumannBC
    boundary='right'
    value=10.0
    variable=T
  []
[]
[Outputs]
  [out]
    type=Exodus
  []
[]
";

fn steady_heat(factory: &Factory) -> Model<'_> {
    let mut model = Model::steady(factory).unwrap();
    model.get_mut("Mesh").unwrap().set("nx", 10).unwrap();
    model.add_variable("T", Args::new()).unwrap();
    model
        .add_kernel("heat", "HeatConduction", Args::new().with("variable", "T"))
        .unwrap();
    model
        .add_material(
            "k",
            "GenericConstantMaterial",
            Args::new()
                .with("prop_names", "thermal_conductivity")
                .with("prop_values", "5.0"),
        )
        .unwrap();
    model
        .add_bc(
            "left",
            "DirichletBC",
            Args::new()
                .with("variable", "T")
                .with("boundary", "left")
                .with("value", 300.0),
        )
        .unwrap();
    model
        .add_bc(
            "right",
            "NeumannBC",
            Args::new()
                .with("variable", "T")
                .with("boundary", vec!["right"])
                .with("value", 10.0),
        )
        .unwrap();
    model.add_output("out", "Exodus", Args::new()).unwrap();
    model
}

/// A steady heat-conduction input renders every block in insertion order.
#[test]
fn steady_heat_conduction_input() {
    let factory = loaded();
    let model = steady_heat(&factory);
    assert_eq!(model.to_str(false), STEADY_HEAT);
    let names: Vec<&str> = model.names().collect();
    assert_eq!(
        names,
        ["executioner", "problem", "mesh", "variables", "kernels", "materials", "bcs", "outputs"]
    );
}

/// Printing defaults exposes the action parameters chosen by the template.
#[test]
fn steady_template_prints_defaults_on_request() {
    let factory = loaded();
    let model = Model::steady(&factory).unwrap();
    let mesh = model.get("mesh").unwrap();
    assert!(mesh.has_attr("use_displaced_mesh"));
    let full = mesh.to_str(true);
    assert!(full.starts_with("[Mesh]\n  type=GeneratedMesh\n  dim=2\n"), "{full}");
    assert!(full.contains("  use_displaced_mesh=true\n"));
    assert!(!full.contains("displacements="), "no default, nothing to print");
}

/// The transient template picks the output action, whose flags can be set.
#[test]
fn transient_template() {
    let factory = loaded();
    let mut model = Model::transient(&factory).unwrap();
    model.get_mut("outputs").unwrap().set("exodus", true).unwrap();
    {
        let exec = model.get_mut("Executioner").unwrap();
        exec.set("num_steps", 5).unwrap();
        exec.set("dt", 0.5).unwrap();
    }
    let names: Vec<&str> = model.names().collect();
    assert_eq!(
        names,
        ["executioner", "mesh", "variables", "kernels", "bcs", "materials", "outputs"]
    );
    assert_eq!(
        model.to_str(false),
        "[Executioner]\n  type=Transient\n  dt=0.5\n  num_steps=5\n[]\n\
         [Mesh]\n[]\n[Variables]\n[]\n[Kernels]\n[]\n[BCs]\n[]\n[Materials]\n[]\n\
         [Outputs]\n  exodus=true\n[]\n"
    );
}

/// Collection entries keep unique names and render as nested blocks.
#[test]
fn collection_names_are_unique() {
    let factory = loaded();
    let mut model = Model::steady(&factory).unwrap();
    model
        .add_variable("T", Args::new().with("order", "SECOND"))
        .unwrap();
    assert!(matches!(
        model.add_variable("T", Args::new()),
        Err(FactoryError::DuplicateEntry { ref name, .. }) if name == "T"
    ));
    assert_eq!(
        model.get("variables").unwrap().to_str(false),
        "[Variables]\n  [T]\n    type=MooseVariable\n    order=SECOND\n  []\n[]\n"
    );

    let vars = model.get_mut("variables").unwrap().collection_mut().unwrap();
    let t = vars.discard("T").unwrap();
    assert_eq!(t.lookup_name(), Some("T"));
    assert!(vars.is_empty());
    assert!(matches!(
        vars.discard("T"),
        Err(FactoryError::MissingEntry { .. })
    ));
}

/// A collection refuses blocks derived from another root.
#[test]
fn collections_check_their_base() {
    let factory = loaded();
    let mut model = Model::steady(&factory).unwrap();
    let kernel = factory
        .construct(
            "Kernels",
            "Kernels.Kernel",
            &Args::new().with("collection_type", "Diffusion"),
            true,
        )
        .unwrap();
    let vars = model.get_mut("Variables").unwrap().collection_mut().unwrap();
    assert!(matches!(
        vars.add(kernel, "diff"),
        Err(FactoryError::WrongBase { ref expected, ref found })
            if expected == "Variables" && found == "Kernels"
    ));
}

/// Elements need a chosen class, a valid value and an existing owner.
#[test]
fn collection_element_errors() {
    let factory = loaded();
    let mut model = Model::steady(&factory).unwrap();
    assert!(matches!(
        model.add_to_collection("Kernels", "Kernel", "k", Args::new()),
        Err(FactoryError::MissingRelation(_))
    ));
    assert!(matches!(
        model.add_variable("u", Args::new().with("order", "FIFTH")),
        Err(FactoryError::Syntax(ref e)) if e.is_constraint_violation()
    ));
    assert!(matches!(
        model.add_kernel("k", "Convection", Args::new()),
        Err(FactoryError::UnknownClass { .. })
    ));

    let mut bare = Model::new(&factory);
    assert!(matches!(
        bare.add_kernel("k", "Diffusion", Args::new()),
        Err(FactoryError::MissingModelBlock(_))
    ));
}

/// Mesh generators live in the collection of the mesh block.
#[test]
fn mesh_generators_nest_under_mesh() {
    let factory = loaded();
    let mut model = Model::new(&factory);
    model
        .add_syntax("Mesh", Args::new().with("obj_type", "FileMesh").with("file", "plate.e"))
        .unwrap();
    model
        .add_mesh_generator("gen", "GeneratedMeshGenerator", Args::new().with("dim", 2))
        .unwrap();
    assert_eq!(
        model.to_str(false),
        "[Mesh]\n  type=FileMesh\n  file=plate.e\n  [gen]\n    type=GeneratedMeshGenerator\n    dim=2\n  []\n[]\n"
    );
}

/// Dotted syntax names nest under an already-added parent.
#[test]
fn dotted_syntax_nests() {
    let mut factory = loaded();
    factory.enable_syntax("Executioner.Predictor", None).unwrap();
    factory.load_enabled_objects().unwrap();

    let mut model = Model::new(&factory);
    let predictor = Args::new()
        .with("obj_type", "SimplePredictor")
        .with("scale", 0.5);
    assert!(matches!(
        model.add_syntax("Executioner.Predictor", predictor.clone()),
        Err(FactoryError::MissingModelBlock(_))
    ));

    model
        .add_syntax("Executioner", Args::new().with("obj_type", "Steady"))
        .unwrap();
    model.add_syntax("Executioner.Predictor", predictor.clone()).unwrap();
    assert_eq!(
        model.to_str(false),
        "[Executioner]\n  type=Steady\n  [Predictor]\n    type=SimplePredictor\n    scale=0.5\n  []\n[]\n"
    );
    assert!(model.get("executioner.predictor").is_some());
    assert!(matches!(
        model.add_syntax("Executioner.Predictor", predictor),
        Err(FactoryError::DuplicateAttribute { .. })
    ));
    assert!(matches!(
        model.add_syntax("Executioner", Args::new()),
        Err(FactoryError::DuplicateAttribute { .. })
    ));
}

/// Element documentation concatenates the chosen mixins.
#[test]
fn element_doc_concatenates_mixins() {
    let factory = loaded();
    let mut model = Model::steady(&factory).unwrap();
    model.add_variable("T", Args::new()).unwrap();
    let var = model
        .get("variables")
        .and_then(|v| v.collection())
        .and_then(|c| c.get("T"))
        .unwrap();
    let doc = var.doc();
    let object = doc.find("Object Parameters").unwrap();
    let action = doc.find("Action Parameters").unwrap();
    assert!(object < action);
    assert!(doc.contains("\nfamily : String\n"));
    assert_eq!(doc.matches("\norder : String\n").count(), 1);
}

/// Writing creates missing directories and stores the rendered text.
#[test]
fn write_creates_directories() {
    let dir = tempfile::tempdir().unwrap();
    let factory = loaded();
    let model = steady_heat(&factory);
    let path = dir.path().join("inputs").join("steady.i");
    model.write(&path, false).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), STEADY_HEAT);
}
