//! The parameter flavors a composite block is built from.
//!
//! Each flavor keeps its own [`ParamSet`], so a composite that mixes an
//! object, an action and a collection never shares storage between them.
//! Flavors differ only in how they order their attributes when rendering.

use catbird_syntax::{Flavor, ParamSet, Parameter};

use crate::class::{param_doc, TYPE_PARAM};
use crate::collection::Collection;
use crate::emit::{attr_to_str, BlockWriter};

/// Shared behavior of the parameter-bearing flavors.
pub trait ParamMixin {
    /// The flavor.
    fn flavor(&self) -> Flavor;

    /// Longname of the generated class, empty for a base stand-in.
    fn class_name(&self) -> &str;

    /// Parameter table.
    fn params(&self) -> &ParamSet;

    /// Parameter table for mutation.
    fn params_mut(&mut self) -> &mut ParamSet;

    /// Attributes in rendering order, each with its forced-visible flag.
    fn render_plan(&self) -> Vec<(&str, bool)>;

    /// Looks up one parameter.
    fn param(&self, name: &str) -> Option<&Parameter> {
        self.params().get(name)
    }

    /// `Some(true)` if `name` holds its default, `None` if not owned.
    fn is_default(&self, name: &str) -> Option<bool> {
        self.param(name).map(Parameter::is_default)
    }

    /// `name=value`, or an empty string when suppressed; `None` if not
    /// owned.
    fn attr_to_str(&self, name: &str, print_default: bool) -> Option<String> {
        self.param(name)
            .map(|p| attr_to_str(p, print_default).unwrap_or_default())
    }

    /// Renders every attribute at `level`.
    fn write_inner(&self, out: &mut BlockWriter, level: usize, print_default: bool) {
        for (name, forced) in self.render_plan() {
            if let Some(param) = self.param(name) {
                out.attr(level, param, forced || print_default);
            }
        }
    }

    /// Parameter documentation.
    fn doc(&self) -> String {
        param_doc(self.flavor(), self.params())
    }
}

/// Unordered object parameters. The `type` discriminator renders first and
/// is always visible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectParams {
    class_name: String,
    params: ParamSet,
}

/// Ordered action parameters. `type` is never rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionParams {
    class_name: String,
    params: ParamSet,
}

/// Grouping system parameters, rendered in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemParams {
    class_name: String,
    params: ParamSet,
}

impl ParamMixin for ObjectParams {
    fn flavor(&self) -> Flavor {
        Flavor::Object
    }

    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn params(&self) -> &ParamSet {
        &self.params
    }

    fn params_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }

    fn render_plan(&self) -> Vec<(&str, bool)> {
        let mut plan = Vec::with_capacity(self.params.len());
        if self.params.contains(TYPE_PARAM) {
            plan.push((TYPE_PARAM, true));
        }
        plan.extend(
            self.params
                .names()
                .filter(|n| *n != TYPE_PARAM)
                .map(|n| (n, false)),
        );
        plan
    }
}

impl ParamMixin for ActionParams {
    fn flavor(&self) -> Flavor {
        Flavor::Action
    }

    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn params(&self) -> &ParamSet {
        &self.params
    }

    fn params_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }

    fn render_plan(&self) -> Vec<(&str, bool)> {
        self.params
            .names()
            .filter(|n| *n != TYPE_PARAM)
            .map(|n| (n, false))
            .collect()
    }
}

impl ParamMixin for SystemParams {
    fn flavor(&self) -> Flavor {
        Flavor::System
    }

    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn params(&self) -> &ParamSet {
        &self.params
    }

    fn params_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }

    fn render_plan(&self) -> Vec<(&str, bool)> {
        self.params.names().map(|n| (n, false)).collect()
    }
}

/// One component of a composite block.
#[derive(Debug, Clone, PartialEq)]
pub enum Mixin {
    /// Object parameters.
    Object(ObjectParams),
    /// Action parameters.
    Action(ActionParams),
    /// System parameters.
    System(SystemParams),
    /// Named children.
    Collection(Collection),
}

impl Mixin {
    /// A parameter mixin of `flavor` owning `params`.
    #[must_use]
    pub fn with_params(flavor: Flavor, class_name: String, params: ParamSet) -> Self {
        match flavor {
            Flavor::Object => Mixin::Object(ObjectParams { class_name, params }),
            Flavor::Action => Mixin::Action(ActionParams { class_name, params }),
            Flavor::System => Mixin::System(SystemParams { class_name, params }),
        }
    }

    /// An empty stand-in of `flavor`.
    #[must_use]
    pub fn base(flavor: Flavor) -> Self {
        Self::with_params(flavor, String::new(), ParamSet::new())
    }

    /// The parameter view, `None` for collections.
    #[must_use]
    pub fn as_params(&self) -> Option<&dyn ParamMixin> {
        match self {
            Mixin::Object(m) => Some(m),
            Mixin::Action(m) => Some(m),
            Mixin::System(m) => Some(m),
            Mixin::Collection(_) => None,
        }
    }

    /// The mutable parameter view, `None` for collections.
    pub fn as_params_mut(&mut self) -> Option<&mut dyn ParamMixin> {
        match self {
            Mixin::Object(m) => Some(m),
            Mixin::Action(m) => Some(m),
            Mixin::System(m) => Some(m),
            Mixin::Collection(_) => None,
        }
    }

    /// The collection, if this is one.
    #[must_use]
    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Mixin::Collection(c) => Some(c),
            _ => None,
        }
    }

    /// The collection for mutation, if this is one.
    pub fn as_collection_mut(&mut self) -> Option<&mut Collection> {
        match self {
            Mixin::Collection(c) => Some(c),
            _ => None,
        }
    }

    /// Renders the mixin's own content at `level`.
    pub fn write_inner(&self, out: &mut BlockWriter, level: usize, print_default: bool) {
        match self {
            Mixin::Collection(c) => c.write_inner(out, print_default),
            params => {
                if let Some(p) = params.as_params() {
                    p.write_inner(out, level, print_default);
                }
            }
        }
    }

    /// Parameter documentation; empty for collections and for stand-ins
    /// without parameters.
    #[must_use]
    pub fn doc(&self) -> String {
        match self.as_params() {
            Some(p) if !p.params().is_empty() => p.doc(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catbird_syntax::{ParamType, ScalarType};

    fn table() -> ParamSet {
        let mut set = ParamSet::new();
        set.add(
            Parameter::new("dim", ParamType::scalar(ScalarType::Integer))
                .unwrap()
                .with_default(2)
                .unwrap(),
        )
        .unwrap();
        set.add(
            Parameter::new(TYPE_PARAM, ParamType::scalar(ScalarType::String))
                .unwrap()
                .with_default("GeneratedMesh")
                .unwrap(),
        )
        .unwrap();
        set
    }

    fn render(mixin: &Mixin, print_default: bool) -> String {
        let mut out = BlockWriter::new();
        mixin.write_inner(&mut out, 1, print_default);
        out.finish()
    }

    #[test]
    fn object_renders_type_first_and_forced() {
        let mixin = Mixin::with_params(Flavor::Object, "Mesh.GeneratedMesh".into(), table());
        assert_eq!(render(&mixin, false), "  type=GeneratedMesh\n");
        assert_eq!(render(&mixin, true), "  type=GeneratedMesh\n  dim=2\n");
    }

    #[test]
    fn action_never_renders_type() {
        let mixin = Mixin::with_params(Flavor::Action, "Mesh.SetupMeshAction".into(), table());
        assert_eq!(render(&mixin, true), "  dim=2\n");
    }

    #[test]
    fn system_renders_in_declaration_order() {
        let mut mixin = Mixin::with_params(Flavor::System, "Executioner.Predictor".into(), table());
        let params = mixin.as_params_mut().unwrap().params_mut();
        params.get_mut("dim").unwrap().set(3).unwrap();
        assert_eq!(render(&mixin, false), "  dim=3\n");
        assert_eq!(render(&mixin, true), "  dim=3\n  type=GeneratedMesh\n");
    }

    #[test]
    fn defaults_round_trip_to_nothing() {
        let mixin = Mixin::with_params(Flavor::Action, "A".into(), table());
        let view = mixin.as_params().unwrap();
        for name in view.params().names() {
            assert_eq!(view.is_default(name), Some(true));
            assert_eq!(view.attr_to_str(name, false).as_deref(), Some(""));
        }
        assert_eq!(view.is_default("missing"), None);
    }

    #[test]
    fn stand_ins_are_empty() {
        let base = Mixin::base(Flavor::Object);
        assert_eq!(render(&base, true), "");
        assert!(base.doc().is_empty());
        assert_eq!(base.as_params().unwrap().class_name(), "");
    }
}
