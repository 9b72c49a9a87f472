//! Typed parameter descriptors.
//!
//! A [`Parameter`] is one documented configuration attribute of a syntax
//! block: its declared element type and array depth, default, optional
//! closed set of allowed values, and current value. Every mutation goes
//! through [`Parameter::set`], which coerces whitespace-separated strings and
//! rejects anything that violates the declaration.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value as Json;

use crate::error::{Error, Result};

/// Substring that may not appear in a parameter name.
pub const RESERVED_MARKER: &str = "_syntax_";

/// Element type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// `Integer`.
    Integer,
    /// `Boolean`.
    Boolean,
    /// `Float` or `Real`.
    Float,
    /// `String`.
    String,
}

impl ScalarType {
    /// Maps a `basic_type` tag onto an element type. `Array` is a nesting
    /// marker, not an element type, and yields `None`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Integer" => Some(ScalarType::Integer),
            "Boolean" => Some(ScalarType::Boolean),
            "Float" | "Real" => Some(ScalarType::Float),
            "String" => Some(ScalarType::String),
            _ => None,
        }
    }

    /// Tag used when rendering the type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarType::Integer => "Integer",
            ScalarType::Boolean => "Boolean",
            ScalarType::Float => "Float",
            ScalarType::String => "String",
        }
    }

    /// Parses one textual token as this type. Booleans accept `true`/`false`
    /// as well as integers (non-zero is true).
    #[must_use]
    pub fn parse(self, text: &str) -> Option<Value> {
        match self {
            ScalarType::String => Some(Value::String(text.to_owned())),
            ScalarType::Integer => text.trim().parse().ok().map(Value::Integer),
            ScalarType::Float => text.trim().parse().ok().map(Value::Float),
            ScalarType::Boolean => {
                let t = text.trim();
                if t.eq_ignore_ascii_case("true") {
                    Some(Value::Boolean(true))
                } else if t.eq_ignore_ascii_case("false") {
                    Some(Value::Boolean(false))
                } else {
                    t.parse::<i64>().ok().map(|i| Value::Boolean(i != 0))
                }
            }
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of a parameter: an element type nested `dim` arrays deep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamType {
    /// Element type.
    pub element: ScalarType,
    /// Array nesting depth; 0 for scalars.
    pub dim: usize,
}

impl ParamType {
    /// A scalar of the given element type.
    #[must_use]
    pub fn scalar(element: ScalarType) -> Self {
        Self { element, dim: 0 }
    }

    /// An array of the given element type and depth.
    #[must_use]
    pub fn array(element: ScalarType, dim: usize) -> Self {
        Self { element, dim }
    }

    /// Parses a colon-separated `basic_type` string such as
    /// `"Array:Integer"`. The last tag is the element type; every preceding
    /// tag must be `Array` and adds one level of nesting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownBasicType`] for any other shape.
    pub fn parse(basic_type: &str, param: &str) -> Result<Self> {
        let unknown = || Error::UnknownBasicType {
            param: param.to_owned(),
            basic_type: basic_type.to_owned(),
        };
        let tags: Vec<&str> = basic_type.split(':').map(str::trim).collect();
        let (last, nesting) = tags.split_last().ok_or_else(unknown)?;
        let element = ScalarType::from_tag(last).ok_or_else(unknown)?;
        if nesting.iter().any(|t| *t != "Array") {
            return Err(unknown());
        }
        Ok(Self {
            element,
            dim: nesting.len(),
        })
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.dim {
            f.write_str("Array:")?;
        }
        f.write_str(self.element.as_str())
    }
}

/// A parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer value.
    Integer(i64),
    /// Boolean value.
    Boolean(bool),
    /// Floating-point value.
    Float(f64),
    /// String value.
    String(String),
    /// Homogeneous array, possibly nested.
    Array(Vec<Value>),
}

impl Value {
    /// Name of the value's own type, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Integer",
            Value::Boolean(_) => "Boolean",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Array(_) => "Array",
        }
    }

    /// Array nesting depth of the value (0 for scalars). An empty array
    /// counts as one level.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Value::Array(items) => 1 + items.iter().map(Value::depth).max().unwrap_or(0),
            _ => 0,
        }
    }

    /// Returns the string contents, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Calls `f` on every scalar leaf of the value.
    fn for_each_leaf<'a>(&'a self, f: &mut impl FnMut(&'a Value) -> Result<()>) -> Result<()> {
        match self {
            Value::Array(items) => items.iter().try_for_each(|v| v.for_each_leaf(f)),
            scalar => f(scalar),
        }
    }
}

impl fmt::Display for Value {
    /// Scalars render bare; arrays render their elements space-joined, with
    /// nested rows separated by `;`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                let sep = if self.depth() > 1 { "; " } else { " " };
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(sep)?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Value {
    fn from(v: &[T]) -> Self {
        Value::Array(v.iter().cloned().map(Into::into).collect())
    }
}

/// One typed, documented configuration attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    kind: ParamType,
    default: Option<Value>,
    value: Option<Value>,
    allowed: Option<Vec<Value>>,
    description: Option<String>,
}

impl Parameter {
    /// Declares a parameter with no default, no choices and no description.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReservedName`] if `name` contains [`RESERVED_MARKER`].
    pub fn new(name: impl Into<String>, kind: ParamType) -> Result<Self> {
        let name = name.into();
        if name.contains(RESERVED_MARKER) {
            return Err(Error::ReservedName(name));
        }
        Ok(Self {
            name,
            kind,
            default: None,
            value: None,
            allowed: None,
            description: None,
        })
    }

    /// Sets the closed choice set. Choices are not checked against the
    /// declared type here; [`Parameter::from_schema`] converts them first.
    #[must_use]
    pub fn with_allowed(mut self, allowed: Vec<Value>) -> Self {
        self.allowed = Some(allowed);
        self
    }

    /// Sets the default, and resets the current value to it.
    ///
    /// # Errors
    ///
    /// Returns a constraint violation if the default does not fit the
    /// declared type (allowed values are not enforced on defaults).
    pub fn with_default(mut self, default: impl Into<Value>) -> Result<Self> {
        let default = self.coerce(default.into())?;
        self.value = Some(default.clone());
        self.default = Some(default);
        Ok(self)
    }

    /// Builds a parameter from one entry of a schema `parameters` mapping.
    ///
    /// Recognized keys: `basic_type` (required), `options`, `default`,
    /// `description`. A default that cannot be parsed is logged and treated
    /// as absent; defaults of arrays nested deeper than one level are not
    /// supported and are always absent.
    ///
    /// # Errors
    ///
    /// Returns a schema error if `basic_type` is missing or unsupported, or
    /// an option cannot be converted to the element type.
    pub fn from_schema(name: &str, entry: &Json) -> Result<Self> {
        let basic_type = entry
            .get("basic_type")
            .and_then(Json::as_str)
            .ok_or_else(|| Error::MissingKey {
                path: name.to_owned(),
                key: "basic_type".to_owned(),
            })?;
        let kind = ParamType::parse(basic_type, name)?;
        let mut param = Parameter::new(name, kind)?;

        if let Some(options) = entry.get("options").and_then(Json::as_str) {
            let tokens: Vec<&str> = options.split_whitespace().collect();
            if !tokens.is_empty() {
                let allowed = tokens
                    .iter()
                    .map(|tok| {
                        kind.element.parse(tok).ok_or_else(|| Error::InvalidOption {
                            param: name.to_owned(),
                            option: (*tok).to_owned(),
                            expected: kind.element.to_string(),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                param.allowed = Some(allowed);
            }
        }

        if let Some(text) = entry.get("description").and_then(Json::as_str) {
            if !text.is_empty() {
                param.description = Some(text.to_owned());
            }
        }

        param.default = parse_default(name, kind, entry.get("default"));
        param.value = param.default.clone();
        Ok(param)
    }

    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    #[must_use]
    pub fn kind(&self) -> ParamType {
        self.kind
    }

    /// Default value, if declared.
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Current value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Closed choice set, if declared.
    #[must_use]
    pub fn allowed(&self) -> Option<&[Value]> {
        self.allowed.as_deref()
    }

    /// Description, if declared.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// True when the current value equals the default (deep equality for
    /// arrays).
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.value == self.default
    }

    /// Assigns a new value. On failure the current value is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`], [`Error::Dimension`] or
    /// [`Error::NotAllowed`] if the value violates the declaration.
    pub fn set(&mut self, value: impl Into<Value>) -> Result<()> {
        let value = self.check(value.into())?;
        self.value = Some(value);
        Ok(())
    }

    /// Coerces and validates a candidate value without storing it.
    ///
    /// # Errors
    ///
    /// See [`Parameter::set`].
    pub fn check(&self, value: Value) -> Result<Value> {
        let value = self.coerce(value)?;
        if let Some(allowed) = &self.allowed {
            value.for_each_leaf(&mut |leaf| {
                if allowed.contains(leaf) {
                    Ok(())
                } else {
                    Err(Error::NotAllowed {
                        name: self.name.clone(),
                        value: leaf.to_string(),
                        allowed: join_values(allowed),
                    })
                }
            })?;
        }
        Ok(value)
    }

    /// Per-parameter documentation paragraph.
    #[must_use]
    pub fn doc(&self) -> String {
        let mut doc = format!("\n{} : {}\n", self.name, self.kind);
        if let Some(desc) = &self.description {
            doc.push_str(&format!("  {desc}\n"));
        }
        if let Some(allowed) = &self.allowed {
            doc.push_str(&format!("  Allowed values: [{}]\n", join_values(allowed)));
        }
        if let Some(default) = &self.default {
            doc.push_str(&format!("  Default value: {default}\n"));
        }
        doc
    }

    fn coerce(&self, value: Value) -> Result<Value> {
        if self.kind.dim == 0 {
            return self.coerce_scalar(value);
        }
        match value {
            Value::String(text) => self.split_string(&text),
            Value::Array(_) => {
                let found = value.depth();
                let mut leaves = 0usize;
                value.for_each_leaf(&mut |_| {
                    leaves += 1;
                    Ok(())
                })?;
                // Empty arrays fit any depth.
                if found > self.kind.dim || (found < self.kind.dim && leaves > 0) {
                    return Err(self.dimension_error(&value));
                }
                self.coerce_level(value, self.kind.dim)
            }
            scalar => Err(self.dimension_error(&scalar)),
        }
    }

    fn coerce_level(&self, value: Value, level: usize) -> Result<Value> {
        match (level, value) {
            (0, element) => self.coerce_element(element),
            (_, Value::Array(items)) => items
                .into_iter()
                .map(|v| self.coerce_level(v, level - 1))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            (_, _) => Err(Error::Dimension {
                name: self.name.clone(),
                expected: self.kind.dim,
                found: self.kind.dim - level,
            }),
        }
    }

    fn coerce_scalar(&self, value: Value) -> Result<Value> {
        match value {
            Value::Array(_) => Err(self.dimension_error(&value)),
            Value::String(text) if self.kind.element != ScalarType::String => self
                .kind
                .element
                .parse(&text)
                .ok_or_else(|| self.type_error("String")),
            other => self.coerce_element(other),
        }
    }

    fn coerce_element(&self, value: Value) -> Result<Value> {
        match (self.kind.element, value) {
            (ScalarType::Integer, v @ Value::Integer(_))
            | (ScalarType::Boolean, v @ Value::Boolean(_))
            | (ScalarType::Float, v @ Value::Float(_))
            | (ScalarType::String, v @ Value::String(_)) => Ok(v),
            (_, v) => Err(self.type_error(v.type_name())),
        }
    }

    /// Whitespace-separated string to array; rows of deeper arrays are
    /// separated by `;`.
    fn split_string(&self, text: &str) -> Result<Value> {
        let element = self.kind.element;
        let row = |chunk: &str| -> Result<Value> {
            chunk
                .split_whitespace()
                .map(|tok| element.parse(tok).ok_or_else(|| self.type_error("String")))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array)
        };
        match self.kind.dim {
            1 => row(text),
            2 => text
                .split(';')
                .map(row)
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            _ => Err(self.type_error("String")),
        }
    }

    fn type_error(&self, found: &str) -> Error {
        Error::TypeMismatch {
            name: self.name.clone(),
            found: found.to_owned(),
            expected: self.kind.to_string(),
        }
    }

    fn dimension_error(&self, value: &Value) -> Error {
        Error::Dimension {
            name: self.name.clone(),
            expected: self.kind.dim,
            found: value.depth(),
        }
    }
}

fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parses a schema `default` entry. Absent, null, empty and `"none"` mean
/// no default.
fn parse_default(name: &str, kind: ParamType, raw: Option<&Json>) -> Option<Value> {
    let text = match raw? {
        Json::Null => return None,
        Json::String(s) => s.clone(),
        other => other.to_string(),
    };
    if text.trim().is_empty() || text.trim() == "none" || kind.dim > 1 {
        return None;
    }
    let parsed = if kind.dim == 0 {
        kind.element.parse(&text)
    } else {
        text.split_whitespace()
            .map(|tok| kind.element.parse(tok))
            .collect::<Option<Vec<_>>>()
            .map(Value::Array)
    };
    if parsed.is_none() {
        tracing::warn!(
            param = name,
            default = %text,
            expected = %kind,
            "failed to parse default value; treating as absent"
        );
    }
    parsed
}

/// Ordered parameter table owned by one flavor of a block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSet {
    params: IndexMap<String, Parameter>,
}

impl ParamSet {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReservedName`] for reserved names and
    /// [`Error::DuplicateParam`] if the name is already present.
    pub fn add(&mut self, param: Parameter) -> Result<()> {
        if param.name.contains(RESERVED_MARKER) {
            return Err(Error::ReservedName(param.name));
        }
        if self.params.contains_key(&param.name) {
            return Err(Error::DuplicateParam(param.name));
        }
        self.params.insert(param.name.clone(), param);
        Ok(())
    }

    /// Builds a table from a schema `parameters` mapping.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Parameter::from_schema`].
    pub fn from_schema(params: &serde_json::Map<String, Json>) -> Result<Self> {
        let mut set = Self::new();
        for (name, entry) in params {
            set.add(Parameter::from_schema(name, entry)?)?;
        }
        Ok(set)
    }

    /// Looks up a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.get(name)
    }

    /// Looks up a parameter for mutation.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.params.get_mut(name)
    }

    /// Removes a parameter, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<Parameter> {
        self.params.shift_remove(name)
    }

    /// True if a parameter of that name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Parameter names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    /// Parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.values()
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn int_param() -> Parameter {
        Parameter::new("picky", ParamType::scalar(ScalarType::Integer))
            .unwrap()
            .with_allowed(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)])
    }

    #[test]
    fn basic_type_parsing() {
        let t = ParamType::parse("Array:Integer", "x").unwrap();
        assert_eq!(t, ParamType::array(ScalarType::Integer, 1));
        assert_eq!(ParamType::parse("Real", "x").unwrap().element, ScalarType::Float);
        assert_eq!(ParamType::parse("Array:Array:Real", "x").unwrap().dim, 2);
        assert!(matches!(
            ParamType::parse("Point", "x"),
            Err(Error::UnknownBasicType { .. })
        ));
        assert!(ParamType::parse("Integer:Real", "x").is_err());
        assert!(ParamType::parse("Array", "x").is_err());
    }

    #[test]
    fn allowed_value_failure_keeps_previous_value() {
        let mut p = int_param();
        p.set(2).unwrap();
        let err = p.set(5).unwrap_err();
        assert!(matches!(err, Error::NotAllowed { .. }));
        assert!(err.to_string().contains("picky"));
        assert_eq!(p.value(), Some(&Value::Integer(2)));
    }

    #[test]
    fn scalar_type_mismatch_is_rejected() {
        let mut p = Parameter::new("batches", ParamType::scalar(ScalarType::Integer)).unwrap();
        let err = p.set(true).unwrap_err();
        assert!(err.is_constraint_violation());
        assert!(err.to_string().contains("Boolean"));
        assert!(p.set("fifteen").is_err());
        p.set("15").unwrap();
        assert_eq!(p.value(), Some(&Value::Integer(15)));
    }

    #[test]
    fn numeric_types_do_not_mix() {
        let mut p = Parameter::new("end_time", ParamType::scalar(ScalarType::Float))
            .unwrap()
            .with_default(1.0)
            .unwrap();
        let err = p.set(5).unwrap_err();
        assert!(err.is_constraint_violation());
        assert!(err.to_string().contains("Integer"));
        assert_eq!(p.value(), Some(&Value::Float(1.0)));
        p.set("5").unwrap();
        assert_eq!(p.value(), Some(&Value::Float(5.0)));
        let mut q = Parameter::new("n", ParamType::scalar(ScalarType::Integer)).unwrap();
        assert!(q.set(5.5).is_err());
    }

    #[test]
    fn array_default_and_assignment() {
        let entry = json!({"basic_type": "Array:Integer", "default": "1 2 3", "options": ""});
        let mut p = Parameter::from_schema("arr", &entry).unwrap();
        assert_eq!(p.default(), Some(&Value::from(vec![1, 2, 3])));
        assert!(p.is_default());
        p.set(vec![4, 5]).unwrap();
        assert_eq!(p.value(), Some(&Value::from(vec![4, 5])));
        let err = p.set(5).unwrap_err();
        assert!(matches!(err, Error::Dimension { expected: 1, found: 0, .. }));
        p.set("7 8 9").unwrap();
        assert_eq!(p.value(), Some(&Value::from(vec![7, 8, 9])));
    }

    #[test]
    fn array_elements_respect_choices_and_depth() {
        let mut p = Parameter::new("arr", ParamType::array(ScalarType::Integer, 1))
            .unwrap()
            .with_allowed(vec![10.into(), 11.into(), 12.into()]);
        p.set(vec![10, 10, 10]).unwrap();
        assert!(p.set(vec![10, 20, 10]).is_err());
        assert_eq!(p.value(), Some(&Value::from(vec![10, 10, 10])));

        let mut nd = Parameter::new("ndarr", ParamType::array(ScalarType::Float, 2)).unwrap();
        nd.set(vec![vec![10.0, 10.0, 10.0]]).unwrap();
        assert!(matches!(
            nd.set(vec![10.0, 10.0, 10.0]),
            Err(Error::Dimension { expected: 2, .. })
        ));
        nd.set("1 2; 3 4").unwrap();
        assert_eq!(nd.value().map(ToString::to_string).as_deref(), Some("1.0 2.0; 3.0 4.0"));
    }

    #[test]
    fn defaults_that_cannot_be_parsed_are_absent() {
        let deep = json!({"basic_type": "Array:Array:Real", "default": "1 2; 3 4"});
        assert_eq!(Parameter::from_schema("d", &deep).unwrap().default(), None);
        let bad = json!({"basic_type": "Integer", "default": "abc"});
        assert_eq!(Parameter::from_schema("b", &bad).unwrap().default(), None);
        let none = json!({"basic_type": "Real", "default": "none"});
        assert_eq!(Parameter::from_schema("n", &none).unwrap().default(), None);
        let flag = json!({"basic_type": "Boolean", "default": "0"});
        assert_eq!(
            Parameter::from_schema("f", &flag).unwrap().default(),
            Some(&Value::Boolean(false))
        );
    }

    #[test]
    fn options_must_match_the_element_type() {
        let entry = json!({"basic_type": "Integer", "options": "1 two 3"});
        assert!(matches!(
            Parameter::from_schema("p", &entry),
            Err(Error::InvalidOption { .. })
        ));
        let missing = json!({"options": ""});
        assert!(matches!(
            Parameter::from_schema("p", &missing),
            Err(Error::MissingKey { .. })
        ));
    }

    #[test]
    fn reserved_names_are_rejected() {
        let kind = ParamType::scalar(ScalarType::String);
        assert!(matches!(
            Parameter::new("bad_syntax_name", kind),
            Err(Error::ReservedName(_))
        ));
        let mut set = ParamSet::new();
        set.add(Parameter::new("ok", kind).unwrap()).unwrap();
        assert!(matches!(
            set.add(Parameter::new("ok", kind).unwrap()),
            Err(Error::DuplicateParam(_))
        ));
    }

    #[test]
    fn doc_lists_type_choices_and_default() {
        let entry = json!({
            "basic_type": "String",
            "options": "xml moose",
            "default": "xml",
            "description": "Where to read initial properties"
        });
        let doc = Parameter::from_schema("initial_properties", &entry).unwrap().doc();
        assert!(doc.contains("initial_properties : String"));
        assert!(doc.contains("Where to read initial properties"));
        assert!(doc.contains("Allowed values: [xml, moose]"));
        assert!(doc.contains("Default value: xml"));
    }

    proptest! {
        #[test]
        fn choice_membership_decides_acceptance(v in -10i64..10) {
            let mut p = int_param();
            let accepted = p.set(v).is_ok();
            prop_assert_eq!(accepted, (1..=3).contains(&v));
        }

        #[test]
        fn fresh_parameters_are_default(default in any::<i64>()) {
            let p = Parameter::new("x", ParamType::scalar(ScalarType::Integer))
                .unwrap()
                .with_default(default)
                .unwrap();
            prop_assert!(p.is_default());
        }
    }
}
