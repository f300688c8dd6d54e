//! Argument schema types

use super::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Int,
    Float,
    Str,
    /// A string restricted to a fixed set of values.
    Choice(&'static [&'static str]),
    StrList,
    /// A JSON object, given inline on the CLI or as a mapping in the config file.
    Map,
}

impl FieldKind {
    pub fn describe(&self) -> String {
        match self {
            FieldKind::Bool => "a boolean".to_string(),
            FieldKind::Int => "an integer".to_string(),
            FieldKind::Float => "a number".to_string(),
            FieldKind::Str => "a string".to_string(),
            FieldKind::Choice(options) => format!("one of [{}]", options.join(", ")),
            FieldKind::StrList => "a list of strings".to_string(),
            FieldKind::Map => "a JSON object".to_string(),
        }
    }
}

/// A single recognized option.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub default: Value,
    pub nullable: bool,
    pub required: bool,
    /// Whether the resolved value is forwarded to the training script.
    pub forward: bool,
    pub help: &'static str,
}

impl FieldSpec {
    /// A field defaulting to `null` is nullable.
    pub fn new(
        name: &'static str,
        kind: FieldKind,
        default: impl Into<Value>,
        help: &'static str,
    ) -> Self {
        let default = default.into();
        Self {
            name,
            kind,
            nullable: default.is_null(),
            default,
            required: false,
            forward: true,
            help,
        }
    }

    pub fn optional(name: &'static str, kind: FieldKind, help: &'static str) -> Self {
        Self::new(name, kind, Value::Null, help)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Consumed by the launcher itself and never passed on.
    pub fn internal(mut self) -> Self {
        self.forward = false;
        self
    }
}

/// A named set of fields, one per argument dataclass of the training script.
#[derive(Debug, Clone)]
pub struct GroupSpec {
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl GroupSpec {
    pub fn new(name: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self { name, fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}
