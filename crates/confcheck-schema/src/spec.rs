//! # Field Specifications
//!
//! A [`FieldSpec`] describes one named field of a mapping: its kind, whether
//! it is required or nullable, whether empty values are accepted, the set of
//! allowed literals, its default, the sibling fields it depends on, and for
//! container kinds a nested schema.
//!
//! `FieldSpec` is a plain builder. Nothing is checked until the spec is placed
//! into a [`FieldSet`], whose constructor enforces structural consistency.

use std::fmt;

use confcheck_core::{Value, ValueKind};
use serde::Serialize;

use crate::schema::FieldSet;

/// The type constraint of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Boolean,
    Mapping,
    Sequence,
}

impl FieldKind {
    /// Returns true when a value of `kind` satisfies this field kind.
    ///
    /// There is no numeric coercion: `Integer` rejects floats with a zero
    /// fraction and `Float` rejects integers.
    pub fn accepts(&self, kind: ValueKind) -> bool {
        matches!(
            (self, kind),
            (Self::String, ValueKind::String)
                | (Self::Integer, ValueKind::Int)
                | (Self::Float, ValueKind::Float)
                | (Self::Boolean, ValueKind::Bool)
                | (Self::Mapping, ValueKind::Mapping)
                | (Self::Sequence, ValueKind::Sequence)
        )
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Self::Mapping | Self::Sequence)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Mapping => "mapping",
            Self::Sequence => "sequence",
        }
    }

    /// The type name written in schema descriptions.
    pub fn description_name(&self) -> &'static str {
        match self {
            Self::Mapping => "dict",
            Self::Sequence => "list",
            other => other.as_str(),
        }
    }

    /// Parse a type name from a schema description.
    ///
    /// Accepts the canonical names plus `dict`/`list`.
    pub fn from_description_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "float" => Some(Self::Float),
            "boolean" => Some(Self::Boolean),
            "dict" | "mapping" => Some(Self::Mapping),
            "list" | "sequence" => Some(Self::Sequence),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema for the children of a container field.
#[derive(Debug, Clone, PartialEq)]
pub enum Nested {
    /// Keys of a mapping field.
    Mapping(FieldSet),
    /// Rules every element of a sequence field must satisfy.
    Items(Box<FieldSpec>),
}

/// Description of one named field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    kind: FieldKind,
    required: bool,
    nullable: bool,
    allow_empty: bool,
    allowed_values: Option<Vec<Value>>,
    default_value: Option<Value>,
    dependencies: Vec<String>,
    nested: Option<Nested>,
}

impl FieldSpec {
    /// A field of the given kind: optional, not nullable, empty allowed,
    /// no allowed set, no default, no dependencies.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            nullable: false,
            allow_empty: true,
            allowed_values: None,
            default_value: None,
            dependencies: Vec::new(),
            nested: None,
        }
    }

    pub fn string() -> Self {
        Self::new(FieldKind::String)
    }

    pub fn integer() -> Self {
        Self::new(FieldKind::Integer)
    }

    pub fn float() -> Self {
        Self::new(FieldKind::Float)
    }

    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    pub fn mapping() -> Self {
        Self::new(FieldKind::Mapping)
    }

    pub fn sequence() -> Self {
        Self::new(FieldKind::Sequence)
    }

    /// Whether the field must be present once its dependencies are met.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Whether an explicit null is accepted in place of a value.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Whether `""`, `[]` and `{}` are accepted.
    pub fn allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    /// Restrict the field to a set of literals. For sequence fields the set
    /// applies to each element.
    pub fn allowed<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Value injected when the field is absent and active.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sibling fields that must be present and non-empty for this field to
    /// be active. Repeated names are kept once, in first-seen order.
    pub fn depends_on<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for field in fields {
            let field = field.into();
            if !self.dependencies.contains(&field) {
                self.dependencies.push(field);
            }
        }
        self
    }

    /// Attach the field set describing a mapping field's keys.
    pub fn fields(mut self, fields: FieldSet) -> Self {
        self.nested = Some(Nested::Mapping(fields));
        self
    }

    /// Attach the rules every element of a sequence field must satisfy.
    pub fn items(mut self, item: FieldSpec) -> Self {
        self.nested = Some(Nested::Items(Box::new(item)));
        self
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn allows_empty(&self) -> bool {
        self.allow_empty
    }

    pub fn allowed_values(&self) -> Option<&[Value]> {
        self.allowed_values.as_deref()
    }

    pub fn default(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn nested(&self) -> Option<&Nested> {
        self.nested.as_ref()
    }

    /// Returns true when `value` is in the allowed set, or no set is declared.
    pub fn permits(&self, value: &Value) -> bool {
        match &self.allowed_values {
            Some(allowed) => allowed.contains(value),
            None => true,
        }
    }
}
