//! # Value Model
//!
//! The generic tagged value tree used for both schema literals and
//! configuration documents.
//!
//! ## Emptiness
//!
//! A value is *empty* when it is null, a zero-length string, an empty
//! sequence, or an empty mapping. Numeric zero and `false` are not empty.
//!
//! ## Conversions
//!
//! Documents decoded by `serde_json` or `serde_yaml` convert into [`Value`]
//! with `TryFrom`. Integers outside the `i64` range, non-finite floats (YAML
//! `.nan` and `.inf`) and YAML mapping keys that are not scalars are rejected
//! rather than coerced. YAML tags are dropped and the tagged value is
//! converted.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::CoreError;
use crate::path::{FieldPath, PathSegment};

/// Ordered mapping from string keys to values.
pub type Mapping = IndexMap<String, Value>;

/// The kind of a [`Value`], used by schema type checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Sequence,
    Mapping,
}

impl ValueKind {
    /// Returns the lowercase name used in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Int => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Sequence => "sequence",
            Self::Mapping => "mapping",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of a configuration document or a schema literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

impl Value {
    /// An empty mapping.
    pub fn empty_mapping() -> Self {
        Value::Mapping(Mapping::new())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Sequence(_) => ValueKind::Sequence,
            Value::Mapping(_) => ValueKind::Mapping,
        }
    }

    /// Null, `""`, `[]` and `{}` are empty. Numbers and booleans never are.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Sequence(items) => items.is_empty(),
            Value::Mapping(map) => map.is_empty(),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Follow a [`FieldPath`] from this node. Returns `None` as soon as a
    /// segment does not resolve.
    pub fn pointer(&self, path: &FieldPath) -> Option<&Value> {
        let mut node = self;
        for segment in path.segments() {
            node = match (segment, node) {
                (PathSegment::Key(k), Value::Mapping(map)) => map.get(k)?,
                (PathSegment::Index(i), Value::Sequence(items)) => items.get(*i)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Like [`Value::pointer`], parsing the path from its textual form.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidPath` if `path` is not a valid field path.
    pub fn pointer_str(&self, path: &str) -> Result<Option<&Value>, CoreError> {
        let path = FieldPath::parse(path)?;
        Ok(self.pointer(&path))
    }

    /// Typed lookup of a string under `key`.
    ///
    /// `Ok(None)` when absent, `Err(WrongKind)` when present with another kind.
    pub fn get_str(&self, key: &str) -> Result<Option<&str>, CoreError> {
        self.get_typed(key, ValueKind::String, Value::as_str)
    }

    /// Typed lookup of an integer under `key`.
    pub fn get_i64(&self, key: &str) -> Result<Option<i64>, CoreError> {
        self.get_typed(key, ValueKind::Int, Value::as_i64)
    }

    /// Typed lookup of a float under `key`.
    pub fn get_f64(&self, key: &str) -> Result<Option<f64>, CoreError> {
        self.get_typed(key, ValueKind::Float, Value::as_f64)
    }

    /// Typed lookup of a boolean under `key`.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, CoreError> {
        self.get_typed(key, ValueKind::Bool, Value::as_bool)
    }

    fn get_typed<'a, T>(
        &'a self,
        key: &str,
        expected: ValueKind,
        view: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<Option<T>, CoreError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => match view(value) {
                Some(v) => Ok(Some(v)),
                None => Err(CoreError::WrongKind {
                    key: key.to_string(),
                    expected,
                    found: value.kind(),
                }),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Sequence(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Mapping(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Value::Mapping(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = CoreError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        from_json(json, &FieldPath::root())
    }
}

impl TryFrom<serde_yaml::Value> for Value {
    type Error = CoreError;

    fn try_from(yaml: serde_yaml::Value) -> Result<Self, Self::Error> {
        from_yaml(yaml, &FieldPath::root())
    }
}

fn unsupported(path: &FieldPath, reason: impl Into<String>) -> CoreError {
    CoreError::Unsupported {
        path: path.to_string(),
        reason: reason.into(),
    }
}

fn float(f: f64, path: &FieldPath) -> Result<Value, CoreError> {
    if f.is_finite() {
        Ok(Value::Float(f))
    } else {
        Err(unsupported(path, format!("non-finite float {f}")))
    }
}

fn from_json(json: serde_json::Value, path: &FieldPath) -> Result<Value, CoreError> {
    match json {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if n.is_u64() {
                Err(unsupported(
                    path,
                    format!("integer {n} does not fit in 64 signed bits"),
                ))
            } else if let Some(f) = n.as_f64() {
                float(f, path)
            } else {
                Err(unsupported(path, format!("unsupported number {n}")))
            }
        }
        serde_json::Value::String(s) => Ok(Value::String(s)),
        serde_json::Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| from_json(item, &path.index(i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Sequence),
        serde_json::Value::Object(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (k, v) in map {
                let child = from_json(v, &path.key(k.as_str()))?;
                out.insert(k, child);
            }
            Ok(Value::Mapping(out))
        }
    }
}

fn from_yaml(yaml: serde_yaml::Value, path: &FieldPath) -> Result<Value, CoreError> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if n.is_u64() {
                Err(unsupported(
                    path,
                    format!("integer {n} does not fit in 64 signed bits"),
                ))
            } else if let Some(f) = n.as_f64() {
                float(f, path)
            } else {
                Err(unsupported(path, format!("unsupported number {n:?}")))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s)),
        serde_yaml::Value::Sequence(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| from_yaml(item, &path.index(i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Sequence),
        serde_yaml::Value::Mapping(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => {
                        return Err(unsupported(
                            path,
                            format!("unsupported mapping key {other:?}"),
                        ))
                    }
                };
                let child = from_yaml(v, &path.key(key.as_str()))?;
                if out.insert(key.clone(), child).is_some() {
                    return Err(unsupported(path, format!("duplicate mapping key '{key}'")));
                }
            }
            Ok(Value::Mapping(out))
        }
        serde_yaml::Value::Tagged(tagged) => from_yaml(tagged.value, path),
    }
}
