//! # Declarative Schema Descriptions
//!
//! Schemas can be written as data, using the rule vocabulary of common
//! Python-era configuration validators:
//!
//! ```yaml
//! type: dict
//! required: false
//! empty: true
//! schema:
//!   username:
//!     type: string
//!     empty: false
//!   password:
//!     type: string
//!     empty: false
//!     dependencies: username
//!   targets:
//!     type: list
//!     schema: { type: string }
//! ```
//!
//! The description is a decoded [`Value`], so it can come from YAML, JSON or
//! be assembled in code. Loading is strict: unknown rule keys, non-boolean
//! flags and unknown type names are rejected with
//! [`SchemaError::InvalidDescription`] pointing at the offending entry
//! (`schema.username.type`). Structural rules (dependencies, defaults,
//! allowed sets) are then enforced by [`FieldSet::new`] as usual.

use confcheck_core::{FieldPath, Mapping, Value};

use crate::error::SchemaError;
use crate::schema::{FieldSet, Schema};
use crate::spec::{FieldKind, FieldSpec, Nested};

const BLOCK_RULES: &[&str] = &["type", "required", "empty", "schema"];
const FIELD_RULES: &[&str] = &[
    "type",
    "required",
    "nullable",
    "empty",
    "allowed",
    "default",
    "dependencies",
    "schema",
];

impl Schema {
    /// Build a schema from a declarative description.
    ///
    /// # Errors
    ///
    /// [`SchemaError::InvalidDescription`] for malformed descriptions, or any
    /// structural [`SchemaError`] raised while building the field sets.
    pub fn from_description(description: &Value) -> Result<Self, SchemaError> {
        let root = FieldPath::root();
        let rules = as_rules(description, &root, BLOCK_RULES)?;

        if let Some(kind) = rules.get("type") {
            let kind = parse_kind(kind, &root.key("type"))?;
            if kind != FieldKind::Mapping {
                return Err(invalid(&root.key("type"), "a schema block must be of type dict"));
            }
        }

        let required = flag(rules, "required", &root)?.unwrap_or(false);
        let allow_empty = flag(rules, "empty", &root)?.unwrap_or(true);
        let fields = match rules.get("schema") {
            Some(fields) => parse_field_set(fields, &root.key("schema"), "")?,
            None => FieldSet::empty(),
        };

        Ok(Schema::new(fields).required(required).allow_empty(allow_empty))
    }

    /// Render this schema as a description accepted by
    /// [`Schema::from_description`]. Flags at their default value are
    /// omitted.
    pub fn to_description(&self) -> Value {
        let mut out = Mapping::new();
        out.insert("type".into(), Value::from(FieldKind::Mapping.description_name()));
        if self.is_required() {
            out.insert("required".into(), Value::Bool(true));
        }
        if !self.allows_empty() {
            out.insert("empty".into(), Value::Bool(false));
        }
        out.insert("schema".into(), describe_field_set(self.fields()));
        Value::Mapping(out)
    }
}

fn invalid(path: &FieldPath, reason: impl Into<String>) -> SchemaError {
    SchemaError::InvalidDescription {
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// View `value` as a rule mapping and reject keys outside `known`.
fn as_rules<'a>(
    value: &'a Value,
    path: &FieldPath,
    known: &[&str],
) -> Result<&'a Mapping, SchemaError> {
    let rules = value
        .as_mapping()
        .ok_or_else(|| {
            invalid(
                path,
                format!("expected a mapping of rules, found {}", value.kind()),
            )
        })?;
    if let Some(unknown) = rules.keys().find(|k| !known.contains(&k.as_str())) {
        return Err(invalid(&path.key(unknown.as_str()), "unknown rule"));
    }
    Ok(rules)
}

fn flag(rules: &Mapping, name: &str, path: &FieldPath) -> Result<Option<bool>, SchemaError> {
    match rules.get(name) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(invalid(
            &path.key(name),
            format!("expected boolean, found {}", other.kind()),
        )),
    }
}

fn parse_kind(value: &Value, path: &FieldPath) -> Result<FieldKind, SchemaError> {
    let name = value
        .as_str()
        .ok_or_else(|| invalid(path, format!("expected a type name, found {}", value.kind())))?;
    FieldKind::from_description_name(name)
        .ok_or_else(|| invalid(path, format!("unknown type '{name}'")))
}

/// `schema:` under a dict, with `prefix` the dotted field path used in
/// structural errors.
fn parse_field_set(value: &Value, path: &FieldPath, prefix: &str) -> Result<FieldSet, SchemaError> {
    let entries = value
        .as_mapping()
        .ok_or_else(|| {
            invalid(
                path,
                format!("expected a mapping of fields, found {}", value.kind()),
            )
        })?;

    let mut fields = Vec::with_capacity(entries.len());
    for (name, rules) in entries {
        let qualified = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        let spec = parse_field(rules, &path.key(name.as_str()), &qualified)?;
        fields.push((name.clone(), spec));
    }
    FieldSet::build(fields, prefix)
}

fn parse_field(value: &Value, path: &FieldPath, qualified: &str) -> Result<FieldSpec, SchemaError> {
    let rules = as_rules(value, path, FIELD_RULES)?;

    let kind = match rules.get("type") {
        Some(kind) => parse_kind(kind, &path.key("type"))?,
        None => return Err(invalid(path, "missing rule 'type'")),
    };

    let mut spec = FieldSpec::new(kind);
    if let Some(required) = flag(rules, "required", path)? {
        spec = spec.required(required);
    }
    if let Some(nullable) = flag(rules, "nullable", path)? {
        spec = spec.nullable(nullable);
    }
    if let Some(empty) = flag(rules, "empty", path)? {
        spec = spec.allow_empty(empty);
    }
    if let Some(allowed) = rules.get("allowed") {
        let values = allowed.as_sequence().ok_or_else(|| {
            invalid(
                &path.key("allowed"),
                format!("expected a list of values, found {}", allowed.kind()),
            )
        })?;
        spec = spec.allowed(values.iter().cloned());
    }
    if let Some(default) = rules.get("default") {
        spec = spec.default_value(default.clone());
    }
    if let Some(deps) = rules.get("dependencies") {
        spec = spec.depends_on(parse_dependencies(deps, &path.key("dependencies"))?);
    }
    if let Some(nested) = rules.get("schema") {
        let nested_path = path.key("schema");
        spec = match kind {
            FieldKind::Mapping => spec.fields(parse_field_set(nested, &nested_path, qualified)?),
            FieldKind::Sequence => {
                let item_name = format!("{qualified}[]");
                spec.items(parse_field(nested, &nested_path, &item_name)?)
            }
            other => {
                return Err(invalid(
                    &nested_path,
                    format!(
                        "a field of type {} cannot have a nested schema",
                        other.description_name()
                    ),
                ))
            }
        };
    }
    Ok(spec)
}

/// `dependencies:` is a single name or a list of names.
fn parse_dependencies(value: &Value, path: &FieldPath) -> Result<Vec<String>, SchemaError> {
    match value {
        Value::String(name) => Ok(vec![name.clone()]),
        Value::Sequence(names) => names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                name.as_str().map(str::to_string).ok_or_else(|| {
                    invalid(
                        &path.index(i),
                        format!("expected a field name, found {}", name.kind()),
                    )
                })
            })
            .collect(),
        other => Err(invalid(
            path,
            format!("expected a field name or a list of names, found {}", other.kind()),
        )),
    }
}

fn describe_field_set(fields: &FieldSet) -> Value {
    fields
        .iter()
        .map(|(name, spec)| (name, describe_field(spec)))
        .collect()
}

fn describe_field(spec: &FieldSpec) -> Value {
    let mut out = Mapping::new();
    out.insert("type".into(), Value::from(spec.kind().description_name()));
    if spec.is_required() {
        out.insert("required".into(), Value::Bool(true));
    }
    if spec.is_nullable() {
        out.insert("nullable".into(), Value::Bool(true));
    }
    if !spec.allows_empty() {
        out.insert("empty".into(), Value::Bool(false));
    }
    if let Some(allowed) = spec.allowed_values() {
        out.insert("allowed".into(), Value::Sequence(allowed.to_vec()));
    }
    if let Some(default) = spec.default() {
        out.insert("default".into(), default.clone());
    }
    match spec.dependencies() {
        [] => {}
        [single] => {
            out.insert("dependencies".into(), Value::from(single.as_str()));
        }
        many => {
            out.insert(
                "dependencies".into(),
                many.iter().map(|d| Value::from(d.as_str())).collect::<Vec<_>>().into(),
            );
        }
    }
    match spec.nested() {
        Some(Nested::Mapping(fields)) => {
            out.insert("schema".into(), describe_field_set(fields));
        }
        Some(Nested::Items(item)) => {
            out.insert("schema".into(), describe_field(item));
        }
        None => {}
    }
    Value::Mapping(out)
}
