//! # Schema Model
//!
//! A [`FieldSet`] is the closed set of fields one mapping may contain, in
//! declaration order, together with its [`DependencyGraph`]. A [`Schema`] is
//! the root field set plus two block-level flags: whether the block may be
//! absent and whether an empty mapping is acceptable.
//!
//! ## Construction Invariants
//!
//! [`FieldSet::new`] is the only way to obtain a field set, and it rejects:
//!
//! - empty or duplicated field names;
//! - dependencies on undeclared siblings, on the field itself, or from a
//!   sequence item spec (items have no siblings);
//! - cycles made only of required fields;
//! - defaults whose kind differs from the field kind, or that fall outside
//!   the allowed set;
//! - allowed values whose kind differs from the field kind (for sequences,
//!   from the item kind);
//! - nested schemas on fields whose kind cannot hold them.
//!
//! Once built, field sets and schemas are immutable and may be shared across
//! threads without synchronization.

use confcheck_core::Value;
use indexmap::IndexMap;

use crate::engine;
use crate::error::SchemaError;
use crate::graph::DependencyGraph;
use crate::report::ValidationReport;
use crate::spec::{FieldKind, FieldSpec, Nested};

/// The declared fields of one mapping level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    fields: IndexMap<String, FieldSpec>,
    graph: DependencyGraph,
}

impl FieldSet {
    /// Build a field set from `(name, spec)` pairs, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found; see the module docs for the
    /// full list of rejected shapes.
    ///
    /// Field names in errors are relative to this set. A set built here and
    /// later attached with [`FieldSpec::fields`] reports `port`, not
    /// `portal.port`; only [`Schema::from_description`] qualifies nested
    /// names, since it builds inner sets knowing their parent.
    pub fn new<I, K>(fields: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (K, FieldSpec)>,
        K: Into<String>,
    {
        Self::build(fields, "")
    }

    /// A field set that declares nothing and therefore rejects every key.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn build<I, K>(fields: I, prefix: &str) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (K, FieldSpec)>,
        K: Into<String>,
    {
        let mut declared: IndexMap<String, FieldSpec> = IndexMap::new();
        for (name, spec) in fields {
            let name = name.into();
            if name.is_empty() {
                return Err(SchemaError::EmptyName {
                    parent: prefix.to_string(),
                });
            }
            if declared.contains_key(&name) {
                return Err(SchemaError::DuplicateField {
                    field: qualify(prefix, &name),
                });
            }
            declared.insert(name, spec);
        }

        for (name, spec) in &declared {
            let path = qualify(prefix, name);
            check_spec(&path, spec)?;
            for dep in spec.dependencies() {
                if dep.is_empty() {
                    return Err(SchemaError::EmptyName { parent: path });
                }
                if dep == name {
                    return Err(SchemaError::SelfDependency { field: path });
                }
                if !declared.contains_key(dep) {
                    return Err(SchemaError::UnknownDependency {
                        field: path,
                        dependency: dep.clone(),
                    });
                }
            }
        }

        let graph = DependencyGraph::from_fields(&declared);
        let required = |name: &str| declared.get(name).is_some_and(FieldSpec::is_required);
        if let Some(cycle) = graph.find_cycle(required) {
            return Err(SchemaError::DependencyCycle {
                cycle: cycle.iter().map(|n| qualify(prefix, n)).collect(),
            });
        }
        if let Some(cycle) = graph.find_cycle(|_| true) {
            tracing::trace!(
                cycle = %cycle.join(" -> "),
                "optional fields depend on each other"
            );
        }

        Ok(Self {
            fields: declared,
            graph,
        })
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// Structural checks on one spec that do not involve its siblings.
fn check_spec(path: &str, spec: &FieldSpec) -> Result<(), SchemaError> {
    let kind = spec.kind();

    match spec.nested() {
        Some(Nested::Mapping(_)) if kind != FieldKind::Mapping => {
            return Err(SchemaError::NestedKindMismatch {
                field: path.to_string(),
                kind,
                nested: "mapping",
            });
        }
        Some(Nested::Items(_)) if kind != FieldKind::Sequence => {
            return Err(SchemaError::NestedKindMismatch {
                field: path.to_string(),
                kind,
                nested: "item",
            });
        }
        Some(Nested::Items(item)) => {
            let item_path = format!("{path}[]");
            if !item.dependencies().is_empty() {
                return Err(SchemaError::ItemDependencies {
                    field: path.to_string(),
                });
            }
            check_spec(&item_path, item)?;
        }
        // Nested field sets were checked by their own constructor.
        Some(Nested::Mapping(_)) | None => {}
    }

    if let Some(allowed) = spec.allowed_values() {
        // Sequence allowed sets constrain elements, so they follow the item kind.
        let element_kind = match (kind, spec.nested()) {
            (FieldKind::Sequence, Some(Nested::Items(item))) => Some(item.kind()),
            (FieldKind::Sequence, _) => None,
            (other, _) => Some(other),
        };
        if let Some(expected) = element_kind {
            if let Some(bad) = allowed.iter().find(|v| !expected.accepts(v.kind())) {
                return Err(SchemaError::AllowedValueKindMismatch {
                    field: path.to_string(),
                    value: bad.to_string(),
                    expected,
                });
            }
        }
    }

    if let Some(default) = spec.default() {
        let null_ok = default.is_null() && spec.is_nullable();
        if !null_ok && !kind.accepts(default.kind()) {
            return Err(SchemaError::DefaultKindMismatch {
                field: path.to_string(),
                expected: kind,
                found: default.kind(),
            });
        }
        if !null_ok && !default_permitted(spec, default) {
            return Err(SchemaError::DefaultNotAllowed {
                field: path.to_string(),
                value: default.to_string(),
            });
        }
    }

    Ok(())
}

fn default_permitted(spec: &FieldSpec, default: &Value) -> bool {
    match (spec.kind(), default) {
        (FieldKind::Sequence, Value::Sequence(items)) => items.iter().all(|v| spec.permits(v)),
        _ => spec.permits(default),
    }
}

/// A validated, immutable schema for one configuration block.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    fields: FieldSet,
    required: bool,
    allow_empty: bool,
}

impl Schema {
    /// A schema over `fields` for an optional block that may be empty.
    pub fn new(fields: FieldSet) -> Self {
        tracing::debug!(
            fields = fields.len(),
            dependencies = fields.graph().edge_count(),
            "schema built"
        );
        Self {
            fields,
            required: false,
            allow_empty: true,
        }
    }

    /// Build the field set and wrap it in a schema in one step.
    ///
    /// # Errors
    ///
    /// Propagates any [`SchemaError`] from [`FieldSet::new`].
    pub fn from_fields<I, K>(fields: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (K, FieldSpec)>,
        K: Into<String>,
    {
        FieldSet::new(fields).map(Self::new)
    }

    /// Whether the whole block must be present.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Whether a present block may be an empty mapping.
    pub fn allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn allows_empty(&self) -> bool {
        self.allow_empty
    }

    /// Validate a document against this schema. `None` means the block is
    /// absent. See [`engine::validate`].
    pub fn validate(&self, document: Option<&Value>) -> ValidationReport {
        engine::validate(self, document)
    }
}
