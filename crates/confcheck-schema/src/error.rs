//! # Schema Errors
//!
//! Construction-time errors. A schema that fails any of these checks is
//! unusable and is never handed to the validation engine.
//!
//! Field names in these errors are dotted paths relative to the field set
//! being built (`outer.inner`); sequence item specs are addressed as
//! `field[]`.

use confcheck_core::ValueKind;
use thiserror::Error;

use crate::spec::FieldKind;

/// Error raised while building a [`Schema`](crate::Schema) or a
/// [`FieldSet`](crate::FieldSet).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The declarative description is malformed.
    #[error("invalid schema description at {path}: {reason}")]
    InvalidDescription {
        /// Location inside the description.
        path: String,
        /// What is wrong at that location.
        reason: String,
    },

    /// A field name or dependency name is the empty string.
    #[error("empty name in field set '{parent}'")]
    EmptyName {
        /// Path of the enclosing field set.
        parent: String,
    },

    /// The same field name was declared twice.
    #[error("field '{field}' is declared more than once")]
    DuplicateField {
        /// The duplicated field.
        field: String,
    },

    /// A dependency names a field that is not declared in the same mapping.
    #[error("field '{field}' depends on undeclared field '{dependency}'")]
    UnknownDependency {
        /// Field declaring the dependency.
        field: String,
        /// The missing sibling.
        dependency: String,
    },

    /// A field lists itself as a dependency.
    #[error("field '{field}' depends on itself")]
    SelfDependency {
        /// The offending field.
        field: String,
    },

    /// Required fields depend on each other in a cycle.
    #[error("dependency cycle among required fields: {}", cycle.join(" -> "))]
    DependencyCycle {
        /// The cycle, first field repeated at the end.
        cycle: Vec<String>,
    },

    /// A sequence item spec declares dependencies; items have no siblings.
    #[error("item schema of '{field}' cannot declare dependencies")]
    ItemDependencies {
        /// The sequence field.
        field: String,
    },

    /// The default value does not have the field's kind.
    #[error("default of '{field}' must be {expected}, found {found}")]
    DefaultKindMismatch {
        /// The field.
        field: String,
        /// Declared kind.
        expected: FieldKind,
        /// Kind of the default literal.
        found: ValueKind,
    },

    /// The default value is not one of the allowed values.
    #[error("default of '{field}' ({value}) is not an allowed value")]
    DefaultNotAllowed {
        /// The field.
        field: String,
        /// Rendered default.
        value: String,
    },

    /// An allowed value does not have the field's kind.
    #[error("allowed value {value} of '{field}' is not {expected}")]
    AllowedValueKindMismatch {
        /// The field.
        field: String,
        /// Rendered allowed value.
        value: String,
        /// Kind each allowed value must have.
        expected: FieldKind,
    },

    /// A nested schema is attached to a field whose kind cannot hold it.
    #[error("field '{field}' of kind {kind} cannot carry a nested {nested} schema")]
    NestedKindMismatch {
        /// The field.
        field: String,
        /// Declared kind.
        kind: FieldKind,
        /// `"mapping"` or `"item"`.
        nested: &'static str,
    },
}
