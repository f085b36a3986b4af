//! # confcheck-schema — Schema-Driven Configuration Validation
//!
//! Validates decoded configuration blocks against declarative schemas and
//! returns every violation at once, together with a resolved document in
//! which defaults have been injected.
//!
//! ## Model
//!
//! - [`FieldSpec`] describes one field: kind, `required`, `nullable`,
//!   emptiness, allowed literals, default, sibling dependencies, and a
//!   nested schema for mapping or sequence fields.
//! - [`FieldSet`] is the closed set of fields for one mapping level. Its
//!   constructor builds the [`DependencyGraph`] and rejects inconsistent
//!   schemas with a [`SchemaError`].
//! - [`Schema`] wraps the root field set with block-level `required` and
//!   emptiness flags. Schemas are immutable and `Send + Sync`.
//!
//! ## Validation (`engine`)
//!
//! [`Schema::validate`] is pure. A field is *active* when all of its
//! dependencies are present and non-empty ([`DependencyResolver`]). Present
//! fields are kind-, emptiness- and allowed-checked; inactive present fields
//! additionally report `DependencyUnmet`. Absent active fields are reported
//! missing when required and defaulted otherwise. Undeclared keys are
//! `UnknownField`.
//!
//! ## Descriptions (`description`)
//!
//! [`Schema::from_description`] loads the `type`/`required`/`empty`/
//! `allowed`/`default`/`dependencies`/`schema` rule vocabulary from a decoded
//! [`Value`](confcheck_core::Value). [`Schema::to_description`] renders it
//! back.
//!
//! ## Crate Policy
//!
//! - Depends only on `confcheck-core` internally.
//! - No I/O. Callers decode text and hand over values.
//! - Logging goes through `tracing` at `debug`/`trace` only.

pub mod builtin;
pub mod description;
pub mod engine;
pub mod error;
pub mod graph;
pub mod report;
pub mod resolver;
pub mod schema;
pub mod spec;

pub use builtin::{builtin, iscsi_chap_schema, BUILTIN_NAMES};
pub use error::SchemaError;
pub use graph::DependencyGraph;
pub use report::{ErrorKind, ValidationError, ValidationErrors, ValidationFailure, ValidationReport};
pub use resolver::{is_active, DependencyResolver};
pub use schema::{FieldSet, Schema};
pub use spec::{FieldKind, FieldSpec, Nested};
