//! # confcheck-core — Foundational Types for confcheck
//!
//! This crate defines the value tree that every other confcheck crate speaks.
//! Schemas carry their literals (defaults, allowed values) as [`Value`]s and
//! documents arrive as [`Value`]s, so type and emptiness checks have exactly
//! one definition.
//!
//! ## Key Design Principles
//!
//! 1. **One value model.** [`Value`] is a closed tagged union over null,
//!    boolean, integer, float, string, sequence and mapping. Mappings keep
//!    insertion order so resolved documents are emitted deterministically.
//!
//! 2. **No implicit coercion.** An integer is never a float and a float is
//!    never an integer, even when the fraction is zero. [`ValueKind`] is the
//!    only thing the schema layer compares against.
//!
//! 3. **Field-addressable paths.** [`FieldPath`] renders as dotted keys with
//!    bracketed indices (`nested.child[2].value`) and parses back from the
//!    same notation for lookups.
//!
//! 4. **Decoded input only.** Conversions exist from `serde_json::Value` and
//!    `serde_yaml::Value` trees. Reading and parsing text is the caller's job.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `confcheck-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod path;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::CoreError;
pub use path::{FieldPath, PathSegment};
pub use value::{Mapping, Value, ValueKind};
