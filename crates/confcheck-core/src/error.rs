//! # Error Types
//!
//! Errors raised while converting decoded documents into the value tree and
//! while reading typed views out of it. All errors use `thiserror`.

use thiserror::Error;

use crate::value::ValueKind;

/// Top-level error type for `confcheck-core`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A decoded document used a construct the value model cannot represent.
    #[error("unsupported value at {path}: {reason}")]
    Unsupported {
        /// Dotted path of the offending node.
        path: String,
        /// Why the node could not be converted.
        reason: String,
    },

    /// A typed accessor found a value of a different kind.
    #[error("expected {expected} at '{key}', found {found}")]
    WrongKind {
        /// Key or path that was looked up.
        key: String,
        /// Kind the caller asked for.
        expected: ValueKind,
        /// Kind actually stored.
        found: ValueKind,
    },

    /// A textual field path could not be parsed.
    #[error("invalid field path '{path}': {reason}")]
    InvalidPath {
        /// The path as given.
        path: String,
        /// What is wrong with it.
        reason: String,
    },
}
