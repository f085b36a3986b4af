//! # Validation Reports
//!
//! The engine never aborts on a bad document. Every violation becomes a
//! [`ValidationError`] carrying a [`FieldPath`], an [`ErrorKind`] and a
//! message, and all of them are returned together with the resolved
//! document in a [`ValidationReport`].
//!
//! The resolved document is only complete when the report has no errors.
//! [`ValidationReport::into_result`] turns a report into a `Result` for
//! callers that only care about acceptance.

use std::fmt;

use confcheck_core::{FieldPath, Value};
use serde::Serialize;
use thiserror::Error;

/// Category of a document violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The value's kind differs from the declared field kind.
    TypeMismatch,
    /// An empty value where the schema forbids emptiness.
    EmptyNotAllowed,
    /// The value is not in the declared allowed set.
    NotAllowedValue,
    /// An active required field (or a required block) is absent.
    MissingRequiredField,
    /// The field is present but its dependencies are not.
    DependencyUnmet,
    /// The key is not declared by the schema.
    UnknownField,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypeMismatch => "type_mismatch",
            Self::EmptyNotAllowed => "empty_not_allowed",
            Self::NotAllowedValue => "not_allowed_value",
            Self::MissingRequiredField => "missing_required_field",
            Self::DependencyUnmet => "dependency_unmet",
            Self::UnknownField => "unknown_field",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single violation with its location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Where in the document the violation is.
    pub path: FieldPath,
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.path, self.message, self.kind)
    }
}

/// Ordered collection of violations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_inner(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {e}")?;
        }
        Ok(())
    }
}

/// Returned by [`ValidationReport::into_result`] for a rejected document.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("document failed validation with {} error(s):\n{errors}", errors.len())]
pub struct ValidationFailure {
    pub errors: ValidationErrors,
}

/// Outcome of one validation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
    resolved: Value,
}

impl ValidationReport {
    pub(crate) fn new(errors: Vec<ValidationError>, resolved: Value) -> Self {
        Self { errors, resolved }
    }

    /// True when the document is acceptable.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// The document with defaults injected for absent active fields.
    pub fn resolved(&self) -> &Value {
        &self.resolved
    }

    /// Errors whose path renders as `path` (e.g. `"nested.child[2].value"`).
    pub fn errors_at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.errors.iter().filter(move |e| e.path.to_string() == path)
    }

    /// Whether an error of `kind` was reported at `path`.
    pub fn has_error(&self, path: &str, kind: ErrorKind) -> bool {
        self.errors_at(path).any(|e| e.kind == kind)
    }

    pub fn into_parts(self) -> (Vec<ValidationError>, Value) {
        (self.errors, self.resolved)
    }

    /// The resolved document if there are no errors.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFailure`] listing every violation otherwise.
    pub fn into_result(self) -> Result<Value, ValidationFailure> {
        if self.errors.is_empty() {
            Ok(self.resolved)
        } else {
            Err(ValidationFailure {
                errors: ValidationErrors {
                    errors: self.errors,
                },
            })
        }
    }
}
