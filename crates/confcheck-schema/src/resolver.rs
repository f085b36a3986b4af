//! # Dependency Resolver
//!
//! Decides which fields of one mapping are *active* for a given document.
//!
//! A field is active iff every sibling it depends on is present in the
//! document mapping and non-empty. Only raw presence and emptiness are
//! consulted, never the sibling's own validity, so the outcome does not
//! depend on the order fields are validated in. Declared dependency order
//! only determines the order names appear in error messages.

use confcheck_core::Mapping;

use crate::schema::FieldSet;
use crate::spec::FieldSpec;

/// Activation oracle over one document mapping.
#[derive(Debug, Clone, Copy)]
pub struct DependencyResolver<'a> {
    siblings: &'a Mapping,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(siblings: &'a Mapping) -> Self {
        Self { siblings }
    }

    /// Returns true when a dependency is present and non-empty.
    pub fn is_satisfied(&self, dependency: &str) -> bool {
        self.siblings
            .get(dependency)
            .is_some_and(|value| !value.is_empty())
    }

    pub fn is_active(&self, spec: &FieldSpec) -> bool {
        spec.dependencies().iter().all(|dep| self.is_satisfied(dep))
    }

    /// Dependencies of `spec` that are absent or empty, in declared order.
    pub fn unmet<'s>(&self, spec: &'s FieldSpec) -> Vec<&'s str> {
        spec.dependencies()
            .iter()
            .filter(|dep| !self.is_satisfied(dep))
            .map(String::as_str)
            .collect()
    }
}

/// Whether `field` of `fields` is active for `document`.
///
/// Undeclared fields are never active.
pub fn is_active(fields: &FieldSet, field: &str, document: &Mapping) -> bool {
    fields
        .get(field)
        .is_some_and(|spec| DependencyResolver::new(document).is_active(spec))
}
