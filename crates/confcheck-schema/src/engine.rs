//! # Validation Engine
//!
//! Walks a document against a [`Schema`] and produces a [`ValidationReport`].
//!
//! Validation is non-fail-fast: a [`Collector`] is threaded through the
//! recursion and every violation is recorded, so a user can fix all problems
//! of a configuration file in one pass. The document is never mutated; the
//! resolved document is built alongside as a fresh value with defaults
//! injected for absent active fields.
//!
//! ## Per-mapping algorithm
//!
//! 1. Declared fields are visited in declaration order. A present field gets
//!    its own checks (kind, emptiness, allowed set), a `DependencyUnmet` error
//!    when inactive, and recursion into its nested schema when the kind
//!    matches. An absent active field is either reported missing (required)
//!    or defaulted.
//! 2. Remaining document keys are undeclared and reported as `UnknownField`.
//!    They are kept at the end of the resolved mapping.

use confcheck_core::{FieldPath, Mapping, Value};

use crate::report::{ErrorKind, ValidationError, ValidationReport};
use crate::resolver::DependencyResolver;
use crate::schema::{FieldSet, Schema};
use crate::spec::{FieldSpec, Nested};

/// Accumulates violations during one validation call.
#[derive(Debug, Default)]
struct Collector {
    errors: Vec<ValidationError>,
}

impl Collector {
    fn push(&mut self, path: &FieldPath, kind: ErrorKind, message: impl Into<String>) {
        self.errors.push(ValidationError {
            path: path.clone(),
            kind,
            message: message.into(),
        });
    }
}

/// Validate `document` against `schema`. `None` means the block is absent.
///
/// This function is pure and never panics on any input document.
pub fn validate(schema: &Schema, document: Option<&Value>) -> ValidationReport {
    let root = FieldPath::root();
    let mut errors = Collector::default();

    let resolved = match document {
        None => {
            if schema.is_required() {
                errors.push(
                    &root,
                    ErrorKind::MissingRequiredField,
                    "required configuration block is missing",
                );
            }
            Value::empty_mapping()
        }
        Some(Value::Mapping(map)) => {
            if map.is_empty() && !schema.allows_empty() {
                errors.push(
                    &root,
                    ErrorKind::EmptyNotAllowed,
                    "empty values are not allowed",
                );
            }
            Value::Mapping(validate_mapping(schema.fields(), map, &root, &mut errors))
        }
        Some(other) => {
            errors.push(
                &root,
                ErrorKind::TypeMismatch,
                format!("expected mapping, found {}", other.kind()),
            );
            other.clone()
        }
    };

    tracing::debug!(errors = errors.errors.len(), "validation finished");
    ValidationReport::new(errors.errors, resolved)
}

fn validate_mapping(
    fields: &FieldSet,
    map: &Mapping,
    path: &FieldPath,
    errors: &mut Collector,
) -> Mapping {
    let resolver = DependencyResolver::new(map);
    let mut resolved = Mapping::with_capacity(map.len().max(fields.len()));

    for (name, spec) in fields.iter() {
        let field_path = path.key(name);
        let active = resolver.is_active(spec);

        match map.get(name) {
            Some(value) => {
                let value = validate_value(spec, value, &field_path, errors);
                if !active {
                    let unmet = resolver.unmet(spec).join(", ");
                    errors.push(
                        &field_path,
                        ErrorKind::DependencyUnmet,
                        format!("field requires non-empty sibling(s): {unmet}"),
                    );
                }
                resolved.insert(name.to_string(), value);
            }
            None if !active => {
                tracing::trace!(field = %field_path, "inactive field skipped");
            }
            None if spec.is_required() => {
                errors.push(
                    &field_path,
                    ErrorKind::MissingRequiredField,
                    "required field is missing",
                );
            }
            None => {
                if let Some(default) = spec.default() {
                    tracing::trace!(field = %field_path, default = %default, "default injected");
                    resolved.insert(name.to_string(), default.clone());
                }
            }
        }
    }

    for (key, value) in map {
        if !fields.contains(key) {
            errors.push(&path.key(key.as_str()), ErrorKind::UnknownField, "unknown field");
            resolved.insert(key.clone(), value.clone());
        }
    }

    resolved
}

/// Own checks of one present value, then recursion into nested rules.
/// Returns the resolved value.
fn validate_value(
    spec: &FieldSpec,
    value: &Value,
    path: &FieldPath,
    errors: &mut Collector,
) -> Value {
    if value.is_null() {
        if !spec.is_nullable() {
            errors.push(
                path,
                ErrorKind::TypeMismatch,
                format!("expected {}, found null", spec.kind()),
            );
        }
        return Value::Null;
    }

    let kind_ok = spec.kind().accepts(value.kind());
    if !kind_ok {
        errors.push(
            path,
            ErrorKind::TypeMismatch,
            format!("expected {}, found {}", spec.kind(), value.kind()),
        );
    }

    if value.is_empty() && !spec.allows_empty() {
        errors.push(path, ErrorKind::EmptyNotAllowed, "empty values are not allowed");
    }

    // Allowed sets are kind-checked at construction, so a mismatched value
    // can never be a member.
    if !kind_ok {
        return value.clone();
    }

    match value {
        Value::Sequence(items) => {
            let item_spec = match spec.nested() {
                Some(Nested::Items(item)) => Some(item.as_ref()),
                _ => None,
            };
            let mut resolved = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let item_path = path.index(i);
                let item_value = match item_spec {
                    Some(item_spec) => validate_value(item_spec, item, &item_path, errors),
                    None => item.clone(),
                };
                // Null elements and elements of the wrong kind are settled by
                // the item rules alone.
                let comparable = item_spec
                    .map_or(true, |s| !item.is_null() && s.kind().accepts(item.kind()));
                if comparable && !spec.permits(item) {
                    errors.push(
                        &item_path,
                        ErrorKind::NotAllowedValue,
                        format!("unallowed value {item}"),
                    );
                }
                resolved.push(item_value);
            }
            Value::Sequence(resolved)
        }
        Value::Mapping(map) => {
            if !spec.permits(value) {
                errors.push(
                    path,
                    ErrorKind::NotAllowedValue,
                    format!("unallowed value {value}"),
                );
            }
            match spec.nested() {
                Some(Nested::Mapping(fields)) => {
                    Value::Mapping(validate_mapping(fields, map, path, errors))
                }
                _ => value.clone(),
            }
        }
        scalar => {
            if !spec.permits(scalar) {
                errors.push(
                    path,
                    ErrorKind::NotAllowedValue,
                    format!("unallowed value {scalar}"),
                );
            }
            scalar.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(json: serde_json::Value) -> Value {
        Value::try_from(json).unwrap()
    }

    fn chap() -> Schema {
        Schema::from_fields([
            ("username", FieldSpec::string().allow_empty(false)),
            ("password", FieldSpec::string().allow_empty(false).depends_on(["username"])),
            (
                "targetUsername",
                FieldSpec::string()
                    .allow_empty(false)
                    .depends_on(["targetPassword", "username"]),
            ),
            (
                "targetPassword",
                FieldSpec::string()
                    .allow_empty(false)
                    .depends_on(["targetUsername", "username"]),
            ),
            (
                "headerDigest",
                FieldSpec::string()
                    .allow_empty(false)
                    .allowed(["NONE", "NONE_CRC32C", "CRC32C_NONE", "CRC32C"])
                    .default_value("NONE_CRC32C"),
            ),
            ("timeout", FieldSpec::integer().allow_empty(false).default_value(0)),
        ])
        .unwrap()
    }

    fn kinds(report: &ValidationReport) -> Vec<(String, ErrorKind)> {
        report
            .errors()
            .iter()
            .map(|e| (e.path.to_string(), e.kind))
            .collect()
    }

    #[test]
    fn test_absent_optional_block_is_valid_without_defaults() {
        let report = validate(&chap(), None);
        assert!(report.is_valid());
        assert_eq!(report.resolved(), &Value::empty_mapping());
    }

    #[test]
    fn test_absent_required_block() {
        let report = validate(&chap().required(true), None);
        assert_eq!(kinds(&report), [("(root)".to_string(), ErrorKind::MissingRequiredField)]);
    }

    #[test]
    fn test_empty_block_gets_defaults() {
        let report = validate(&chap(), Some(&doc(json!({}))));
        assert!(report.is_valid());
        assert_eq!(
            report.resolved(),
            &doc(json!({"headerDigest": "NONE_CRC32C", "timeout": 0}))
        );
    }

    #[test]
    fn test_empty_block_not_allowed() {
        let report = validate(&chap().allow_empty(false), Some(&doc(json!({}))));
        assert_eq!(kinds(&report), [("(root)".to_string(), ErrorKind::EmptyNotAllowed)]);
        // Defaults are still injected.
        assert_eq!(report.resolved().get("timeout"), Some(&Value::Int(0)));
    }

    #[test]
    fn test_non_mapping_document() {
        let document = doc(json!(["a"]));
        let report = validate(&chap(), Some(&document));
        assert_eq!(kinds(&report), [("(root)".to_string(), ErrorKind::TypeMismatch)]);
        assert_eq!(report.errors()[0].message, "expected mapping, found sequence");
        assert_eq!(report.resolved(), &document);
    }

    #[test]
    fn test_null_document_is_type_mismatch() {
        let report = validate(&chap(), Some(&Value::Null));
        assert_eq!(kinds(&report), [("(root)".to_string(), ErrorKind::TypeMismatch)]);
    }

    #[test]
    fn test_password_without_username() {
        let report = validate(&chap(), Some(&doc(json!({"password": "p"}))));
        assert_eq!(kinds(&report), [("password".to_string(), ErrorKind::DependencyUnmet)]);
        assert_eq!(
            report.errors()[0].message,
            "field requires non-empty sibling(s): username"
        );
    }

    #[test]
    fn test_target_username_alone_names_both_dependencies() {
        let report = validate(&chap(), Some(&doc(json!({"targetUsername": "t"}))));
        assert_eq!(kinds(&report), [("targetUsername".to_string(), ErrorKind::DependencyUnmet)]);
        assert!(report.errors()[0].message.ends_with("targetPassword, username"));
    }

    #[test]
    fn test_inactive_field_still_type_checked() {
        let report = validate(&chap(), Some(&doc(json!({"password": 7}))));
        assert_eq!(
            kinds(&report),
            [
                ("password".to_string(), ErrorKind::TypeMismatch),
                ("password".to_string(), ErrorKind::DependencyUnmet),
            ]
        );
    }

    #[test]
    fn test_not_allowed_value() {
        let report = validate(&chap(), Some(&doc(json!({"headerDigest": "BOGUS"}))));
        assert_eq!(kinds(&report), [("headerDigest".to_string(), ErrorKind::NotAllowedValue)]);
        assert_eq!(report.errors()[0].message, r#"unallowed value "BOGUS""#);
    }

    #[test]
    fn test_type_mismatch_skips_allowed_check() {
        let report = validate(&chap(), Some(&doc(json!({"headerDigest": 3}))));
        assert_eq!(kinds(&report), [("headerDigest".to_string(), ErrorKind::TypeMismatch)]);
    }

    #[test]
    fn test_integer_rejects_float() {
        let report = validate(&chap(), Some(&doc(json!({"timeout": 30.0}))));
        assert_eq!(kinds(&report), [("timeout".to_string(), ErrorKind::TypeMismatch)]);
        assert_eq!(report.errors()[0].message, "expected integer, found float");
    }

    #[test]
    fn test_zero_is_not_empty() {
        let report = validate(&chap(), Some(&doc(json!({"timeout": 0}))));
        assert!(report.is_valid());
    }

    #[test]
    fn test_empty_string_rejected() {
        let report = validate(&chap(), Some(&doc(json!({"username": ""}))));
        assert_eq!(kinds(&report), [("username".to_string(), ErrorKind::EmptyNotAllowed)]);
    }

    #[test]
    fn test_null_field_not_nullable() {
        let report = validate(&chap(), Some(&doc(json!({"username": null}))));
        assert_eq!(kinds(&report), [("username".to_string(), ErrorKind::TypeMismatch)]);
        assert_eq!(report.errors()[0].message, "expected string, found null");
    }

    #[test]
    fn test_nullable_field_accepts_null() {
        let schema = Schema::from_fields([(
            "comment",
            FieldSpec::string().nullable(true).allow_empty(false),
        )])
        .unwrap();
        let report = validate(&schema, Some(&doc(json!({"comment": null}))));
        assert!(report.is_valid());
        assert_eq!(report.resolved(), &doc(json!({"comment": null})));
    }

    #[test]
    fn test_unknown_fields_appended_after_declared() {
        let report = validate(&chap(), Some(&doc(json!({"foo": 1, "username": "u"}))));
        assert_eq!(kinds(&report), [("foo".to_string(), ErrorKind::UnknownField)]);
        let keys: Vec<&str> = report
            .resolved()
            .as_mapping()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["username", "headerDigest", "timeout", "foo"]);
    }

    #[test]
    fn test_required_active_field_missing() {
        let schema = Schema::from_fields([
            ("username", FieldSpec::string()),
            ("password", FieldSpec::string().required(true).depends_on(["username"])),
        ])
        .unwrap();
        let report = validate(&schema, Some(&doc(json!({"username": "u"}))));
        assert_eq!(kinds(&report), [("password".to_string(), ErrorKind::MissingRequiredField)]);

        // Inactive required fields are not demanded.
        let report = validate(&schema, Some(&doc(json!({}))));
        assert!(report.is_valid());
    }

    #[test]
    fn test_inactive_field_not_defaulted() {
        let schema = Schema::from_fields([
            ("mode", FieldSpec::string()),
            ("level", FieldSpec::integer().default_value(3).depends_on(["mode"])),
        ])
        .unwrap();
        let report = validate(&schema, Some(&doc(json!({}))));
        assert_eq!(report.resolved(), &doc(json!({})));
        let report = validate(&schema, Some(&doc(json!({"mode": "fast"}))));
        assert_eq!(report.resolved(), &doc(json!({"mode": "fast", "level": 3})));
    }

    #[test]
    fn test_nested_paths() {
        let child = FieldSet::new([("value", FieldSpec::integer().required(true))]).unwrap();
        let nested = FieldSet::new([(
            "child",
            FieldSpec::sequence().items(FieldSpec::mapping().fields(child)),
        )])
        .unwrap();
        let schema =
            Schema::from_fields([("nested", FieldSpec::mapping().fields(nested))]).unwrap();

        let document = doc(json!({
            "nested": {"child": [{"value": 1}, {"value": 2}, {"value": "x"}, {}]}
        }));
        let report = validate(&schema, Some(&document));
        assert_eq!(
            kinds(&report),
            [
                ("nested.child[2].value".to_string(), ErrorKind::TypeMismatch),
                ("nested.child[3].value".to_string(), ErrorKind::MissingRequiredField),
            ]
        );
    }

    #[test]
    fn test_nested_defaults_resolved() {
        let inner = FieldSet::new([("port", FieldSpec::integer().default_value(3260))]).unwrap();
        let schema = Schema::from_fields([("portal", FieldSpec::mapping().fields(inner))]).unwrap();
        let report = validate(&schema, Some(&doc(json!({"portal": {}}))));
        assert!(report.is_valid());
        assert_eq!(report.resolved(), &doc(json!({"portal": {"port": 3260}})));
    }

    #[test]
    fn test_sequence_allowed_set_applies_per_element() {
        let schema = Schema::from_fields([(
            "transforms",
            FieldSpec::sequence()
                .items(FieldSpec::string())
                .allowed(["zstd", "aes"]),
        )])
        .unwrap();
        let report = validate(&schema, Some(&doc(json!({"transforms": ["zstd", "lz4", "aes"]}))));
        assert_eq!(kinds(&report), [("transforms[1]".to_string(), ErrorKind::NotAllowedValue)]);
    }

    #[test]
    fn test_sequence_null_element_skips_allowed_set() {
        let schema = Schema::from_fields([(
            "list",
            FieldSpec::sequence()
                .items(FieldSpec::string().nullable(true))
                .allowed(["a"]),
        )])
        .unwrap();
        let report = validate(&schema, Some(&doc(json!({"list": [null, "a"]}))));
        assert!(report.is_valid(), "errors: {:?}", report.errors());
        assert_eq!(report.resolved(), &doc(json!({"list": [null, "a"]})));
    }

    #[test]
    fn test_sequence_wrong_kind_element_is_only_type_mismatch() {
        let schema = Schema::from_fields([(
            "list",
            FieldSpec::sequence().items(FieldSpec::string()).allowed(["a"]),
        )])
        .unwrap();
        let report = validate(&schema, Some(&doc(json!({"list": [3, "b", null]}))));
        assert_eq!(
            kinds(&report),
            [
                ("list[0]".to_string(), ErrorKind::TypeMismatch),
                ("list[1]".to_string(), ErrorKind::NotAllowedValue),
                ("list[2]".to_string(), ErrorKind::TypeMismatch),
            ]
        );
    }

    #[test]
    fn test_container_without_nested_schema_is_unconstrained() {
        let schema = Schema::from_fields([("extra", FieldSpec::mapping())]).unwrap();
        let report = validate(&schema, Some(&doc(json!({"extra": {"anything": [1, 2]}}))));
        assert!(report.is_valid());
    }

    #[test]
    fn test_all_errors_collected() {
        let report = validate(
            &chap(),
            Some(&doc(json!({
                "password": "p",
                "headerDigest": "BOGUS",
                "timeout": "30",
                "foo": true
            }))),
        );
        assert_eq!(
            kinds(&report),
            [
                ("password".to_string(), ErrorKind::DependencyUnmet),
                ("headerDigest".to_string(), ErrorKind::NotAllowedValue),
                ("timeout".to_string(), ErrorKind::TypeMismatch),
                ("foo".to_string(), ErrorKind::UnknownField),
            ]
        );
    }
}
