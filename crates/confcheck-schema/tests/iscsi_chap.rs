//! Integration test: the iSCSI CHAP calibration scenarios.
//!
//! Every scenario runs twice, once against the built-in schema and once
//! against `schemas/iscsi.yaml` loaded through the description loader, and
//! both must agree.

use std::path::PathBuf;
use std::sync::Arc;

use confcheck_core::Value;
use confcheck_schema::{iscsi_chap_schema, ErrorKind, Schema, ValidationReport};
use serde_json::json;

/// Find the repository root.
fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

fn yaml_schema() -> Schema {
    let path = repo_root().join("schemas").join("iscsi.yaml");
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    let yaml: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
    Schema::from_description(&Value::try_from(yaml).unwrap()).unwrap()
}

fn schemas() -> [Schema; 2] {
    [iscsi_chap_schema().unwrap(), yaml_schema()]
}

fn doc(json: serde_json::Value) -> Value {
    Value::try_from(json).unwrap()
}

fn validate_both(document: serde_json::Value) -> ValidationReport {
    let document = doc(document);
    let [builtin, loaded] = schemas();
    let a = builtin.validate(Some(&document));
    let b = loaded.validate(Some(&document));
    assert_eq!(a, b, "built-in and YAML schemas disagree");
    a
}

fn defaults() -> serde_json::Value {
    json!({
        "headerDigest": "NONE_CRC32C",
        "initiatorName": "iqn.2019-04.me.benji-backup:benji",
        "timeout": 0
    })
}

#[test]
fn test_yaml_schema_equals_builtin() {
    let [builtin, loaded] = schemas();
    assert_eq!(builtin, loaded);
}

#[test]
fn test_scenario_a_empty_block() {
    let report = validate_both(json!({}));
    assert!(report.is_valid(), "{:?}", report.errors());
    assert_eq!(report.resolved(), &doc(defaults()));
}

#[test]
fn test_scenario_b_lone_target_username() {
    let report = validate_both(json!({"targetUsername": "t"}));
    assert_eq!(report.errors().len(), 1);
    assert!(report.has_error("targetUsername", ErrorKind::DependencyUnmet));
}

#[test]
fn test_scenario_c_full_credentials() {
    let report = validate_both(json!({
        "username": "u",
        "password": "p",
        "targetUsername": "tu",
        "targetPassword": "tp"
    }));
    assert!(report.is_valid(), "{:?}", report.errors());
    assert_eq!(
        report.resolved(),
        &doc(json!({
            "username": "u",
            "password": "p",
            "targetUsername": "tu",
            "targetPassword": "tp",
            "headerDigest": "NONE_CRC32C",
            "initiatorName": "iqn.2019-04.me.benji-backup:benji",
            "timeout": 0
        }))
    );
}

#[test]
fn test_scenario_d_string_timeout() {
    let report = validate_both(json!({"timeout": "30"}));
    assert_eq!(report.errors().len(), 1);
    assert!(report.has_error("timeout", ErrorKind::TypeMismatch));
}

#[test]
fn test_password_without_username() {
    let report = validate_both(json!({"password": "p"}));
    assert!(report.has_error("password", ErrorKind::DependencyUnmet));
    // Credentials are never defaulted.
    let resolved = report.resolved();
    assert!(resolved.get("username").is_none());
    assert!(resolved.get("targetUsername").is_none());
    assert!(resolved.get("targetPassword").is_none());
}

#[test]
fn test_no_username_means_no_credential_requirements() {
    let report = validate_both(json!({"headerDigest": "CRC32C"}));
    assert!(report.is_valid());
}

#[test]
fn test_bogus_header_digest() {
    let report = validate_both(json!({"headerDigest": "BOGUS"}));
    let errors: Vec<_> = report.errors_at("headerDigest").collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::NotAllowedValue);
    assert_eq!(report.errors().len(), 1);
}

#[test]
fn test_unknown_key() {
    let report = validate_both(json!({"foo": "bar"}));
    assert!(report.has_error("foo", ErrorKind::UnknownField));
}

#[test]
fn test_empty_credential_rejected() {
    let report = validate_both(json!({"username": ""}));
    assert!(report.has_error("username", ErrorKind::EmptyNotAllowed));
}

#[test]
fn test_target_pair_with_empty_username_is_unmet() {
    let report = validate_both(json!({
        "username": "",
        "targetUsername": "tu",
        "targetPassword": "tp"
    }));
    assert!(report.has_error("username", ErrorKind::EmptyNotAllowed));
    assert!(report.has_error("targetUsername", ErrorKind::DependencyUnmet));
    assert!(report.has_error("targetPassword", ErrorKind::DependencyUnmet));
}

#[test]
fn test_absent_block() {
    for schema in schemas() {
        let report = schema.validate(None);
        assert!(report.is_valid());
        assert_eq!(report.resolved(), &Value::empty_mapping());
    }
}

#[test]
fn test_resolved_document_is_idempotent() {
    let report = validate_both(json!({"username": "u", "password": "p", "timeout": 30}));
    let resolved = report.into_result().unwrap();
    let again = iscsi_chap_schema().unwrap().validate(Some(&resolved));
    assert!(again.is_valid());
    assert_eq!(again.resolved(), &resolved);
}

#[test]
fn test_resolved_settings_read_back_typed() {
    let resolved = validate_both(json!({"timeout": 15}))
        .into_result()
        .unwrap();
    assert_eq!(resolved.get_i64("timeout").unwrap(), Some(15));
    assert_eq!(resolved.get_str("headerDigest").unwrap(), Some("NONE_CRC32C"));
    assert_eq!(resolved.get_str("username").unwrap(), None);
    assert!(resolved.get_bool("timeout").is_err());
}

#[test]
fn test_schema_shared_across_threads() {
    let schema = Arc::new(iscsi_chap_schema().unwrap());
    let documents = [
        json!({}),
        json!({"targetUsername": "t"}),
        json!({"timeout": "30"}),
        json!({"username": "u", "password": "p"}),
    ];

    std::thread::scope(|scope| {
        let handles: Vec<_> = documents
            .iter()
            .map(|document| {
                let schema = Arc::clone(&schema);
                let document = doc(document.clone());
                scope.spawn(move || schema.validate(Some(&document)).is_valid())
            })
            .collect();
        let valid: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(valid, [true, false, false, true]);
    });
}
