//! # File Loading
//!
//! Reads documents and schema descriptions from disk. Files ending in
//! `.yaml` or `.yml` are decoded as YAML, everything else as JSON.
//! Schemas may also be referenced as `builtin:<name>`.

use std::path::Path;

use anyhow::{bail, Context, Result};
use confcheck_core::Value;
use confcheck_schema::{builtin, Schema, BUILTIN_NAMES};

/// Prefix selecting a built-in schema instead of a file.
pub const BUILTIN_PREFIX: &str = "builtin:";

/// Whether `path` should be decoded as YAML.
pub fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

/// Decode `text` into a [`Value`].
pub fn decode(text: &str, yaml: bool) -> Result<Value> {
    let value = if yaml {
        let raw: serde_yaml::Value = serde_yaml::from_str(text).context("invalid YAML")?;
        Value::try_from(raw)?
    } else {
        let raw: serde_json::Value = serde_json::from_str(text).context("invalid JSON")?;
        Value::try_from(raw)?
    };
    Ok(value)
}

/// Read and decode a file.
pub fn read_value(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    decode(&text, is_yaml(path)).with_context(|| format!("failed to decode {}", path.display()))
}

/// Load a schema from a description file or a `builtin:<name>` reference.
pub fn load_schema(source: &str) -> Result<Schema> {
    if let Some(name) = source.strip_prefix(BUILTIN_PREFIX) {
        return match builtin(name) {
            Some(schema) => schema.with_context(|| format!("built-in schema '{name}' is invalid")),
            None => bail!(
                "unknown built-in schema '{name}' (available: {})",
                BUILTIN_NAMES.join(", ")
            ),
        };
    }

    let path = Path::new(source);
    let description = read_value(path)?;
    let schema = Schema::from_description(&description)
        .with_context(|| format!("invalid schema {}", path.display()))?;
    tracing::debug!(
        schema = %path.display(),
        fields = schema.fields().len(),
        "loaded schema description"
    );
    Ok(schema)
}
