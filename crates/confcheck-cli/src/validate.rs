//! # Validate Subcommand
//!
//! Validates one or more configuration documents against a schema and
//! prints every violation.
//!
//! A document that decodes to null is treated as an absent block, as is a
//! `--pointer` that does not resolve, so an optional block may simply be
//! left out of the file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use confcheck_core::{FieldPath, Value};
use confcheck_schema::{Schema, ValidationError, ValidationReport};
use serde::Serialize;

use crate::load::{load_schema, read_value};
use crate::EXIT_INVALID;

/// Arguments for the `confcheck validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema description file, or `builtin:<name>`.
    #[arg(long, value_name = "SCHEMA")]
    pub schema: String,

    /// Validate only the block at this path inside each document
    /// (e.g. `ios.iscsi` or `targets[0]`).
    #[arg(long, value_name = "PATH")]
    pub pointer: Option<FieldPath>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also print the resolved document with defaults applied.
    #[arg(long)]
    pub print_resolved: bool,

    /// Documents to validate (YAML for .yaml/.yml, JSON otherwise).
    #[arg(value_name = "DOCUMENT", required = true)]
    pub documents: Vec<PathBuf>,
}

/// How reports are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `OK:`/`FAIL:` line per document, errors indented below.
    Text,
    /// A JSON array with one entry per document.
    Json,
}

/// Per-document entry of the JSON output.
#[derive(Debug, Serialize)]
struct DocumentReport<'a> {
    document: String,
    valid: bool,
    errors: &'a [ValidationError],
    #[serde(skip_serializing_if = "Option::is_none")]
    resolved: Option<&'a Value>,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when every document is valid, 2 when any is not.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let schema = load_schema(&args.schema)?;

    let mut reports = Vec::with_capacity(args.documents.len());
    for path in &args.documents {
        let document = read_value(path)?;
        let report = validate_document(&schema, &document, args.pointer.as_ref());
        tracing::info!(
            document = %path.display(),
            errors = report.errors().len(),
            "validated document"
        );
        reports.push((path, report));
    }

    match args.format {
        OutputFormat::Text => {
            for (path, report) in &reports {
                print_text(&path.display().to_string(), report, args.print_resolved)?;
            }
        }
        OutputFormat::Json => {
            let entries: Vec<DocumentReport<'_>> = reports
                .iter()
                .map(|(path, report)| DocumentReport {
                    document: path.display().to_string(),
                    valid: report.is_valid(),
                    errors: report.errors(),
                    resolved: args.print_resolved.then(|| report.resolved()),
                })
                .collect();
            let json = serde_json::to_string_pretty(&entries).context("failed to encode report")?;
            println!("{json}");
        }
    }

    let invalid = reports.iter().filter(|(_, r)| !r.is_valid()).count();
    if invalid > 0 {
        tracing::warn!(invalid, total = reports.len(), "validation failed");
        Ok(EXIT_INVALID)
    } else {
        Ok(0)
    }
}

/// Validate `document`, narrowed to `pointer` when given.
pub fn validate_document(
    schema: &Schema,
    document: &Value,
    pointer: Option<&FieldPath>,
) -> ValidationReport {
    let block = match pointer {
        Some(path) => document.pointer(path),
        None => Some(document),
    };
    schema.validate(block.filter(|v| !v.is_null()))
}

fn print_text(name: &str, report: &ValidationReport, print_resolved: bool) -> Result<()> {
    if report.is_valid() {
        println!("OK: {name}");
    } else {
        println!("FAIL: {name} ({} error(s))", report.errors().len());
        for error in report.errors() {
            println!("  {error}");
        }
    }
    if print_resolved {
        let yaml = serde_yaml::to_string(report.resolved())
            .context("failed to encode resolved document")?;
        for line in yaml.lines() {
            println!("    {line}");
        }
    }
    Ok(())
}
