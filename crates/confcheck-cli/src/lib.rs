//! # confcheck-cli — Command-Line Interface for confcheck
//!
//! Provides the `confcheck` binary. Argument parsing lives in `main.rs`;
//! each subcommand has a handler module that reads files, calls into
//! `confcheck-schema`, and prints results.
//!
//! ## Subcommands
//!
//! - `confcheck validate` — validate documents against a schema.
//! - `confcheck check` — load a schema description and report schema errors.
//! - `confcheck show-builtin` — print a built-in schema as a YAML description.
//!
//! ```bash
//! confcheck validate --schema builtin:iscsi config/iscsi.yaml
//! confcheck validate --schema schemas/iscsi.yaml --pointer ios.iscsi --format json benji.yaml
//! confcheck check --schema schemas/iscsi.yaml
//! ```
//!
//! ## Exit Codes
//!
//! - `0` — success, every document valid.
//! - `1` — I/O, decoding or schema error.
//! - `2` — at least one document failed validation.
//!
//! ## Crate Policy
//!
//! - Handler functions delegate to the library crates; no validation logic here.
//! - Handlers return `anyhow::Result<u8>` with the exit code; `main` logs errors.

pub mod check;
pub mod load;
pub mod show;
pub mod validate;

/// Exit code for a document that failed validation.
pub const EXIT_INVALID: u8 = 2;
