//! # Show-Builtin Subcommand
//!
//! Prints a built-in schema as a YAML description, suitable as a starting
//! point for a custom schema file.

use anyhow::{Context, Result};
use clap::Args;

use crate::load::{load_schema, BUILTIN_PREFIX};

/// Arguments for the `confcheck show-builtin` subcommand.
#[derive(Args, Debug)]
pub struct ShowBuiltinArgs {
    /// Name of the built-in schema (e.g. `iscsi`).
    #[arg(value_name = "NAME")]
    pub name: String,
}

/// Execute the show-builtin subcommand.
pub fn run_show_builtin(args: &ShowBuiltinArgs) -> Result<u8> {
    let schema = load_schema(&format!("{BUILTIN_PREFIX}{}", args.name))?;
    let yaml = serde_yaml::to_string(&schema.to_description())
        .context("failed to encode schema description")?;
    print!("{yaml}");
    Ok(0)
}
