//! # Check Subcommand
//!
//! Loads a schema description and reports whether it is a valid schema.

use anyhow::Result;
use clap::Args;
use confcheck_schema::SchemaError;

use crate::load::load_schema;

/// Arguments for the `confcheck check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema description file, or `builtin:<name>`.
    #[arg(long, value_name = "SCHEMA")]
    pub schema: String,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 for a valid schema, 1 when the description is
/// rejected. Read and decode failures are returned as errors.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    match load_schema(&args.schema) {
        Ok(schema) => {
            let fields = schema.fields();
            println!(
                "OK: {} ({} field(s), {} dependency edge(s))",
                args.schema,
                fields.len(),
                fields.graph().edge_count()
            );
            Ok(0)
        }
        Err(e) if e.downcast_ref::<SchemaError>().is_some() => {
            println!("FAIL: {e:#}");
            Ok(1)
        }
        Err(e) => Err(e),
    }
}
