//! # confcheck CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber and
//! dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use confcheck_cli::check::{run_check, CheckArgs};
use confcheck_cli::show::{run_show_builtin, ShowBuiltinArgs};
use confcheck_cli::validate::{run_validate, ValidateArgs};

/// Schema-driven configuration validator.
///
/// Checks YAML or JSON configuration blocks against declarative schemas,
/// reports every violation at once, and shows the configuration with
/// defaults applied.
#[derive(Parser, Debug)]
#[command(name = "confcheck", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate documents against a schema.
    Validate(ValidateArgs),

    /// Check that a schema description is well formed.
    Check(CheckArgs),

    /// Print a built-in schema as a YAML description.
    ShowBuiltin(ShowBuiltinArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("confcheck {} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Check(args) => run_check(&args),
        Commands::ShowBuiltin(args) => run_show_builtin(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
