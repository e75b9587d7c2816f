//! # valcov CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use valcov_cli::audit::{run_audit, AuditArgs};
use valcov_cli::ratchet::{run_ratchet, RatchetArgs};

/// Validation-coverage auditor.
///
/// Checks that every type known to a type registry has a registered
/// validator, apart from reviewed exemptions and tracked known gaps.
#[derive(Parser, Debug)]
#[command(name = "valcov", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the audit configuration file. Defaults to the nearest
    /// `valcov.yaml` in the current directory or its ancestors.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Audit a registry snapshot for types without validators.
    Audit(AuditArgs),

    /// Fail if the known-gap list grew relative to a baseline.
    Ratchet(RatchetArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("valcov CLI starting");

    let config = cli.config.or_else(|| {
        let cwd = std::env::current_dir().ok()?;
        valcov_cli::discover_config(&cwd)
    });

    if let Some(ref path) = config {
        tracing::debug!(config = %path.display(), "using audit configuration");
    }

    let result = match cli.command {
        Commands::Audit(args) => run_audit(&args, config.as_deref()),
        Commands::Ratchet(args) => run_ratchet(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
