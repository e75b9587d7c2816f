//! # Ratchet Subcommand
//!
//! Compares the exception lists against a baseline copy and fails if the
//! known-gap list grew.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use valcov_audit::{ratchet, ExceptionLists, RatchetReport};

use crate::OutputFormat;

/// Arguments for the `valcov ratchet` subcommand.
#[derive(Args, Debug)]
pub struct RatchetArgs {
    /// Exception lists as of the baseline (e.g. the main branch).
    #[arg(long, value_name = "PATH")]
    pub baseline: PathBuf,

    /// Exception lists under review.
    #[arg(long, value_name = "PATH")]
    pub current: PathBuf,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the ratchet subcommand, printing to stdout.
pub fn run_ratchet(args: &RatchetArgs) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_ratchet_to(args, &mut out)
}

/// Execute the ratchet subcommand, writing the report to `out`.
pub fn run_ratchet_to(args: &RatchetArgs, out: &mut dyn Write) -> Result<u8> {
    let baseline = ExceptionLists::load(&args.baseline)
        .context("failed to load baseline exception lists")?;
    let current = ExceptionLists::load(&args.current)
        .context("failed to load current exception lists")?;

    let report = ratchet(&baseline, &current);

    match args.format {
        OutputFormat::Text => write_text(&report, &baseline, &current, out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report).context("failed to serialize report")?;
            writeln!(out)?;
        }
    }

    Ok(if report.passed() { 0 } else { 1 })
}

fn write_text(
    report: &RatchetReport,
    baseline: &ExceptionLists,
    current: &ExceptionLists,
    out: &mut dyn Write,
) -> Result<()> {
    for entry in &report.added_gaps {
        writeln!(
            out,
            "  FAIL: {} added to known_gap ({}). Register a validator or justify an exemption instead.",
            entry.descriptor, entry.reason
        )?;
    }
    for entry in &report.added_exemptions {
        writeln!(out, "  REVIEW: {} added to known_exempt: {}", entry.descriptor, entry.reason)?;
    }
    for descriptor in &report.resolved_gaps {
        writeln!(out, "  OK: {descriptor} removed from known_gap")?;
    }
    writeln!(
        out,
        "Known gaps: {} -> {}",
        baseline.known_gap.len(),
        current.known_gap.len()
    )?;
    Ok(())
}
