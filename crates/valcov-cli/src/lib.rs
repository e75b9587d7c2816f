//! # valcov-cli — Validation-Coverage Command-Line Interface
//!
//! The `valcov` binary that runs the coverage audit as a build gate.
//!
//! ## Subcommands
//!
//! - `audit`: audit a registry snapshot against the exception lists
//! - `ratchet`: fail if the known-gap list grew relative to a baseline
//!
//! ## Exit status
//!
//! `0` pass, `1` audit or ratchet failure, `2` unreadable or malformed input.
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to `valcov-audit`; no audit logic here.
//! - Reports go to stdout, logs to stderr.

pub mod audit;
pub mod ratchet;

use std::path::{Path, PathBuf};

use clap::ValueEnum;

/// File name looked up when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "valcov.yaml";

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per finding plus a summary.
    #[default]
    Text,
    /// The full report as pretty-printed JSON.
    Json,
}

/// Walk up from `start` to the nearest directory containing
/// [`CONFIG_FILE_NAME`].
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}
