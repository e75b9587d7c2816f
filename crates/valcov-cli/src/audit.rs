//! # Audit Subcommand
//!
//! Loads a registry snapshot, the exception lists, and the audit
//! configuration, runs the coverage audit, and prints every violation.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use valcov_audit::{AuditConfig, AuditReport, Auditor, ExceptionLists, RegistrySnapshot};
use valcov_core::GroupVersion;

use crate::OutputFormat;

/// Arguments for the `valcov audit` subcommand.
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Registry snapshot listing known types and validator registrations.
    #[arg(long, value_name = "PATH")]
    pub snapshot: PathBuf,

    /// Exception lists (known_exempt / known_gap).
    #[arg(long, value_name = "PATH")]
    pub exceptions: PathBuf,

    /// Group/version to audit, e.g. `v1` or `apps.openshift.io/v1`.
    #[arg(long, value_name = "GROUP/VERSION")]
    pub group_version: Option<String>,

    /// Pointer printed with every violation.
    #[arg(long, value_name = "LOCATION")]
    pub remediation_hint: Option<String>,

    /// Fail on stale or resolved exception entries.
    #[arg(long)]
    pub fail_on_stale: bool,

    /// Fail when a type is in both exception lists.
    #[arg(long)]
    pub fail_on_overlap: bool,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the audit subcommand, printing to stdout.
///
/// Returns exit code: 0 on pass, 1 on violations or escalated advisories.
pub fn run_audit(args: &AuditArgs, config_path: Option<&Path>) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_audit_to(args, config_path, &mut out)
}

/// Execute the audit subcommand, writing the report to `out`.
pub fn run_audit_to(
    args: &AuditArgs,
    config_path: Option<&Path>,
    out: &mut dyn Write,
) -> Result<u8> {
    let config = resolve_config(args, config_path)?;

    let snapshot =
        RegistrySnapshot::load(&args.snapshot).context("failed to load registry snapshot")?;
    let scheme = snapshot.scheme().context("invalid type entries in registry snapshot")?;
    let registry = snapshot
        .registry()
        .context("invalid validator entries in registry snapshot")?;
    let lists = ExceptionLists::load(&args.exceptions).context("failed to load exception lists")?;

    let report = Auditor::new(config).run(&scheme, &registry, &lists);

    match args.format {
        OutputFormat::Text => write_text(&report, out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report).context("failed to serialize report")?;
            writeln!(out)?;
        }
    }

    Ok(if report.passed { 0 } else { 1 })
}

/// Configuration file (or defaults) with command-line overrides applied.
fn resolve_config(args: &AuditArgs, config_path: Option<&Path>) -> Result<AuditConfig> {
    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading audit configuration");
            AuditConfig::load(path).context("failed to load audit configuration")?
        }
        None => AuditConfig::default(),
    };

    if let Some(ref gv) = args.group_version {
        config.group_version = gv
            .parse::<GroupVersion>()
            .with_context(|| format!("invalid --group-version '{gv}'"))?;
    }
    if let Some(ref hint) = args.remediation_hint {
        config.remediation_hint = hint.clone();
    }
    config.fail_on_stale |= args.fail_on_stale;
    config.fail_on_overlap |= args.fail_on_overlap;
    Ok(config)
}

fn write_text(report: &AuditReport, out: &mut dyn Write) -> Result<()> {
    for line in report.violation_lines() {
        writeln!(out, "{line}")?;
    }
    for advisory in &report.advisories {
        writeln!(out, "WARN: {advisory}")?;
    }

    let excused = report.exempted.len() + report.known_gaps.len();
    writeln!(
        out,
        "Coverage ({}): {} audited, {} validated, {} exempt, {} known gaps, {} violations",
        report.group_version,
        report.universe_size,
        report.universe_size - excused - report.violations.len(),
        report.exempted.len(),
        report.known_gaps.len(),
        report.violations.len(),
    )?;

    if !report.violations.is_empty() {
        writeln!(
            out,
            "\n{} type(s) missing validation out of {} audited.",
            report.violations.len(),
            report.universe_size
        )?;
    } else if !report.passed {
        writeln!(out, "\nFailing on exception-list advisories.")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> AuditArgs {
        AuditArgs {
            snapshot: PathBuf::from("snapshot.yaml"),
            exceptions: PathBuf::from("exceptions.yaml"),
            group_version: None,
            remediation_hint: None,
            fail_on_stale: false,
            fail_on_overlap: false,
            format: OutputFormat::Text,
        }
    }

    #[test]
    fn defaults_without_config_file() {
        let config = resolve_config(&args(), None).unwrap();
        assert_eq!(config, AuditConfig::default());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("valcov.yaml");
        std::fs::write(&path, "group_version: v1\nremediation_hint: a.go\n").unwrap();

        let mut a = args();
        a.group_version = Some("apps.openshift.io/v1".into());
        a.remediation_hint = Some("b.go".into());
        a.fail_on_stale = true;

        let config = resolve_config(&a, Some(&path)).unwrap();
        assert_eq!(config.group_version.to_string(), "apps.openshift.io/v1");
        assert_eq!(config.remediation_hint, "b.go");
        assert!(config.fail_on_stale);
        assert!(!config.fail_on_overlap);
    }

    #[test]
    fn flags_cannot_clear_config_strictness() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("valcov.yaml");
        std::fs::write(&path, "fail_on_overlap: true\n").unwrap();
        let config = resolve_config(&args(), Some(&path)).unwrap();
        assert!(config.fail_on_overlap);
    }

    #[test]
    fn bad_group_version_flag_is_error() {
        let mut a = args();
        a.group_version = Some("apps/".into());
        let err = resolve_config(&a, None).unwrap_err();
        assert!(format!("{err:#}").contains("--group-version"));
    }
}
