//! # Coverage Auditor
//!
//! The core check: every type in the universe must have a validator, be a
//! permanent exemption, or be a tracked known gap.
//!
//! [`audit`] is the pure set computation. [`Auditor`] runs it against live
//! sources and adds what a build gate needs around it: per-type diagnostics,
//! advisories about exception lists drifting out of date, and a pass/fail
//! verdict shaped by [`AuditConfig`].
//!
//! ## Failure semantics
//!
//! Every violation is reported, one diagnostic per type. Nothing is
//! short-circuited: a single run yields the complete remediation list.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use valcov_core::{GroupVersion, TypeDescriptor};

use crate::config::AuditConfig;
use crate::exceptions::{ExceptionLists, KNOWN_EXEMPT, KNOWN_GAP};
use crate::registry::CoverageSource;
use crate::universe::{all_types, TypeUniverseSource};

/// Types in `universe` that are neither covered, exempt, nor known gaps.
///
/// Inputs may be in any order and may repeat entries; the result is a set
/// and depends only on set membership.
pub fn audit<'a, U, C, E, G>(
    universe: U,
    covered: C,
    exempt: E,
    known_gap: G,
) -> BTreeSet<TypeDescriptor>
where
    U: IntoIterator<Item = &'a TypeDescriptor>,
    C: IntoIterator<Item = &'a TypeDescriptor>,
    E: IntoIterator<Item = &'a TypeDescriptor>,
    G: IntoIterator<Item = &'a TypeDescriptor>,
{
    let covered: BTreeSet<&TypeDescriptor> = covered.into_iter().collect();
    let excused: BTreeSet<&TypeDescriptor> = exempt.into_iter().chain(known_gap).collect();

    universe
        .into_iter()
        .filter(|t| !covered.contains(t) && !excused.contains(t))
        .cloned()
        .collect()
}

/// A type in the universe with no validator and no exception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageViolation {
    #[serde(rename = "type")]
    pub descriptor: TypeDescriptor,
    pub remediation_hint: String,
}

impl fmt::Display for CoverageViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is not registered. See {}.",
            self.descriptor, self.remediation_hint
        )
    }
}

/// Ways the exception lists can disagree with reality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    /// Listed in both `known_exempt` and `known_gap`.
    Overlap,
    /// `known_exempt` entry for a type no longer in the universe.
    StaleExemption,
    /// `known_gap` entry for a type no longer in the universe.
    StaleKnownGap,
    /// `known_gap` entry for a type that now has a validator.
    ResolvedKnownGap,
}

impl AdvisoryKind {
    /// Whether `config` escalates this kind to a failure.
    pub fn is_fatal(self, config: &AuditConfig) -> bool {
        match self {
            AdvisoryKind::Overlap => config.fail_on_overlap,
            AdvisoryKind::StaleExemption
            | AdvisoryKind::StaleKnownGap
            | AdvisoryKind::ResolvedKnownGap => config.fail_on_stale,
        }
    }
}

/// A non-blocking finding about the exception lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub kind: AdvisoryKind,
    #[serde(rename = "type")]
    pub descriptor: TypeDescriptor,
    pub message: String,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of one audit run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub group_version: GroupVersion,
    /// Types audited after universe filtering.
    pub universe_size: usize,
    /// Types with a registered validator (inside or outside the universe).
    pub covered_size: usize,
    /// Uncovered types suppressed by `known_exempt`.
    pub exempted: Vec<TypeDescriptor>,
    /// Uncovered types suppressed by `known_gap` only.
    pub known_gaps: Vec<TypeDescriptor>,
    /// One entry per uncovered, unexcused type, in descriptor order.
    pub violations: Vec<CoverageViolation>,
    pub advisories: Vec<Advisory>,
    /// No violations and no advisory escalated by the configuration.
    pub passed: bool,
}

impl AuditReport {
    /// Diagnostic lines, one per violation.
    pub fn violation_lines(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

/// Runs the coverage check under one configuration.
#[derive(Debug, Clone, Default)]
pub struct Auditor {
    config: AuditConfig,
}

impl Auditor {
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    /// Pull a fresh universe and covered set, then audit them.
    pub fn run<S, C>(&self, source: &S, registry: &C, lists: &ExceptionLists) -> AuditReport
    where
        S: TypeUniverseSource + ?Sized,
        C: CoverageSource + ?Sized,
    {
        let universe = all_types(
            source,
            &self.config.group_version,
            &self.config.universe_filter(),
        );
        let covered = registry.covered_types();
        if covered.is_empty() {
            tracing::warn!("validator registry is empty; every audited type will be reported");
        }
        self.audit_sets(&universe, &covered, lists)
    }

    /// Audit already-materialized sets.
    pub fn audit_sets(
        &self,
        universe: &BTreeSet<TypeDescriptor>,
        covered: &BTreeSet<TypeDescriptor>,
        lists: &ExceptionLists,
    ) -> AuditReport {
        let exempt = lists.exempt_set();
        let known_gap = lists.known_gap_set();

        let uncovered: Vec<&TypeDescriptor> = universe.difference(covered).collect();
        let exempted: Vec<TypeDescriptor> = uncovered
            .iter()
            .filter(|t| exempt.contains(**t))
            .map(|t| (*t).clone())
            .collect();
        let known_gaps: Vec<TypeDescriptor> = uncovered
            .iter()
            .filter(|t| !exempt.contains(**t) && known_gap.contains(**t))
            .map(|t| (*t).clone())
            .collect();

        let violations: Vec<CoverageViolation> = audit(universe, covered, &exempt, &known_gap)
            .into_iter()
            .map(|descriptor| CoverageViolation {
                descriptor,
                remediation_hint: self.config.remediation_hint.clone(),
            })
            .collect();

        let advisories = self.advisories(universe, covered, lists);
        for advisory in &advisories {
            tracing::warn!(
                kind = ?advisory.kind,
                descriptor = %advisory.descriptor,
                "{}",
                advisory.message
            );
        }

        let passed = violations.is_empty()
            && !advisories.iter().any(|a| a.kind.is_fatal(&self.config));

        tracing::info!(
            group_version = %self.config.group_version,
            universe = universe.len(),
            covered = covered.len(),
            exempted = exempted.len(),
            known_gaps = known_gaps.len(),
            violations = violations.len(),
            advisories = advisories.len(),
            passed,
            "coverage audit complete"
        );

        AuditReport {
            group_version: self.config.group_version.clone(),
            universe_size: universe.len(),
            covered_size: covered.len(),
            exempted,
            known_gaps,
            violations,
            advisories,
            passed,
        }
    }

    fn advisories(
        &self,
        universe: &BTreeSet<TypeDescriptor>,
        covered: &BTreeSet<TypeDescriptor>,
        lists: &ExceptionLists,
    ) -> Vec<Advisory> {
        let gv = &self.config.group_version;
        let exempt = in_scope(KNOWN_EXEMPT, lists.exempt_set(), gv);
        let known_gap = in_scope(KNOWN_GAP, lists.known_gap_set(), gv);
        let mut out = Vec::new();

        for t in lists.overlap() {
            let message = format!("{t} is listed in both {KNOWN_EXEMPT} and {KNOWN_GAP}");
            out.push(Advisory {
                kind: AdvisoryKind::Overlap,
                descriptor: t,
                message,
            });
        }
        for t in exempt.difference(universe) {
            out.push(Advisory {
                kind: AdvisoryKind::StaleExemption,
                descriptor: t.clone(),
                message: format!(
                    "{KNOWN_EXEMPT} entry {t} does not match any audited type in {gv}"
                ),
            });
        }
        for t in known_gap.difference(universe) {
            out.push(Advisory {
                kind: AdvisoryKind::StaleKnownGap,
                descriptor: t.clone(),
                message: format!("{KNOWN_GAP} entry {t} does not match any audited type in {gv}"),
            });
        }
        for t in known_gap.intersection(universe).filter(|t| covered.contains(*t)) {
            out.push(Advisory {
                kind: AdvisoryKind::ResolvedKnownGap,
                descriptor: t.clone(),
                message: format!(
                    "{KNOWN_GAP} entry {t} now has a validator; remove it from the list"
                ),
            });
        }

        out.sort_by(|a, b| (&a.descriptor, a.kind).cmp(&(&b.descriptor, b.kind)));
        out
    }
}

/// Entries that belong to `gv`. Lists are shared across group/versions, so
/// entries for other group/versions are neither stale nor resolved here.
fn in_scope(
    list: &'static str,
    entries: BTreeSet<TypeDescriptor>,
    gv: &GroupVersion,
) -> BTreeSet<TypeDescriptor> {
    entries
        .into_iter()
        .filter(|t| {
            let keep = t.in_group_version(gv);
            if !keep {
                tracing::debug!(
                    list,
                    descriptor = %t,
                    group_version = %gv,
                    "exception entry outside audited group/version"
                );
            }
            keep
        })
        .collect()
}
