//! # Known-Gap Ratchet
//!
//! The known-gap list is debt: entries may be removed as validators land,
//! never added. [`ratchet`] diffs the current exception file against a
//! baseline (typically the copy on the main branch) and fails if the
//! known-gap list gained entries. New permanent exemptions are allowed but
//! surfaced so a reviewer reads their reasons.

use std::collections::BTreeSet;

use serde::Serialize;
use valcov_core::TypeDescriptor;

use crate::exceptions::{ExceptionEntry, ExceptionLists};

/// Differences between two versions of the exception lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RatchetReport {
    /// Known gaps present now but not in the baseline. Any entry fails.
    pub added_gaps: Vec<ExceptionEntry>,
    /// Known gaps removed since the baseline.
    pub resolved_gaps: Vec<TypeDescriptor>,
    /// Exemptions present now but not in the baseline.
    pub added_exemptions: Vec<ExceptionEntry>,
}

impl RatchetReport {
    pub fn passed(&self) -> bool {
        self.added_gaps.is_empty()
    }
}

/// Compare `current` against `baseline`.
pub fn ratchet(baseline: &ExceptionLists, current: &ExceptionLists) -> RatchetReport {
    let baseline_gaps = baseline.known_gap_set();
    let baseline_exempt = baseline.exempt_set();
    let current_gaps = current.known_gap_set();

    let added_gaps = added(&current.known_gap, &baseline_gaps);
    let added_exemptions = added(&current.known_exempt, &baseline_exempt);
    let resolved_gaps: Vec<TypeDescriptor> =
        baseline_gaps.difference(&current_gaps).cloned().collect();

    for entry in &added_gaps {
        tracing::warn!(descriptor = %entry.descriptor, "known_gap grew");
    }

    RatchetReport {
        added_gaps,
        resolved_gaps,
        added_exemptions,
    }
}

fn added(entries: &[ExceptionEntry], baseline: &BTreeSet<TypeDescriptor>) -> Vec<ExceptionEntry> {
    let mut out: Vec<ExceptionEntry> = entries
        .iter()
        .filter(|e| !baseline.contains(&e.descriptor))
        .cloned()
        .collect();
    out.sort_by(|a, b| a.descriptor.cmp(&b.descriptor));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(kinds: &[&str]) -> Vec<ExceptionEntry> {
        kinds
            .iter()
            .map(|k| ExceptionEntry::new(format!("v1.{k}").parse().unwrap(), "reason"))
            .collect()
    }

    fn lists(exempt: &[&str], gap: &[&str]) -> ExceptionLists {
        ExceptionLists {
            known_exempt: entries(exempt),
            known_gap: entries(gap),
        }
    }

    #[test]
    fn unchanged_lists_pass() {
        let l = lists(&["A"], &["B", "C"]);
        let report = ratchet(&l, &l);
        assert!(report.passed());
        assert_eq!(report, RatchetReport::default());
    }

    #[test]
    fn shrinking_gap_list_passes() {
        let report = ratchet(&lists(&[], &["B", "C"]), &lists(&[], &["C"]));
        assert!(report.passed());
        assert_eq!(report.resolved_gaps, vec!["v1.B".parse::<TypeDescriptor>().unwrap()]);
    }

    #[test]
    fn growing_gap_list_fails() {
        let report = ratchet(&lists(&[], &["B"]), &lists(&[], &["Z", "B", "D"]));
        assert!(!report.passed());
        let kinds: Vec<_> = report.added_gaps.iter().map(|e| e.descriptor.kind()).collect();
        assert_eq!(kinds, ["D", "Z"]);
    }

    #[test]
    fn moving_gap_to_exempt_is_reported_not_failed() {
        let report = ratchet(&lists(&[], &["B"]), &lists(&["B"], &[]));
        assert!(report.passed());
        assert_eq!(report.added_exemptions.len(), 1);
        assert_eq!(report.resolved_gaps.len(), 1);
    }

    #[test]
    fn moving_exempt_to_gap_fails() {
        let report = ratchet(&lists(&["B"], &[]), &lists(&[], &["B"]));
        assert!(!report.passed());
    }
}
