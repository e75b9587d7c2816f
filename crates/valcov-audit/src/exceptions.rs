//! # Exception Lists
//!
//! Two reviewed lists of types allowed to lack a validator, loaded from a
//! version-controlled YAML file:
//!
//! - `known_exempt`: types that structurally never need a validator
//!   (response-only projections, sub-resource masks). Permanent.
//! - `known_gap`: types that should have a validator but do not yet.
//!   Tracked debt; must only shrink (see [`crate::ratchet`]).
//!
//! ```yaml
//! known_exempt:
//!   - type: build.openshift.io/v1.BuildLog
//!     reason: masks calls to a build subresource
//! known_gap:
//!   - type: image.openshift.io/v1.DockerImage
//!     reason: internal type, needs review
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use valcov_core::{TypeDescriptor, ValcovError};

pub(crate) const KNOWN_EXEMPT: &str = "known_exempt";
pub(crate) const KNOWN_GAP: &str = "known_gap";

/// A type paired with the human-authored reason it may lack a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExceptionEntry {
    #[serde(rename = "type")]
    pub descriptor: TypeDescriptor,
    pub reason: String,
}

impl ExceptionEntry {
    pub fn new(descriptor: TypeDescriptor, reason: impl Into<String>) -> Self {
        Self {
            descriptor,
            reason: reason.into(),
        }
    }
}

/// The permanent exemptions and the tracked known gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExceptionLists {
    #[serde(default)]
    pub known_exempt: Vec<ExceptionEntry>,
    #[serde(default)]
    pub known_gap: Vec<ExceptionEntry>,
}

impl ExceptionLists {
    /// Parse and check a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`ValcovError::Yaml`] for malformed YAML or descriptors, and
    /// the errors of [`ExceptionLists::check`].
    pub fn from_yaml_str(content: &str) -> Result<Self, ValcovError> {
        let lists: Self = serde_yaml::from_str(content)?;
        lists.check()?;
        Ok(lists)
    }

    /// Load and check an exception file.
    pub fn load(path: &Path) -> Result<Self, ValcovError> {
        let content = std::fs::read_to_string(path).map_err(|e| ValcovError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let lists = Self::from_yaml_str(&content).map_err(|e| ValcovError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        tracing::info!(
            path = %path.display(),
            known_exempt = lists.known_exempt.len(),
            known_gap = lists.known_gap.len(),
            "loaded exception lists"
        );
        Ok(lists)
    }

    /// Reject blank reasons and repeated descriptors within one list.
    ///
    /// A descriptor present in *both* lists is not an error here; the
    /// auditor reports it as an overlap advisory.
    pub fn check(&self) -> Result<(), ValcovError> {
        check_list(KNOWN_EXEMPT, &self.known_exempt)?;
        check_list(KNOWN_GAP, &self.known_gap)
    }

    pub fn exempt_set(&self) -> BTreeSet<TypeDescriptor> {
        self.known_exempt.iter().map(|e| e.descriptor.clone()).collect()
    }

    pub fn known_gap_set(&self) -> BTreeSet<TypeDescriptor> {
        self.known_gap.iter().map(|e| e.descriptor.clone()).collect()
    }

    /// Descriptors listed in both `known_exempt` and `known_gap`.
    pub fn overlap(&self) -> BTreeSet<TypeDescriptor> {
        self.exempt_set()
            .intersection(&self.known_gap_set())
            .cloned()
            .collect()
    }
}

fn check_list(list: &'static str, entries: &[ExceptionEntry]) -> Result<(), ValcovError> {
    let mut seen = BTreeSet::new();
    for entry in entries {
        if entry.reason.trim().is_empty() {
            return Err(ValcovError::MissingReason {
                list,
                descriptor: entry.descriptor.clone(),
            });
        }
        if !seen.insert(&entry.descriptor) {
            return Err(ValcovError::DuplicateException {
                list,
                descriptor: entry.descriptor.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
known_exempt:
  - type: build.openshift.io/v1.BuildLog
    reason: masks calls to a build subresource
  - type: image.openshift.io/v1.ImageStreamTag
    reason: this object is only returned, never accepted
known_gap:
  - type: image.openshift.io/v1.DockerImage
    reason: internal type, needs review
"#;

    fn td(s: &str) -> TypeDescriptor {
        s.parse().unwrap()
    }

    #[test]
    fn parses_both_lists() {
        let lists = ExceptionLists::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(lists.known_exempt.len(), 2);
        assert_eq!(lists.known_gap.len(), 1);
        assert!(lists.exempt_set().contains(&td("build.openshift.io/v1.BuildLog")));
        assert_eq!(
            lists.known_gap[0].reason,
            "internal type, needs review"
        );
        assert!(lists.overlap().is_empty());
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let lists = ExceptionLists::from_yaml_str("known_exempt: []\n").unwrap();
        assert!(lists.known_gap.is_empty());
        let lists = ExceptionLists::from_yaml_str("{}").unwrap();
        assert_eq!(lists, ExceptionLists::default());
    }

    #[test]
    fn blank_reason_rejected() {
        let err = ExceptionLists::from_yaml_str(
            "known_gap:\n  - type: v1.Foo\n    reason: '   '\n",
        )
        .unwrap_err();
        assert!(matches!(err, ValcovError::MissingReason { list: KNOWN_GAP, .. }));
    }

    #[test]
    fn duplicate_within_list_rejected() {
        let yaml = "known_exempt:\n  - { type: v1.Foo, reason: a }\n  - { type: v1.Foo, reason: b }\n";
        let err = ExceptionLists::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(
            err,
            ValcovError::DuplicateException { list: KNOWN_EXEMPT, ref descriptor }
                if *descriptor == td("v1.Foo")
        ));
    }

    #[test]
    fn same_type_in_both_lists_is_overlap_not_error() {
        let yaml = "known_exempt:\n  - { type: v1.Foo, reason: a }\nknown_gap:\n  - { type: v1.Foo, reason: b }\n";
        let lists = ExceptionLists::from_yaml_str(yaml).unwrap();
        assert_eq!(lists.overlap(), BTreeSet::from([td("v1.Foo")]));
    }

    #[test]
    fn invalid_descriptor_rejected() {
        let err = ExceptionLists::from_yaml_str("known_gap:\n  - { type: nokind, reason: x }\n")
            .unwrap_err();
        assert!(matches!(err, ValcovError::Yaml(_)));
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(ExceptionLists::from_yaml_str("known_exemptions: []\n").is_err());
    }

    #[test]
    fn load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exceptions.yaml");
        std::fs::write(&path, "known_gap: [ {type: v1.Foo} ]\n").unwrap();
        let err = ExceptionLists::load(&path).unwrap_err();
        assert!(matches!(err, ValcovError::Load { .. }));
        assert!(err.to_string().contains("exceptions.yaml"));

        let missing = ExceptionLists::load(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(missing, ValcovError::Load { .. }));
    }
}
