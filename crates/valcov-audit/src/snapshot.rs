//! # Registry Snapshots
//!
//! File form of the two live registries, for running the audit outside the
//! host process (CI gates, offline review). A host exports its type registry
//! and validator registrations; the CLI rebuilds a [`Scheme`] and a
//! [`ValidatorRegistry`] from it.
//!
//! ```yaml
//! group_version: build.openshift.io/v1   # default for entries below
//! types:
//!   - { kind: Build, origin: github.com/openshift/openshift-apiserver/pkg/build/apis/build }
//!   - { kind: BuildList, origin: github.com/openshift/openshift-apiserver/pkg/build/apis/build }
//!   - { group: "", version: v1, kind: Status, origin: github.com/openshift/origin/vendor/k8s.io/apimachinery }
//! validators:
//!   - { type: build.openshift.io/v1.Build, site: pkg/build/apis/build/validation/register.go }
//! ```
//!
//! `.json` files are parsed as JSON, everything else as YAML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use valcov_core::{GroupVersion, KnownType, TypeDescriptor, ValcovError};

use crate::registry::{RegistrationSite, ValidatorRegistry};
use crate::universe::Scheme;

/// One registered type. `group` and `version` fall back to the snapshot's
/// `group_version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub kind: String,
    pub origin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<bool>,
}

/// One validator registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidatorEntry {
    #[serde(rename = "type")]
    pub descriptor: TypeDescriptor,
    pub site: RegistrationSite,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrySnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_version: Option<GroupVersion>,
    #[serde(default)]
    pub types: Vec<TypeEntry>,
    #[serde(default)]
    pub validators: Vec<ValidatorEntry>,
}

impl RegistrySnapshot {
    pub fn from_yaml_str(content: &str) -> Result<Self, ValcovError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ValcovError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a snapshot file, choosing the parser from the extension.
    pub fn load(path: &Path) -> Result<Self, ValcovError> {
        let load_err = |reason: String| ValcovError::Load {
            path: path.display().to_string(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        };
        let snapshot = parsed.map_err(|e| load_err(e.to_string()))?;

        tracing::info!(
            path = %path.display(),
            types = snapshot.types.len(),
            validators = snapshot.validators.len(),
            "loaded registry snapshot"
        );
        Ok(snapshot)
    }

    /// Rebuild the type registry.
    ///
    /// # Errors
    ///
    /// Returns [`ValcovError::InvalidDescriptor`] when an entry has no
    /// version and the snapshot has no default, and
    /// [`ValcovError::DuplicateKnownType`] for repeated entries.
    pub fn scheme(&self) -> Result<Scheme, ValcovError> {
        let mut scheme = Scheme::new();
        for entry in &self.types {
            let descriptor = self.resolve(entry)?;
            let mut known = KnownType::new(descriptor, entry.origin.clone());
            known.collection = entry.collection;
            scheme.add_known_type(known)?;
        }
        Ok(scheme)
    }

    /// Rebuild the validator registry.
    ///
    /// # Errors
    ///
    /// Returns [`ValcovError::DuplicateRegistration`] if a type is listed
    /// twice.
    pub fn registry(&self) -> Result<ValidatorRegistry<RegistrationSite>, ValcovError> {
        let mut registry = ValidatorRegistry::new();
        for entry in &self.validators {
            registry.register(entry.descriptor.clone(), entry.site.clone())?;
        }
        Ok(registry)
    }

    fn resolve(&self, entry: &TypeEntry) -> Result<TypeDescriptor, ValcovError> {
        let default = self.group_version.as_ref();
        let group = match (&entry.group, default) {
            (Some(group), _) => group.clone(),
            (None, Some(gv)) => gv.group().to_string(),
            (None, None) => String::new(),
        };
        let version = match (&entry.version, default) {
            (Some(version), _) => version.clone(),
            (None, Some(gv)) => gv.version().to_string(),
            (None, None) => {
                return Err(ValcovError::InvalidDescriptor {
                    input: entry.kind.clone(),
                    reason: "no version on the entry and no snapshot group_version".to_string(),
                })
            }
        };
        TypeDescriptor::new(group, version, entry.kind.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CoverageSource;
    use crate::universe::{all_types, UniverseFilter};
    use std::collections::BTreeSet;

    const SNAPSHOT: &str = r#"
group_version: build.openshift.io/v1
types:
  - { kind: Build, origin: pkg/build/apis/build }
  - { kind: BuildList, origin: pkg/build/apis/build }
  - { kind: BuildLog, origin: pkg/build/apis/build }
  - { group: "", version: v1, kind: Status, origin: github.com/openshift/origin/vendor/k8s.io/apimachinery }
validators:
  - { type: build.openshift.io/v1.Build, site: pkg/build/apis/build/validation/register.go }
"#;

    fn td(s: &str) -> TypeDescriptor {
        s.parse().unwrap()
    }

    #[test]
    fn entries_inherit_default_group_version() {
        let snapshot = RegistrySnapshot::from_yaml_str(SNAPSHOT).unwrap();
        let scheme = snapshot.scheme().unwrap();
        assert_eq!(scheme.len(), 4);

        let gv: GroupVersion = "build.openshift.io/v1".parse().unwrap();
        let universe = all_types(&scheme, &gv, &UniverseFilter::default());
        assert_eq!(
            universe,
            BTreeSet::from([
                td("build.openshift.io/v1.Build"),
                td("build.openshift.io/v1.BuildLog"),
            ])
        );
    }

    #[test]
    fn explicit_group_overrides_default() {
        let snapshot = RegistrySnapshot::from_yaml_str(SNAPSHOT).unwrap();
        let scheme = snapshot.scheme().unwrap();
        let filter = UniverseFilter { vendored_prefixes: vec![] };
        let core = all_types(&scheme, &GroupVersion::core_v1(), &filter);
        assert_eq!(core, BTreeSet::from([td("v1.Status")]));
    }

    #[test]
    fn registry_from_validators() {
        let snapshot = RegistrySnapshot::from_yaml_str(SNAPSHOT).unwrap();
        let registry = snapshot.registry().unwrap();
        assert_eq!(registry.covered_types(), BTreeSet::from([td("build.openshift.io/v1.Build")]));
        assert_eq!(
            registry.get(&td("build.openshift.io/v1.Build")).unwrap().0,
            "pkg/build/apis/build/validation/register.go"
        );
    }

    #[test]
    fn missing_version_without_default_is_error() {
        let snapshot =
            RegistrySnapshot::from_yaml_str("types:\n  - { kind: Build, origin: x }\n").unwrap();
        assert!(matches!(
            snapshot.scheme().unwrap_err(),
            ValcovError::InvalidDescriptor { .. }
        ));
    }

    #[test]
    fn duplicate_validator_is_error() {
        let yaml = "validators:\n  - { type: v1.A, site: a.go }\n  - { type: v1.A, site: b.go }\n";
        let snapshot = RegistrySnapshot::from_yaml_str(yaml).unwrap();
        assert!(matches!(
            snapshot.registry().unwrap_err(),
            ValcovError::DuplicateRegistration(_)
        ));
    }

    #[test]
    fn loads_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(
            &path,
            r#"{"group_version":"v1","types":[{"kind":"Build","origin":"pkg/build"}],"validators":[]}"#,
        )
        .unwrap();
        let snapshot = RegistrySnapshot::load(&path).unwrap();
        assert_eq!(snapshot.types.len(), 1);
        assert!(snapshot.registry().unwrap().is_empty());
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.yaml");
        std::fs::write(&path, "types: {not: a list}\n").unwrap();
        let err = RegistrySnapshot::load(&path).unwrap_err();
        assert!(err.to_string().contains("snapshot.yaml"));
    }
}
