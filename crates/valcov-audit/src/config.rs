//! # Audit Configuration
//!
//! Settings that shape one audit run. Loaded from YAML; every field has a
//! default so an absent file or an empty document is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};
use valcov_core::{GroupVersion, ValcovError};

use crate::universe::{UniverseFilter, DEFAULT_VENDORED_PREFIX};

/// Default pointer printed in every violation diagnostic.
pub const DEFAULT_REMEDIATION_HINT: &str = "pkg/api/validation/register.go";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Group/version whose types are audited.
    pub group_version: GroupVersion,
    /// Origin prefixes of vendored code excluded from the universe.
    pub vendored_prefixes: Vec<String>,
    /// Where a developer should go to register a missing validator.
    pub remediation_hint: String,
    /// Treat stale or resolved exception entries as failures.
    pub fail_on_stale: bool,
    /// Treat a type listed in both exception lists as a failure.
    pub fail_on_overlap: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            group_version: GroupVersion::core_v1(),
            vendored_prefixes: vec![DEFAULT_VENDORED_PREFIX.to_string()],
            remediation_hint: DEFAULT_REMEDIATION_HINT.to_string(),
            fail_on_stale: false,
            fail_on_overlap: false,
        }
    }
}

impl AuditConfig {
    /// Parse a YAML document. An empty document yields the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, ValcovError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, ValcovError> {
        let content = std::fs::read_to_string(path).map_err(|e| ValcovError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_yaml_str(&content).map_err(|e| ValcovError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Universe exclusion rules derived from this configuration.
    pub fn universe_filter(&self) -> UniverseFilter {
        UniverseFilter {
            vendored_prefixes: self.vendored_prefixes.clone(),
        }
    }
}
