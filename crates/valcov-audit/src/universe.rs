//! # Type Universe
//!
//! Adapter over a type registry. Produces the set of descriptors that must
//! carry a validator: everything the registry knows for one group/version,
//! minus collection wrappers (they inherit coverage from their element type)
//! and minus types defined in vendored third-party code (owned and validated
//! elsewhere).

use std::collections::{BTreeMap, BTreeSet};

use valcov_core::{GroupVersion, KnownType, TypeDescriptor, ValcovError};

/// Origin prefix of vendored code in the legacy API server tree.
pub const DEFAULT_VENDORED_PREFIX: &str = "github.com/openshift/origin/vendor/";

/// Read-only view of a type registry.
pub trait TypeUniverseSource {
    /// Every type the registry knows for `gv`. Implementations may return
    /// entries in any order.
    fn known_types(&self, gv: &GroupVersion) -> Vec<KnownType>;
}

/// In-memory type registry.
#[derive(Debug, Clone, Default)]
pub struct Scheme {
    types: BTreeMap<TypeDescriptor, KnownType>,
}

impl Scheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type to the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ValcovError::DuplicateKnownType`] if the descriptor is
    /// already present.
    pub fn add_known_type(&mut self, known: KnownType) -> Result<(), ValcovError> {
        if self.types.contains_key(&known.descriptor) {
            return Err(ValcovError::DuplicateKnownType(known.descriptor));
        }
        self.types.insert(known.descriptor.clone(), known);
        Ok(())
    }

    /// Number of registered types across all group/versions.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeUniverseSource for Scheme {
    fn known_types(&self, gv: &GroupVersion) -> Vec<KnownType> {
        self.types
            .values()
            .filter(|t| t.descriptor.in_group_version(gv))
            .cloned()
            .collect()
    }
}

/// Exclusion rules applied to the raw registry contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniverseFilter {
    /// Types whose origin starts with any of these prefixes are skipped.
    pub vendored_prefixes: Vec<String>,
}

impl Default for UniverseFilter {
    fn default() -> Self {
        Self {
            vendored_prefixes: vec![DEFAULT_VENDORED_PREFIX.to_string()],
        }
    }
}

impl UniverseFilter {
    fn is_vendored(&self, origin: &str) -> bool {
        self.vendored_prefixes
            .iter()
            .any(|prefix| origin.starts_with(prefix.as_str()))
    }
}

/// The audited type universe for `gv`.
///
/// Skips collection wrappers, vendored types, and anything the source
/// returns outside `gv`.
pub fn all_types<S>(
    source: &S,
    gv: &GroupVersion,
    filter: &UniverseFilter,
) -> BTreeSet<TypeDescriptor>
where
    S: TypeUniverseSource + ?Sized,
{
    let mut universe = BTreeSet::new();
    for known in source.known_types(gv) {
        if !known.descriptor.in_group_version(gv) {
            tracing::debug!(
                descriptor = %known.descriptor,
                group_version = %gv,
                "skipping type outside group/version"
            );
            continue;
        }
        if filter.is_vendored(&known.origin) {
            tracing::debug!(
                descriptor = %known.descriptor,
                origin = %known.origin,
                "skipping vendored type"
            );
            continue;
        }
        if known.is_collection() {
            tracing::debug!(descriptor = %known.descriptor, "skipping collection wrapper");
            continue;
        }
        universe.insert(known.descriptor);
    }
    universe
}
