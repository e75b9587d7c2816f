//! # Validator Registry
//!
//! An explicit, constructed mapping from type descriptor to validation
//! routine. Start-up code builds one and hands it to the auditor; there is
//! no process-wide registry and no init-order dependency.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use valcov_core::{TypeDescriptor, ValcovError};

/// Anything that can report which types have a validator.
pub trait CoverageSource {
    /// Descriptors with a registered validator. An unpopulated source
    /// returns the empty set.
    fn covered_types(&self) -> BTreeSet<TypeDescriptor>;
}

/// Mapping from descriptor to validator handle `V`.
///
/// The auditor reads only the key set, so `V` is whatever the host
/// application uses: a function pointer, a boxed closure, a compiled schema,
/// or a [`RegistrationSite`] when the registry was loaded from a snapshot.
#[derive(Debug, Clone)]
pub struct ValidatorRegistry<V> {
    validators: BTreeMap<TypeDescriptor, V>,
}

impl<V> Default for ValidatorRegistry<V> {
    fn default() -> Self {
        Self {
            validators: BTreeMap::new(),
        }
    }
}

impl<V> ValidatorRegistry<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `validator` for `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns [`ValcovError::DuplicateRegistration`] if a validator is
    /// already registered for the descriptor; the existing one is kept.
    pub fn register(
        &mut self,
        descriptor: TypeDescriptor,
        validator: V,
    ) -> Result<(), ValcovError> {
        if self.validators.contains_key(&descriptor) {
            return Err(ValcovError::DuplicateRegistration(descriptor));
        }
        self.validators.insert(descriptor, validator);
        Ok(())
    }

    /// The validator registered for `descriptor`, if any.
    pub fn get(&self, descriptor: &TypeDescriptor) -> Option<&V> {
        self.validators.get(descriptor)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Iterate registrations in descriptor order.
    pub fn iter(&self) -> impl Iterator<Item = (&TypeDescriptor, &V)> {
        self.validators.iter()
    }
}

impl<V> CoverageSource for ValidatorRegistry<V> {
    fn covered_types(&self) -> BTreeSet<TypeDescriptor> {
        self.validators.keys().cloned().collect()
    }
}

/// Source location where a validator is wired up, e.g.
/// `pkg/build/apis/build/validation/register.go`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationSite(pub String);

impl fmt::Display for RegistrationSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
