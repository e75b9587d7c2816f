//! # Type Descriptors
//!
//! Canonical identities for the data types known to a type registry.
//!
//! A [`TypeDescriptor`] is `(group, version, kind)`. Its canonical string is
//! `group/version.Kind`, or `version.Kind` when the group is the empty core
//! group. Groups may contain dots (`apps.openshift.io`); versions and kinds
//! may not, which makes the rendering unambiguous to parse.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValcovError;

/// Kind suffix that marks a collection wrapper when no explicit flag is set.
pub const COLLECTION_SUFFIX: &str = "List";

/// An API group and version. The empty group is the core group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupVersion {
    group: String,
    version: String,
}

impl GroupVersion {
    /// Build a group/version, rejecting an empty version or a group or
    /// version containing a separator character.
    pub fn new(group: impl Into<String>, version: impl Into<String>) -> Result<Self, ValcovError> {
        let group = group.into();
        let version = version.into();
        let input = || format!("{group}/{version}");
        if version.is_empty() {
            return Err(invalid(input(), "version is empty"));
        }
        if version.contains(['.', '/']) || version.contains(char::is_whitespace) {
            return Err(invalid(input(), "version must not contain '.', '/' or whitespace"));
        }
        if group.contains('/') || group.contains(char::is_whitespace) {
            return Err(invalid(input(), "group must not contain '/' or whitespace"));
        }
        Ok(Self { group, version })
    }

    /// The core group at `v1`.
    pub fn core_v1() -> Self {
        Self {
            group: String::new(),
            version: "v1".to_string(),
        }
    }

    /// The API group; empty for the core group.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// The API version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Descriptor for `kind` within this group/version.
    pub fn with_kind(&self, kind: impl Into<String>) -> Result<TypeDescriptor, ValcovError> {
        TypeDescriptor::new(self.group.clone(), self.version.clone(), kind)
    }
}

impl fmt::Display for GroupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.version)
        } else {
            write!(f, "{}/{}", self.group, self.version)
        }
    }
}

impl FromStr for GroupVersion {
    type Err = ValcovError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((group, version)) => Self::new(group, version),
            None => Self::new("", s),
        }
    }
}

impl TryFrom<String> for GroupVersion {
    type Error = ValcovError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GroupVersion> for String {
    fn from(gv: GroupVersion) -> Self {
        gv.to_string()
    }
}

/// Canonical identity of one data type.
///
/// Ordering is lexicographic over `(group, version, kind)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeDescriptor {
    group: String,
    version: String,
    kind: String,
}

impl TypeDescriptor {
    /// Build a descriptor from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`ValcovError::InvalidDescriptor`] for an empty version or kind,
    /// or for separator characters where they would make the canonical
    /// rendering ambiguous.
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Result<Self, ValcovError> {
        let gv = GroupVersion::new(group, version)?;
        let kind = kind.into();
        if kind.is_empty() {
            return Err(invalid(format!("{gv}."), "kind is empty"));
        }
        if kind.contains(['.', '/']) || kind.contains(char::is_whitespace) {
            return Err(invalid(
                format!("{gv}.{kind}"),
                "kind must not contain '.', '/' or whitespace",
            ));
        }
        Ok(Self {
            group: gv.group,
            version: gv.version,
            kind,
        })
    }

    /// The API group; empty for the core group.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// The API version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The kind name.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The group/version this descriptor belongs to.
    pub fn group_version(&self) -> GroupVersion {
        GroupVersion {
            group: self.group.clone(),
            version: self.version.clone(),
        }
    }

    /// Whether this descriptor belongs to `gv`.
    pub fn in_group_version(&self, gv: &GroupVersion) -> bool {
        self.group == gv.group && self.version == gv.version
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}.{}", self.version, self.kind)
        } else {
            write!(f, "{}/{}.{}", self.group, self.version, self.kind)
        }
    }
}

impl FromStr for TypeDescriptor {
    type Err = ValcovError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (group, rest) = s.split_once('/').unwrap_or(("", s));
        let (version, kind) = rest
            .split_once('.')
            .ok_or_else(|| invalid(s.to_string(), "expected 'version.Kind' after the group"))?;
        Self::new(group, version, kind).map_err(|e| match e {
            ValcovError::InvalidDescriptor { reason, .. } => invalid(s.to_string(), &reason),
            other => other,
        })
    }
}

impl TryFrom<String> for TypeDescriptor {
    type Error = ValcovError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeDescriptor> for String {
    fn from(td: TypeDescriptor) -> Self {
        td.to_string()
    }
}

/// A type as reported by a type registry, with the metadata the universe
/// filter needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownType {
    /// Canonical identity.
    pub descriptor: TypeDescriptor,
    /// Package or namespace path the type is defined in.
    pub origin: String,
    /// Explicit collection-wrapper flag. `None` falls back to the
    /// [`COLLECTION_SUFFIX`] naming convention.
    pub collection: Option<bool>,
}

impl KnownType {
    pub fn new(descriptor: TypeDescriptor, origin: impl Into<String>) -> Self {
        Self {
            descriptor,
            origin: origin.into(),
            collection: None,
        }
    }

    /// Set the explicit collection flag.
    pub fn with_collection(mut self, collection: bool) -> Self {
        self.collection = Some(collection);
        self
    }

    /// Whether this type only aggregates other types ("list of X").
    pub fn is_collection(&self) -> bool {
        self.collection
            .unwrap_or_else(|| self.descriptor.kind().ends_with(COLLECTION_SUFFIX))
    }
}

fn invalid(input: String, reason: &str) -> ValcovError {
    ValcovError::InvalidDescriptor {
        input,
        reason: reason.to_string(),
    }
}
