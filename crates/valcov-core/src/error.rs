//! # Error Types
//!
//! Operational errors raised while loading or assembling audit inputs.
//! Coverage violations are *not* errors: they are the audit's output and
//! live in `valcov-audit`.

use thiserror::Error;

use crate::descriptor::TypeDescriptor;

/// Top-level error type for the coverage auditor.
#[derive(Error, Debug)]
pub enum ValcovError {
    /// A descriptor string could not be parsed.
    #[error("invalid type descriptor '{input}': {reason}")]
    InvalidDescriptor {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A validator was registered twice for the same type.
    #[error("duplicate validator registration for {0}")]
    DuplicateRegistration(TypeDescriptor),

    /// A type was added to a type registry twice.
    #[error("duplicate known type {0}")]
    DuplicateKnownType(TypeDescriptor),

    /// The same type appears twice within one exception list.
    #[error("{list}: duplicate entry for {descriptor}")]
    DuplicateException {
        /// Name of the list (`known_exempt` or `known_gap`).
        list: &'static str,
        /// The repeated descriptor.
        descriptor: TypeDescriptor,
    },

    /// An exception entry carries no justification.
    #[error("{list}: entry for {descriptor} has a blank reason")]
    MissingReason {
        /// Name of the list (`known_exempt` or `known_gap`).
        list: &'static str,
        /// The entry's descriptor.
        descriptor: TypeDescriptor,
    },

    /// A file could not be loaded.
    #[error("failed to load '{path}': {reason}")]
    Load {
        /// Path of the file.
        path: String,
        /// Reason the file could not be loaded.
        reason: String,
    },

    /// YAML parse error.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parse error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
