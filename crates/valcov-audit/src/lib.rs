//! # valcov-audit — Validation-Coverage Audit
//!
//! Guarantees that every data type known to a type registry has a
//! validation routine registered, modulo two reviewed exception lists.
//!
//! ## Pipeline
//!
//! 1. [`universe::all_types`] pulls the type universe for one group/version
//!    from a [`TypeUniverseSource`], dropping collection wrappers and
//!    vendored types.
//! 2. [`CoverageSource::covered_types`] projects the [`ValidatorRegistry`]
//!    onto its key set.
//! 3. [`audit`] computes `universe − covered − exempt − known_gap`.
//! 4. [`Auditor`] wraps the pure computation with configuration, advisories
//!    about the exception lists, and reporting.
//!
//! [`ratchet`] is the companion check that the known-gap list never grows.
//!
//! ## Determinism
//!
//! Every set in this crate is a `BTreeSet<TypeDescriptor>`. Repeated runs
//! over unchanged inputs produce identical reports regardless of the order
//! registries hand their entries out.

pub mod auditor;
pub mod config;
pub mod exceptions;
pub mod ratchet;
pub mod registry;
pub mod snapshot;
pub mod universe;

pub use auditor::{audit, Advisory, AdvisoryKind, AuditReport, Auditor, CoverageViolation};
pub use config::AuditConfig;
pub use exceptions::{ExceptionEntry, ExceptionLists};
pub use ratchet::{ratchet, RatchetReport};
pub use registry::{CoverageSource, RegistrationSite, ValidatorRegistry};
pub use snapshot::RegistrySnapshot;
pub use universe::{all_types, Scheme, TypeUniverseSource, UniverseFilter};
