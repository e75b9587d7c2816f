//! # valcov-core — Foundational Types for the Coverage Auditor
//!
//! Defines the identity types every other crate in the workspace builds on.
//! Depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Explicit type identity.** A data type is named by a [`TypeDescriptor`]
//!    value `(group, version, kind)`, never by runtime type introspection.
//!    Descriptors are totally ordered so every set built from them iterates
//!    deterministically.
//!
//! 2. **One canonical rendering.** `group/version.Kind` (or `version.Kind` for
//!    the core group) is both the diagnostic form and the serialized form.
//!    Parsing is its exact inverse.
//!
//! 3. **Structured errors.** All fallible operations in the workspace return
//!    [`ValcovError`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `valcov-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod descriptor;
pub mod error;

pub use descriptor::{GroupVersion, KnownType, TypeDescriptor, COLLECTION_SUFFIX};
pub use error::ValcovError;
