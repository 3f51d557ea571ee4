//! Core data types for stepman.
//!
//! This crate defines the types that describe a step library: the generated
//! manifest (`spec.json`), the per-version step definitions, the source
//! descriptors a library repository is built from, the routing table that
//! maps library URIs to cache folders, and global configuration.
//!
//! This crate is intentionally free of async code and network I/O.

/// Manifest file name inside a library's spec folder.
pub const SPEC_FILE_NAME: &str = "spec.json";

/// Library descriptor at the root of a library repository.
pub const STEPLIB_FILE_NAME: &str = "steplib.toml";

/// Per-version step definition: `steps/<id>/<version>/step.toml`.
pub const STEP_FILE_NAME: &str = "step.toml";

/// Optional per-step group info: `steps/<id>/step-info.toml`.
pub const STEP_INFO_FILE_NAME: &str = "step-info.toml";

/// Manifest format written by this version of stepman.
pub const FORMAT_VERSION: &str = "1.0.0";

pub mod config;
pub mod routing;
pub mod spec;
pub mod steplib;
