//! Step version resolution: parse a user's version constraint and pick the
//! single best matching version among a step's published versions.
//!
//! Everything here is pure and synchronous; no I/O happens in this crate.

pub mod resolver;
pub mod version;
