//! Step library plumbing: where libraries and steps live on disk, how a
//! library is checked out and refreshed, how its manifest is regenerated,
//! and how individual step versions are downloaded.

pub mod cache;
pub mod download;
pub mod generate;
pub mod git;
pub mod source;
