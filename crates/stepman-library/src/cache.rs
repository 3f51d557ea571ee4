//! On-disk layout of the stepman home.
//!
//! ```text
//! <home>/
//!   config.toml
//!   routing.toml
//!   step_collections/<alias>/
//!     collection/            library checkout
//!     spec/spec.json         generated manifest
//!     cache/<id>/<version>/  downloaded steps
//! ```

use std::path::{Path, PathBuf};

use stepman_core::routing::{FileRoutingStore, RoutingStore};
use stepman_core::spec::StepLibSpec;
use stepman_util::errors::StepmanError;

/// The stepman home directory and everything below it.
#[derive(Debug, Clone)]
pub struct LibraryCache {
    root: PathBuf,
}

impl LibraryCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache rooted at the configured stepman home.
    pub fn from_env() -> Self {
        Self::new(stepman_core::config::dirs_path())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn routing_path(&self) -> PathBuf {
        self.root.join("routing.toml")
    }

    pub fn collections_dir(&self) -> PathBuf {
        self.root.join("step_collections")
    }

    /// Open the persisted routing table.
    pub fn routing(&self) -> miette::Result<FileRoutingStore> {
        FileRoutingStore::open(&self.routing_path())
    }

    /// Paths of the library registered under `alias`.
    pub fn library(&self, uri: &str, alias: &str) -> LibraryPaths {
        LibraryPaths {
            uri: uri.to_string(),
            alias: alias.to_string(),
            base: self.collections_dir().join(alias),
        }
    }

    /// Paths of an already set-up library, looked up through `routing`.
    pub fn open(&self, routing: &impl RoutingStore, uri: &str) -> miette::Result<LibraryPaths> {
        let alias = routing.alias_for(uri).ok_or_else(|| StepmanError::Library {
            message: format!("Library `{uri}` is not set up"),
        })?;
        let paths = self.library(uri, &alias);
        if !paths.spec_path().is_file() {
            return Err(StepmanError::Library {
                message: format!(
                    "Library `{uri}` is registered but its manifest is missing at {}",
                    paths.spec_path().display()
                ),
            }
            .into());
        }
        Ok(paths)
    }
}

/// Locations belonging to a single library.
#[derive(Debug, Clone)]
pub struct LibraryPaths {
    pub uri: String,
    pub alias: String,
    base: PathBuf,
}

impl LibraryPaths {
    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn collection_dir(&self) -> PathBuf {
        self.base.join("collection")
    }

    pub fn spec_path(&self) -> PathBuf {
        self.base
            .join("spec")
            .join(stepman_core::SPEC_FILE_NAME)
    }

    pub fn step_cache_dir(&self) -> PathBuf {
        self.base.join("cache")
    }

    /// Where a downloaded step version is kept.
    pub fn step_dir(&self, id: &str, version: &str) -> PathBuf {
        self.step_cache_dir().join(id).join(version)
    }

    /// Whether a step version has already been downloaded.
    pub fn has_step(&self, id: &str, version: &str) -> bool {
        std::fs::read_dir(self.step_dir(id, version))
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    }

    pub fn load_spec(&self) -> miette::Result<StepLibSpec> {
        StepLibSpec::from_path(&self.spec_path())
    }
}
