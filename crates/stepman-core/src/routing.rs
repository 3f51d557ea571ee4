//! Routing table mapping library URIs to their on-disk alias folders.
//!
//! Callers receive a [`RoutingStore`] explicitly; there is no process-wide
//! routing state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use stepman_util::errors::StepmanError;

/// One registered library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub uri: String,
    pub alias: String,
}

/// Key/value store from library URI to alias folder name.
pub trait RoutingStore {
    /// Alias registered for `uri`, if any.
    fn alias_for(&self, uri: &str) -> Option<String>;

    /// Register (or re-register) `uri` under `alias`.
    fn insert(&mut self, uri: &str, alias: &str) -> miette::Result<()>;

    /// Drop the route for `uri`. Returns whether a route existed.
    fn remove(&mut self, uri: &str) -> miette::Result<bool>;

    /// All routes, ordered by URI.
    fn entries(&self) -> Vec<Route>;
}

/// Canonical form of a library URI used as routing key.
pub fn normalize_uri(uri: &str) -> &str {
    uri.trim().trim_end_matches('/')
}

/// Deterministic alias folder name for a library URI.
pub fn alias_for_uri(uri: &str) -> String {
    stepman_util::hash::short_hash(normalize_uri(uri), 16)
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RoutingFile {
    #[serde(default)]
    route: Vec<Route>,
}

/// In-memory routing table.
#[derive(Debug, Clone, Default)]
pub struct MemoryRoutingStore {
    routes: BTreeMap<String, String>,
}

impl MemoryRoutingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoutingStore for MemoryRoutingStore {
    fn alias_for(&self, uri: &str) -> Option<String> {
        self.routes.get(normalize_uri(uri)).cloned()
    }

    fn insert(&mut self, uri: &str, alias: &str) -> miette::Result<()> {
        self.routes
            .insert(normalize_uri(uri).to_string(), alias.to_string());
        Ok(())
    }

    fn remove(&mut self, uri: &str) -> miette::Result<bool> {
        Ok(self.routes.remove(normalize_uri(uri)).is_some())
    }

    fn entries(&self) -> Vec<Route> {
        self.routes
            .iter()
            .map(|(uri, alias)| Route {
                uri: uri.clone(),
                alias: alias.clone(),
            })
            .collect()
    }
}

/// Routing table persisted as `routing.toml`; every mutation is written through.
#[derive(Debug, Clone)]
pub struct FileRoutingStore {
    path: PathBuf,
    inner: MemoryRoutingStore,
}

impl FileRoutingStore {
    /// Open the routing file at `path`. A missing file is an empty table.
    pub fn open(path: &Path) -> miette::Result<Self> {
        let mut inner = MemoryRoutingStore::new();
        if path.is_file() {
            let content = std::fs::read_to_string(path).map_err(|e| StepmanError::Library {
                message: format!("Failed to read routing table {}: {e}", path.display()),
            })?;
            let file: RoutingFile =
                toml::from_str(&content).map_err(|e| StepmanError::Library {
                    message: format!("Failed to parse routing table {}: {e}", path.display()),
                })?;
            for route in file.route {
                inner.insert(&route.uri, &route.alias)?;
            }
        }
        tracing::debug!(
            "Loaded {} route(s) from {}",
            inner.routes.len(),
            path.display()
        );
        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> miette::Result<()> {
        let file = RoutingFile {
            route: self.inner.entries(),
        };
        let content = toml::to_string_pretty(&file).map_err(|e| StepmanError::Library {
            message: format!("Failed to serialize routing table: {e}"),
        })?;
        if let Some(parent) = self.path.parent() {
            stepman_util::fs::ensure_dir(parent).map_err(StepmanError::Io)?;
        }
        std::fs::write(&self.path, content).map_err(StepmanError::Io)?;
        Ok(())
    }
}

impl RoutingStore for FileRoutingStore {
    fn alias_for(&self, uri: &str) -> Option<String> {
        self.inner.alias_for(uri)
    }

    fn insert(&mut self, uri: &str, alias: &str) -> miette::Result<()> {
        self.inner.insert(uri, alias)?;
        self.persist()
    }

    fn remove(&mut self, uri: &str) -> miette::Result<bool> {
        let removed = self.inner.remove(uri)?;
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    fn entries(&self) -> Vec<Route> {
        self.inner.entries()
    }
}
