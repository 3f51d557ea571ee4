//! Where a library's files come from: a git remote or a local directory.

use std::path::{Path, PathBuf};

use stepman_util::errors::StepmanError;

use crate::git;

const FILE_SCHEME: &str = "file://";

/// Local path named by a `file://` URI.
pub fn file_uri_path(uri: &str) -> Option<PathBuf> {
    uri.strip_prefix(FILE_SCHEME).map(PathBuf::from)
}

/// A library location parsed from its URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibrarySource {
    /// `file:///path/to/library`, copied rather than cloned.
    Local(PathBuf),
    /// Any other URI, handed to `git clone`.
    Git(String),
}

impl LibrarySource {
    pub fn from_uri(uri: &str) -> Self {
        match file_uri_path(uri) {
            Some(path) => Self::Local(path),
            None => Self::Git(uri.to_string()),
        }
    }

    /// Materialize the library into `dest`, which must not exist yet.
    pub fn fetch(&self, dest: &Path) -> miette::Result<()> {
        match self {
            Self::Local(src) => {
                if !src.is_dir() {
                    return Err(StepmanError::Library {
                        message: format!("Local library {} is not a directory", src.display()),
                    }
                    .into());
                }
                tracing::debug!("Copying local library {}", src.display());
                stepman_util::fs::copy_dir_all(src, dest, true).map_err(StepmanError::Io)?;
                Ok(())
            }
            Self::Git(uri) => {
                if !git::is_available() {
                    return Err(StepmanError::Git {
                        message: format!("`git` not found on PATH, cannot clone {uri}"),
                    }
                    .into());
                }
                git::clone(uri, dest, Some(1))
            }
        }
    }

    /// Bring an existing checkout at `dest` up to date.
    pub fn refresh(&self, dest: &Path) -> miette::Result<()> {
        match self {
            Self::Local(_) => {
                // Copy beside the old checkout and swap only once the copy is complete.
                let parent = dest.parent().ok_or_else(|| StepmanError::Generic {
                    message: format!("Invalid library checkout path {}", dest.display()),
                })?;
                stepman_util::fs::ensure_dir(parent).map_err(StepmanError::Io)?;
                let staging = tempfile::Builder::new()
                    .prefix(".refresh-")
                    .tempdir_in(parent)
                    .map_err(StepmanError::Io)?;
                let staged = staging.path().join("collection");
                self.fetch(&staged)?;

                if dest.exists() {
                    std::fs::remove_dir_all(dest).map_err(StepmanError::Io)?;
                }
                std::fs::rename(&staged, dest).map_err(StepmanError::Io)?;
                Ok(())
            }
            Self::Git(_) => git::pull(dest),
        }
    }
}
