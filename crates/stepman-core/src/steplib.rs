//! Source descriptors a library repository is built from.
//!
//! ```text
//! steplib.toml
//! steps/
//!   script/
//!     step-info.toml
//!     1.0.0/step.toml
//!     1.1.0/step.toml
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use stepman_util::errors::StepmanError;

use crate::spec::{DownloadLocation, Step, StepGroupInfo};

/// Library-wide settings from `steplib.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepLibDescriptor {
    pub format_version: String,
    pub steplib_source: String,
    #[serde(default)]
    pub download_locations: Vec<DownloadLocation>,
    #[serde(default)]
    pub assets_download_base_uri: Option<String>,
}

impl StepLibDescriptor {
    /// Load `steplib.toml` from the given path.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        read_toml(path)
    }
}

/// Load a single `step.toml` version definition.
pub fn load_step(path: &Path) -> miette::Result<Step> {
    read_toml(path)
}

/// Load a `step-info.toml` group descriptor.
pub fn load_group_info(path: &Path) -> miette::Result<StepGroupInfo> {
    read_toml(path)
}

/// Render a step definition as `step.toml` content.
///
/// TOML has no null, so null values among the untyped keys are left out.
pub fn step_to_toml(step: &Step) -> miette::Result<String> {
    let mut step = step.clone();
    step.extra.retain(|_, v| !v.is_null());
    step.extra.values_mut().for_each(strip_nulls);
    toml::to_string_pretty(&step).map_err(|e| {
        StepmanError::Manifest {
            message: format!("Failed to serialize step definition: {e}"),
        }
        .into()
    })
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => {
            items.retain(|v| !v.is_null());
            items.iter_mut().for_each(strip_nulls);
        }
        _ => {}
    }
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> miette::Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| StepmanError::Manifest {
        message: format!("Failed to read {}: {e}", path.display()),
    })?;
    toml::from_str(&content).map_err(|e| {
        StepmanError::Manifest {
            message: format!("Failed to parse {}: {e}", path.display()),
        }
        .into()
    })
}
