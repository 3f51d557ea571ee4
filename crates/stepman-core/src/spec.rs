//! The library manifest (`spec.json`): every step of a library and all of its
//! published versions.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use stepman_util::errors::StepmanError;

/// The parsed representation of a library's `spec.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepLibSpec {
    pub format_version: String,
    pub steplib_source: String,

    #[serde(default)]
    pub download_locations: Vec<DownloadLocation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets_download_base_uri: Option<String>,

    #[serde(default)]
    pub generated_at_timestamp: i64,

    #[serde(default)]
    pub steps: BTreeMap<String, StepGroup>,
}

/// Where a step's files can be fetched from, tried in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DownloadLocation {
    /// Base URI of prebuilt archives: `{src}/{id}/{version}/step.zip`.
    Zip { src: String },
    /// Clone the step's own source repository. `src` names the field used
    /// (`source/git`), kept for manifest compatibility.
    Git { src: String },
}

/// All published versions of one step.
///
/// `versions` is unordered. `latest_version_number` is chosen by whoever
/// produced the manifest and is taken as authoritative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepGroup {
    #[serde(default)]
    pub info: StepGroupInfo,

    #[serde(default)]
    pub latest_version_number: String,

    #[serde(default, serialize_with = "ordered_map")]
    pub versions: HashMap<String, Step>,
}

/// Manifest keys without a typed field.
pub type Extra = serde_json::Map<String, serde_json::Value>;

/// Group-level metadata shared by every version of a step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepGroupInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removal_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecate_notes: Option<String>,
    /// Keys stepman does not interpret, carried through unchanged.
    #[serde(flatten)]
    pub extra: Extra,
}

/// A single published step version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_code_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<StepSource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub project_type_tags: Vec<String>,
    #[serde(default)]
    pub is_requires_admin_user: bool,
    #[serde(default)]
    pub is_always_run: bool,
    /// Everything else a step declares (`inputs`, `outputs`, `deps`,
    /// `toolkit`, ...), carried through unchanged.
    #[serde(flatten)]
    pub extra: Extra,
}

/// The git repository and commit a step version was published from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSource {
    pub git: String,
    pub commit: String,
}

impl StepGroupInfo {
    /// A step is deprecated once a removal date has been announced.
    pub fn is_deprecated(&self) -> bool {
        self.removal_date.as_deref().is_some_and(|d| !d.is_empty())
    }
}

impl StepGroup {
    /// The step definition the latest marker points at, if it exists.
    pub fn latest_step(&self) -> Option<&Step> {
        self.versions.get(&self.latest_version_number)
    }
}

impl StepLibSpec {
    /// Load and parse a `spec.json` file from the given path.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| StepmanError::Manifest {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse(&content).map_err(|e| {
            StepmanError::Manifest {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Parse a manifest from a JSON string.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Serialize the manifest to pretty-printed JSON.
    pub fn to_string_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the manifest to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> miette::Result<()> {
        if let Some(parent) = path.parent() {
            stepman_util::fs::ensure_dir(parent).map_err(StepmanError::Io)?;
        }
        let json = self.to_string_pretty().map_err(|e| StepmanError::Manifest {
            message: format!("Failed to serialize manifest: {e}"),
        })?;
        std::fs::write(path, json).map_err(StepmanError::Io)?;
        Ok(())
    }

    pub fn step_group(&self, id: &str) -> Option<&StepGroup> {
        self.steps.get(id)
    }

    /// A copy of the manifest keeping only the latest version of each step.
    ///
    /// Groups whose latest marker does not name a published version keep no
    /// versions at all.
    pub fn latest_only(&self) -> Self {
        let steps = self
            .steps
            .iter()
            .map(|(id, group)| {
                let versions = group
                    .latest_step()
                    .map(|step| {
                        HashMap::from([(group.latest_version_number.clone(), step.clone())])
                    })
                    .unwrap_or_default();
                let trimmed = StepGroup {
                    info: group.info.clone(),
                    latest_version_number: group.latest_version_number.clone(),
                    versions,
                };
                (id.clone(), trimmed)
            })
            .collect();
        Self {
            steps,
            ..self.clone()
        }
    }
}

/// Serialize a `HashMap` with sorted keys so written manifests diff cleanly.
fn ordered_map<S, V>(map: &HashMap<String, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    let ordered: BTreeMap<&String, &V> = map.iter().collect();
    ordered.serialize(serializer)
}
