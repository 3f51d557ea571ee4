//! Regenerate a library's `spec.json` from its checked-out source tree.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use stepman_core::spec::{StepGroup, StepGroupInfo, StepLibSpec};
use stepman_core::steplib::{self, StepLibDescriptor};
use stepman_core::{SPEC_FILE_NAME, STEPLIB_FILE_NAME, STEP_FILE_NAME, STEP_INFO_FILE_NAME};
use stepman_resolver::version::Semver;
use stepman_util::errors::StepmanError;

/// Build the manifest for the library checked out at `collection_dir`.
///
/// A library without `steplib.toml` may ship a prebuilt `spec.json`, which
/// is used as is.
pub fn generate_spec(collection_dir: &Path) -> miette::Result<StepLibSpec> {
    let descriptor_path = collection_dir.join(STEPLIB_FILE_NAME);
    if !descriptor_path.is_file() {
        let prebuilt = collection_dir.join(SPEC_FILE_NAME);
        if prebuilt.is_file() {
            tracing::debug!("Using prebuilt manifest {}", prebuilt.display());
            return StepLibSpec::from_path(&prebuilt);
        }
        return Err(StepmanError::Manifest {
            message: format!(
                "{} contains neither {STEPLIB_FILE_NAME} nor {SPEC_FILE_NAME}",
                collection_dir.display()
            ),
        }
        .into());
    }

    let descriptor = StepLibDescriptor::from_path(&descriptor_path)?;
    let steps_dir = collection_dir.join("steps");
    let mut steps = BTreeMap::new();
    for (id, step_dir) in sorted_subdirs(&steps_dir)? {
        match load_group(&id, &step_dir)? {
            Some(group) => {
                steps.insert(id, group);
            }
            None => tracing::warn!("Step `{id}` has no valid versions, skipping"),
        }
    }

    Ok(StepLibSpec {
        format_version: descriptor.format_version,
        steplib_source: descriptor.steplib_source,
        download_locations: descriptor.download_locations,
        assets_download_base_uri: descriptor.assets_download_base_uri,
        generated_at_timestamp: unix_now(),
        steps,
    })
}

fn load_group(id: &str, step_dir: &Path) -> miette::Result<Option<StepGroup>> {
    let info_path = step_dir.join(STEP_INFO_FILE_NAME);
    let info = if info_path.is_file() {
        steplib::load_group_info(&info_path)?
    } else {
        StepGroupInfo::default()
    };

    let mut versions = HashMap::new();
    let mut latest: Option<Semver> = None;
    for (name, version_dir) in sorted_subdirs(step_dir)? {
        let version = match name.parse::<Semver>() {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Skipping `{id}` version folder: {e}");
                continue;
            }
        };
        let step_file = version_dir.join(STEP_FILE_NAME);
        if !step_file.is_file() {
            tracing::warn!("Skipping `{id}@{name}`: no {STEP_FILE_NAME}");
            continue;
        }
        versions.insert(name, steplib::load_step(&step_file)?);
        if latest.as_ref().map_or(true, |l| version > *l) {
            latest = Some(version);
        }
    }

    Ok(latest.map(|latest| StepGroup {
        info,
        latest_version_number: latest.to_string(),
        versions,
    }))
}

fn sorted_subdirs(dir: &Path) -> miette::Result<Vec<(String, PathBuf)>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut dirs: Vec<(String, PathBuf)> = fs::read_dir(dir)
        .map_err(StepmanError::Io)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| (entry.file_name().to_string_lossy().to_string(), entry.path()))
        .filter(|(name, _)| !name.starts_with('.'))
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
