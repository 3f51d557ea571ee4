//! Operation: resolve a step version, download it if needed, and copy it to
//! a destination directory.

use std::path::{Path, PathBuf};

use stepman_core::config::GlobalConfig;
use stepman_core::steplib::step_to_toml;
use stepman_library::cache::LibraryCache;
use stepman_library::download::{build_client, download_step, DownloadSettings};
use stepman_resolver::version::VersionConstraint;
use stepman_util::errors::StepmanError;
use stepman_util::progress::{spinner, status, status_warn};

use crate::{ops_update, resolve_step, ResolvedStep};

/// What to activate and where.
#[derive(Debug, Clone)]
pub struct ActivateOptions<'a> {
    pub id: &'a str,
    /// Version constraint; empty means latest.
    pub version: &'a str,
    pub dest: &'a Path,
    /// Also write the resolved step definition here as TOML.
    pub copy_definition: Option<&'a Path>,
    /// Update the library once and retry if resolution fails.
    pub update: bool,
}

/// A finished activation.
#[derive(Debug, Clone)]
pub struct Activation {
    pub resolved: ResolvedStep,
    pub path: PathBuf,
}

pub async fn activate(
    cache: &LibraryCache,
    uri: &str,
    opts: &ActivateOptions<'_>,
) -> miette::Result<Activation> {
    let constraint = VersionConstraint::parse(opts.version)?;
    let routing = cache.routing()?;
    let paths = cache.open(&routing, uri)?;
    let mut spec = paths.load_spec()?;

    let resolved = match resolve_step(&spec, opts.id, &constraint) {
        Ok(resolved) => resolved,
        Err(e) if opts.update => {
            tracing::info!("{e}; updating {uri} and retrying");
            let (cache, uri) = (cache.clone(), uri.to_string());
            spec = tokio::task::spawn_blocking(move || ops_update::update(&cache, &uri))
                .await
                .map_err(|e| StepmanError::Generic {
                    message: format!("Background task failed: {e}"),
                })??;
            resolve_step(&spec, opts.id, &constraint)?
        }
        Err(e) => return Err(e),
    };
    let ResolvedStep { id, version, .. } = &resolved;

    if let Some(group) = spec.step_group(id) {
        if group.info.is_deprecated() {
            let message = match group.info.deprecate_notes.as_deref() {
                Some(notes) => format!("{id}: {notes}"),
                None => id.clone(),
            };
            status_warn("Deprecated", &message);
        }
    }

    let cached = paths.step_dir(id, version);
    if paths.has_step(id, version) {
        tracing::debug!("{id}@{version} found in cache at {}", cached.display());
    } else {
        let config = GlobalConfig::load_from(&cache.config_path())?;
        let settings = DownloadSettings::from(&config.download);
        let client = build_client(&settings)?;
        let pb = spinner(&format!("Downloading {id}@{version}"));
        let downloaded =
            download_step(&client, &spec, id, version, &resolved.step, &cached, &settings).await;
        pb.finish_and_clear();
        downloaded?;
    }

    stepman_util::fs::copy_dir_all(&cached, opts.dest, true).map_err(|e| {
        StepmanError::Activation {
            message: format!(
                "Failed to copy {id}@{version} to {}: {e}",
                opts.dest.display()
            ),
        }
    })?;

    if let Some(definition) = opts.copy_definition {
        write_definition(&resolved, definition)?;
    }

    status("Activated", &format!("{id}@{version} at {}", opts.dest.display()));
    Ok(Activation {
        path: opts.dest.to_path_buf(),
        resolved,
    })
}

fn write_definition(resolved: &ResolvedStep, path: &Path) -> miette::Result<()> {
    let content = step_to_toml(&resolved.step)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        stepman_util::fs::ensure_dir(parent).map_err(StepmanError::Io)?;
    }
    std::fs::write(path, content).map_err(|e| StepmanError::Activation {
        message: format!("Failed to write step definition {}: {e}", path.display()),
    })?;
    Ok(())
}
