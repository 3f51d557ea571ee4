//! Operation: register a step library and build its manifest.

use std::path::Path;

use stepman_core::routing::{alias_for_uri, normalize_uri, RoutingStore};
use stepman_core::spec::StepLibSpec;
use stepman_library::cache::{LibraryCache, LibraryPaths};
use stepman_library::generate::generate_spec;
use stepman_library::source::LibrarySource;
use stepman_util::fs::remove_dir_if_exists;
use stepman_util::progress::{spinner, status, status_info};

/// Set up the library at `uri`.
///
/// The manifest is generated from the library's sources unless `copy_spec`
/// names a prebuilt `spec.json` to use instead. Setting up a library that is
/// already registered and has a manifest does nothing.
pub fn setup(
    cache: &LibraryCache,
    uri: &str,
    copy_spec: Option<&Path>,
) -> miette::Result<LibraryPaths> {
    let uri = normalize_uri(uri);
    let mut routing = cache.routing()?;

    if let Some(alias) = routing.alias_for(uri) {
        let paths = cache.library(uri, &alias);
        if paths.spec_path().is_file() {
            status_info("Fresh", &format!("{uri} is already set up"));
            return Ok(paths);
        }
        tracing::debug!("Route for {uri} exists but manifest is missing, setting up again");
    }

    let alias = alias_for_uri(uri);
    let paths = cache.library(uri, &alias);
    remove_dir_if_exists(paths.base_dir());

    let pb = spinner(&format!("Fetching {uri}"));
    let built = build(&paths, copy_spec);
    pb.finish_and_clear();
    let spec = match built {
        Ok(spec) => spec,
        Err(e) => {
            remove_dir_if_exists(paths.base_dir());
            return Err(e);
        }
    };

    routing.insert(uri, &alias)?;
    tracing::debug!("Routed {uri} to {alias}");
    status("Set up", &format!("{uri} ({} steps)", spec.steps.len()));
    Ok(paths)
}

fn build(paths: &LibraryPaths, copy_spec: Option<&Path>) -> miette::Result<StepLibSpec> {
    LibrarySource::from_uri(&paths.uri).fetch(&paths.collection_dir())?;
    let spec = match copy_spec {
        Some(path) => StepLibSpec::from_path(path)?,
        None => generate_spec(&paths.collection_dir())?,
    };
    spec.save(&paths.spec_path())?;
    Ok(spec)
}
