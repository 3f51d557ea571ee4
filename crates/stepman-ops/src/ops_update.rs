//! Operation: refresh a library checkout and regenerate its manifest.

use stepman_core::routing::RoutingStore;
use stepman_core::spec::StepLibSpec;
use stepman_library::cache::LibraryCache;
use stepman_library::generate::generate_spec;
use stepman_library::source::LibrarySource;
use stepman_util::errors::StepmanError;
use stepman_util::progress::{spinner, status};

/// Update the already set-up library at `uri` and return its new manifest.
pub fn update(cache: &LibraryCache, uri: &str) -> miette::Result<StepLibSpec> {
    let routing = cache.routing()?;
    let alias = routing.alias_for(uri).ok_or_else(|| StepmanError::Library {
        message: format!("Library `{uri}` is not set up"),
    })?;
    let paths = cache.library(uri, &alias);
    let collection = paths.collection_dir();
    let source = LibrarySource::from_uri(uri);

    let pb = spinner(&format!("Updating {uri}"));
    let fetched = if collection.is_dir() {
        source.refresh(&collection)
    } else {
        tracing::debug!("Checkout of {uri} missing, fetching again");
        source.fetch(&collection)
    };
    pb.finish_and_clear();
    fetched?;

    let spec = generate_spec(&collection)?;
    spec.save(&paths.spec_path())?;
    status("Updated", &format!("{uri} ({} steps)", spec.steps.len()));
    Ok(spec)
}
