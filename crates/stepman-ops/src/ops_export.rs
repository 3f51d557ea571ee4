//! Operation: write a library's manifest to an arbitrary path.

use std::path::Path;

use stepman_library::cache::LibraryCache;
use stepman_util::progress::status;

/// Export the manifest of the library at `uri` to `output`. With
/// `latest_only` each step keeps just its latest version.
pub fn export(
    cache: &LibraryCache,
    uri: &str,
    output: &Path,
    latest_only: bool,
) -> miette::Result<()> {
    let routing = cache.routing()?;
    let spec = cache.open(&routing, uri)?.load_spec()?;
    let spec = if latest_only { spec.latest_only() } else { spec };
    spec.save(output)?;
    status("Exported", &format!("{uri} to {}", output.display()));
    Ok(())
}
