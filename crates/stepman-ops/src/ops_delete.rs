//! Operation: remove a library's files and its route.

use dialoguer::Confirm;

use stepman_core::routing::RoutingStore;
use stepman_library::cache::LibraryCache;
use stepman_util::errors::StepmanError;
use stepman_util::fs::{dir_size, format_size};
use stepman_util::progress::{status, status_info};

/// Delete the library at `uri`. Without `assume_yes` the user is asked to
/// confirm on a terminal; non-interactive runs must pass `assume_yes`.
///
/// Returns `false` if the user declined.
pub fn delete(cache: &LibraryCache, uri: &str, assume_yes: bool) -> miette::Result<bool> {
    let mut routing = cache.routing()?;
    let alias = routing.alias_for(uri).ok_or_else(|| StepmanError::Library {
        message: format!("Library `{uri}` is not set up"),
    })?;
    let paths = cache.library(uri, &alias);

    if !assume_yes {
        if !atty::is(atty::Stream::Stdin) {
            return Err(StepmanError::Generic {
                message: format!(
                    "Refusing to delete {uri} without confirmation; pass --yes to skip the prompt"
                ),
            }
            .into());
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete library {uri}?"))
            .default(false)
            .interact()
            .map_err(|e| StepmanError::Generic {
                message: format!("Prompt failed: {e}"),
            })?;
        if !confirmed {
            status_info("Cancelled", uri);
            return Ok(false);
        }
    }

    let freed = dir_size(paths.base_dir());
    if paths.base_dir().exists() {
        std::fs::remove_dir_all(paths.base_dir()).map_err(StepmanError::Io)?;
    }
    routing.remove(uri)?;
    status("Deleted", &format!("{uri} ({} freed)", format_size(freed)));
    Ok(true)
}
