//! Handler for `stepman activate`.

use std::path::Path;

use miette::Result;

use stepman_library::cache::LibraryCache;
use stepman_ops::library_uri;
use stepman_ops::ops_activate::{self, ActivateOptions};

pub async fn exec(
    cache: &LibraryCache,
    library: Option<&str>,
    id: &str,
    version: &str,
    path: &Path,
    copy_definition: Option<&Path>,
    update: bool,
) -> Result<()> {
    let uri = library_uri(cache, library)?;
    let opts = ActivateOptions {
        id,
        version,
        dest: path,
        copy_definition,
        update,
    };
    let activation = ops_activate::activate(cache, &uri, &opts).await?;
    println!(
        "{}@{} {}",
        activation.resolved.id,
        activation.resolved.version,
        activation.path.display()
    );
    Ok(())
}
