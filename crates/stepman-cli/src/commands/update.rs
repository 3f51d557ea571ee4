//! Handler for `stepman update`.

use miette::Result;

use stepman_library::cache::LibraryCache;
use stepman_ops::{library_uri, ops_update};

pub fn exec(cache: &LibraryCache, library: Option<&str>) -> Result<()> {
    let uri = library_uri(cache, library)?;
    ops_update::update(cache, &uri)?;
    Ok(())
}
