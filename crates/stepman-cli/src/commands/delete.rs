//! Handler for `stepman delete`.

use miette::Result;

use stepman_library::cache::LibraryCache;
use stepman_ops::{library_uri, ops_delete};

pub fn exec(cache: &LibraryCache, library: Option<&str>, yes: bool) -> Result<()> {
    let uri = library_uri(cache, library)?;
    ops_delete::delete(cache, &uri, yes)?;
    Ok(())
}
