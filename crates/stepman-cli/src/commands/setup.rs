use std::path::Path;

use miette::Result;

use stepman_library::cache::LibraryCache;
use stepman_ops::{library_uri, ops_setup};

pub fn exec(cache: &LibraryCache, library: Option<&str>, copy_spec: Option<&Path>) -> Result<()> {
    let uri = library_uri(cache, library)?;
    ops_setup::setup(cache, &uri, copy_spec)?;
    Ok(())
}
