use std::path::Path;

use miette::Result;

use stepman_library::cache::LibraryCache;
use stepman_ops::{library_uri, ops_export};

pub fn exec(cache: &LibraryCache, library: Option<&str>, output: &Path, latest: bool) -> Result<()> {
    let uri = library_uri(cache, library)?;
    ops_export::export(cache, &uri, output, latest)
}
