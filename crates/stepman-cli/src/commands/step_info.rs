use miette::Result;

use stepman_library::cache::LibraryCache;
use stepman_ops::{library_uri, ops_step_info, OutputFormat};

pub fn exec(
    cache: &LibraryCache,
    library: Option<&str>,
    id: &str,
    version: &str,
    format: &str,
) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let uri = library_uri(cache, library)?;
    let info = ops_step_info::step_info(cache, &uri, id, version)?;
    ops_step_info::print(&info, format)
}
