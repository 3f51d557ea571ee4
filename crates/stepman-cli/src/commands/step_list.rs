use miette::Result;

use stepman_library::cache::LibraryCache;
use stepman_ops::{library_uri, ops_step_list, OutputFormat};

pub fn exec(cache: &LibraryCache, library: Option<&str>, format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let uri = library_uri(cache, library)?;
    let steps = ops_step_list::step_list(cache, &uri)?;
    ops_step_list::print(&steps, format)
}
