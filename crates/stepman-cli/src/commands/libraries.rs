use miette::Result;

use stepman_library::cache::LibraryCache;
use stepman_ops::{ops_libraries, OutputFormat};

pub fn exec(cache: &LibraryCache, format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let entries = ops_libraries::list(cache)?;
    ops_libraries::print(&entries, format)
}
