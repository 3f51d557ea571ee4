//! Operation: list the libraries that have been set up.

use serde::Serialize;
use std::path::PathBuf;

use stepman_core::routing::RoutingStore;
use stepman_core::spec::StepLibSpec;
use stepman_library::cache::LibraryCache;

use crate::{print_json, OutputFormat};

#[derive(Debug, Clone, Serialize)]
pub struct LibraryEntry {
    pub uri: String,
    pub alias: String,
    pub spec_path: PathBuf,
    /// `None` when the manifest is missing or unreadable.
    pub steps: Option<usize>,
}

pub fn list(cache: &LibraryCache) -> miette::Result<Vec<LibraryEntry>> {
    let routing = cache.routing()?;
    Ok(routing
        .entries()
        .into_iter()
        .map(|route| {
            let paths = cache.library(&route.uri, &route.alias);
            let spec_path = paths.spec_path();
            let steps = match StepLibSpec::from_path(&spec_path) {
                Ok(spec) => Some(spec.steps.len()),
                Err(e) => {
                    tracing::warn!("{}: {e}", route.uri);
                    None
                }
            };
            LibraryEntry {
                uri: route.uri,
                alias: route.alias,
                spec_path,
                steps,
            }
        })
        .collect())
}

pub fn print(entries: &[LibraryEntry], format: OutputFormat) -> miette::Result<()> {
    if format == OutputFormat::Json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!("No libraries set up");
        return Ok(());
    }
    for entry in entries {
        let steps = match entry.steps {
            Some(n) => format!("{n} steps"),
            None => "manifest missing".to_string(),
        };
        println!("{}", entry.uri);
        println!("  alias: {}  ({steps})", entry.alias);
        println!("  spec:  {}", entry.spec_path.display());
    }
    Ok(())
}
