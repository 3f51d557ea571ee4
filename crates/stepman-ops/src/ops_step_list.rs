//! Operation: list every step of a library.

use serde::Serialize;

use stepman_library::cache::LibraryCache;

use crate::{print_json, OutputFormat};

#[derive(Debug, Clone, Serialize)]
pub struct StepSummary {
    pub id: String,
    pub latest_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub deprecated: bool,
}

/// Steps of the library at `uri`, ordered by id.
pub fn step_list(cache: &LibraryCache, uri: &str) -> miette::Result<Vec<StepSummary>> {
    let routing = cache.routing()?;
    let spec = cache.open(&routing, uri)?.load_spec()?;
    Ok(spec
        .steps
        .iter()
        .map(|(id, group)| StepSummary {
            id: id.clone(),
            latest_version: group.latest_version_number.clone(),
            title: group.latest_step().and_then(|s| s.title.clone()),
            deprecated: group.info.is_deprecated(),
        })
        .collect())
}

pub fn print(steps: &[StepSummary], format: OutputFormat) -> miette::Result<()> {
    if format == OutputFormat::Json {
        return print_json(&steps);
    }
    if steps.is_empty() {
        println!("No steps in library");
        return Ok(());
    }
    let width = steps.iter().map(|s| s.id.len()).max().unwrap_or(0);
    for step in steps {
        let marker = if step.deprecated { "  (deprecated)" } else { "" };
        println!("{:<width$}  {}{marker}", step.id, step.latest_version);
    }
    Ok(())
}
