//! Operation: describe one step of a library.

use serde::Serialize;

use stepman_core::spec::{StepGroupInfo, StepSource};
use stepman_library::cache::LibraryCache;
use stepman_resolver::resolver::sorted_versions;
use stepman_resolver::version::VersionConstraint;

use crate::{print_json, resolve_step, OutputFormat};

#[derive(Debug, Clone, Serialize)]
pub struct StepInfo {
    pub library: String,
    pub id: String,
    pub version: String,
    pub latest_version: String,
    /// Every well-formed version, ascending.
    pub versions: Vec<String>,
    pub deprecated: bool,
    #[serde(flatten)]
    pub info: StepGroupInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<StepSource>,
}

/// Resolve `version` of step `id` in the library at `uri` and collect its details.
pub fn step_info(
    cache: &LibraryCache,
    uri: &str,
    id: &str,
    version: &str,
) -> miette::Result<StepInfo> {
    let constraint = VersionConstraint::parse(version)?;
    let routing = cache.routing()?;
    let spec = cache.open(&routing, uri)?.load_spec()?;
    let resolved = resolve_step(&spec, id, &constraint)?;
    let group = spec.step_group(id).cloned().unwrap_or_default();

    Ok(StepInfo {
        library: uri.to_string(),
        id: resolved.id,
        version: resolved.version,
        latest_version: resolved.latest_version,
        versions: sorted_versions(&group)
            .iter()
            .map(|v| v.to_string())
            .collect(),
        deprecated: group.info.is_deprecated(),
        info: group.info,
        title: resolved.step.title,
        summary: resolved.step.summary,
        source: resolved.step.source,
    })
}

pub fn print(info: &StepInfo, format: OutputFormat) -> miette::Result<()> {
    if format == OutputFormat::Json {
        return print_json(info);
    }

    println!("{}@{}", info.id, info.version);
    if let Some(title) = &info.title {
        println!("  title:     {title}");
    }
    if let Some(summary) = &info.summary {
        println!("  summary:   {summary}");
    }
    println!("  library:   {}", info.library);
    println!("  latest:    {}", info.latest_version);
    println!("  versions:  {}", info.versions.join(", "));
    if let Some(maintainer) = &info.info.maintainer {
        println!("  maintainer: {maintainer}");
    }
    if let Some(source) = &info.source {
        println!("  source:    {} ({})", source.git, source.commit);
    }
    if info.deprecated {
        println!(
            "  deprecated: removal on {}",
            info.info.removal_date.as_deref().unwrap_or("?")
        );
        if let Some(notes) = &info.info.deprecate_notes {
            println!("    {notes}");
        }
    }
    Ok(())
}
