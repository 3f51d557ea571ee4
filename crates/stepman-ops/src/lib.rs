//! Operations behind each `stepman` command.
//!
//! Every operation receives the [`LibraryCache`] it works on, so nothing here
//! reads process-wide state except the configuration file inside that cache.

pub mod ops_activate;
pub mod ops_delete;
pub mod ops_export;
pub mod ops_libraries;
pub mod ops_setup;
pub mod ops_step_info;
pub mod ops_step_list;
pub mod ops_update;

use std::str::FromStr;

use serde::Serialize;

use stepman_core::config::GlobalConfig;
use stepman_core::spec::{Step, StepLibSpec};
use stepman_library::cache::LibraryCache;
use stepman_resolver::resolver;
use stepman_resolver::version::VersionConstraint;
use stepman_util::errors::StepmanError;

/// How listing commands print their result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = StepmanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(StepmanError::Generic {
                message: format!("Unknown output format '{other}' (expected text or json)"),
            }),
        }
    }
}

/// The library URI a command works on: the explicit argument, else
/// `library.default` from the configuration.
pub fn library_uri(cache: &LibraryCache, library: Option<&str>) -> miette::Result<String> {
    if let Some(uri) = library.filter(|u| !u.trim().is_empty()) {
        return Ok(stepman_core::routing::normalize_uri(uri).to_string());
    }
    let config = GlobalConfig::load_from(&cache.config_path())?;
    match config.library.default {
        Some(uri) if !uri.trim().is_empty() => {
            tracing::debug!("Using default library {uri} from config");
            Ok(stepman_core::routing::normalize_uri(&uri).to_string())
        }
        _ => Err(miette::miette!(
            help = format!(
                "Pass --library <URI>, or set `default` under [library] in {}",
                cache.config_path().display()
            ),
            "No library given"
        )),
    }
}

/// A resolved step version, detached from the manifest it came from.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedStep {
    pub id: String,
    pub version: String,
    pub latest_version: String,
    pub step: Step,
}

/// Resolve `constraint` for step `id` of `spec`.
pub fn resolve_step(
    spec: &StepLibSpec,
    id: &str,
    constraint: &VersionConstraint,
) -> miette::Result<ResolvedStep> {
    let group = spec.step_group(id).ok_or_else(|| StepmanError::Resolution {
        message: format!("step `{id}` not found in library"),
    })?;
    let found = resolver::resolve(constraint, group).ok_or_else(|| StepmanError::Resolution {
        message: format!("no version of `{id}` matches `{constraint}`"),
    })?;
    Ok(ResolvedStep {
        id: id.to_string(),
        version: found.version,
        latest_version: found.latest_version,
        step: found.step.clone(),
    })
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> miette::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| StepmanError::Generic {
        message: format!("Failed to serialize output: {e}"),
    })?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepman_core::spec::StepGroup;
    use std::collections::HashMap;

    fn spec() -> StepLibSpec {
        let mut spec = StepLibSpec::default();
        spec.steps.insert(
            "script".to_string(),
            StepGroup {
                latest_version_number: "1.1.0".to_string(),
                versions: HashMap::from([
                    ("1.0.0".to_string(), Step::default()),
                    ("1.1.0".to_string(), Step::default()),
                ]),
                ..StepGroup::default()
            },
        );
        spec
    }

    #[test]
    fn output_format_parses() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn resolve_step_picks_highest_in_line() {
        let c = VersionConstraint::parse("1.x.x").unwrap();
        let r = resolve_step(&spec(), "script", &c).unwrap();
        assert_eq!(r.version, "1.1.0");
        assert_eq!(r.latest_version, "1.1.0");
    }

    #[test]
    fn resolve_step_reports_constraint() {
        let c = VersionConstraint::parse("2").unwrap();
        let err = resolve_step(&spec(), "script", &c).unwrap_err();
        assert!(err.to_string().contains("no version of `script` matches `2.x.x`"));
    }

    #[test]
    fn resolve_step_unknown_id() {
        let c = VersionConstraint::latest();
        let err = resolve_step(&spec(), "nope", &c).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn library_uri_prefers_argument() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = LibraryCache::new(tmp.path());
        assert_eq!(
            library_uri(&cache, Some("file:///lib/")).unwrap(),
            "file:///lib"
        );
    }

    #[test]
    fn library_uri_falls_back_to_config() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("config.toml"),
            "[library]\ndefault = \"file:///configured\"\n",
        )
        .unwrap();
        let cache = LibraryCache::new(tmp.path());
        assert_eq!(library_uri(&cache, None).unwrap(), "file:///configured");
    }

    #[test]
    fn library_uri_missing_everywhere() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = LibraryCache::new(tmp.path());
        assert!(library_uri(&cache, None).is_err());
    }
}
