use std::path::PathBuf;

use stepman_core::spec::{DownloadLocation, StepLibSpec};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_parse_spec_fixture() {
    let spec = StepLibSpec::from_path(&fixture("spec.json")).unwrap();
    assert_eq!(spec.format_version, "1.0.0");
    assert_eq!(spec.steplib_source, "https://github.com/example/steplib.git");
    assert_eq!(spec.generated_at_timestamp, 1_700_000_000);
    assert_eq!(spec.steps.len(), 2);
    assert_eq!(
        spec.download_locations,
        vec![
            DownloadLocation::Zip {
                src: "https://assets.example.com/steps".to_string()
            },
            DownloadLocation::Git {
                src: "source/git".to_string()
            },
        ]
    );
}

#[test]
fn test_step_group_lookup() {
    let spec = StepLibSpec::from_path(&fixture("spec.json")).unwrap();
    let group = spec.step_group("script").unwrap();
    assert_eq!(group.latest_version_number, "2.0.0");
    assert_eq!(group.versions.len(), 3);
    assert_eq!(group.info.maintainer.as_deref(), Some("core-team"));

    let latest = group.latest_step().unwrap();
    assert_eq!(latest.summary.as_deref(), Some("Run a shell script"));
    assert_eq!(latest.type_tags, vec!["utility"]);
    assert_eq!(latest.source.as_ref().unwrap().commit, "ccc333");

    assert!(spec.step_group("missing").is_none());
}

#[test]
fn test_deprecated_group() {
    let spec = StepLibSpec::from_path(&fixture("spec.json")).unwrap();
    assert!(spec.step_group("old-deploy").unwrap().info.is_deprecated());
    assert!(!spec.step_group("script").unwrap().info.is_deprecated());
}

#[test]
fn test_latest_only_keeps_one_version() {
    let spec = StepLibSpec::from_path(&fixture("spec.json")).unwrap();
    let latest = spec.latest_only();
    let group = latest.step_group("script").unwrap();
    assert_eq!(group.versions.len(), 1);
    assert!(group.versions.contains_key("2.0.0"));
    assert_eq!(latest.steplib_source, spec.steplib_source);
}

#[test]
fn test_latest_only_drops_dangling_marker() {
    let mut spec = StepLibSpec::from_path(&fixture("spec.json")).unwrap();
    spec.steps.get_mut("script").unwrap().latest_version_number = "9.9.9".to_string();
    let latest = spec.latest_only();
    assert!(latest.step_group("script").unwrap().versions.is_empty());
}

#[test]
fn test_save_writes_sorted_versions() {
    let spec = StepLibSpec::from_path(&fixture("spec.json")).unwrap();
    let tmp = tempfile::TempDir::new().unwrap();
    let out = tmp.path().join("nested").join("spec.json");
    spec.save(&out).unwrap();

    let written = std::fs::read_to_string(&out).unwrap();
    let first = written.find("\"1.0.0\": {").unwrap();
    let second = written.find("\"1.1.0\": {").unwrap();
    let third = written.find("\"2.0.0\": {").unwrap();
    assert!(first < second && second < third);

    let reread = StepLibSpec::from_path(&out).unwrap();
    assert_eq!(reread, spec);
}

#[test]
fn test_invalid_json_is_manifest_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("spec.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = StepLibSpec::from_path(&path).unwrap_err();
    assert!(err.to_string().contains("Manifest error"), "got: {err}");
}

#[test]
fn test_missing_file_is_error() {
    assert!(StepLibSpec::from_path(&fixture("does-not-exist.json")).is_err());
}

const STEP_WITH_INPUTS: &str = r#"{
  "format_version": "1.0.0",
  "steplib_source": "https://github.com/example/steplib.git",
  "steps": {
    "script": {
      "info": { "maintainer": "core-team", "asset_urls": { "icon.svg": "https://assets.example.com/icon.svg" } },
      "latest_version_number": "1.0.0",
      "versions": {
        "1.0.0": {
          "title": "Script",
          "host_os_tags": ["linux"],
          "deps": { "brew": [{ "name": "bash" }] },
          "toolkit": { "bash": { "entry_file": "step.sh" } },
          "inputs": [{ "content": "echo hi", "opts": { "is_required": true } }],
          "outputs": [{ "EXIT_CODE": null }]
        }
      }
    }
  }
}"#;

#[test]
fn test_unknown_step_keys_survive_save() {
    let spec = StepLibSpec::parse(STEP_WITH_INPUTS).unwrap();
    let step = &spec.step_group("script").unwrap().versions["1.0.0"];
    assert_eq!(step.title.as_deref(), Some("Script"));
    assert_eq!(step.extra["inputs"][0]["opts"]["is_required"], true);

    let tmp = tempfile::TempDir::new().unwrap();
    let out = tmp.path().join("spec.json");
    spec.save(&out).unwrap();
    let written = std::fs::read_to_string(&out).unwrap();
    for key in ["inputs", "outputs", "deps", "toolkit", "host_os_tags", "asset_urls"] {
        assert!(written.contains(&format!("\"{key}\"")), "{key} missing from {written}");
    }
    assert_eq!(StepLibSpec::from_path(&out).unwrap(), spec);
}

#[test]
fn test_unknown_keys_survive_latest_only() {
    let spec = StepLibSpec::parse(STEP_WITH_INPUTS).unwrap();
    let latest = spec.latest_only();
    let group = latest.step_group("script").unwrap();
    assert!(group.info.extra.contains_key("asset_urls"));
    assert!(group.versions["1.0.0"].extra.contains_key("deps"));
}
