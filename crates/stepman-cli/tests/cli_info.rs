mod support;

use predicates::prelude::*;
use support::Env;

#[test]
fn test_step_info_text() {
    let env = Env::new();
    env.publish("script", "1.0.0");
    env.publish("script", "1.10.0");
    env.setup();

    env.stepman()
        .args(["step-info", "--library", &env.uri(), "--id", "script", "--version", "1.0.0"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("script@1.0.0")
                .and(predicate::str::contains("latest:    1.10.0"))
                .and(predicate::str::contains("1.0.0, 1.10.0")),
        );
}

#[test]
fn test_step_info_json() {
    let env = Env::new();
    env.publish("legacy", "0.1.0");
    env.deprecate("legacy");
    env.setup();

    let output = env
        .stepman()
        .args(["step-info", "--library", &env.uri(), "--id", "legacy", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["version"], "0.1.0");
    assert_eq!(json["deprecated"], true);
    assert_eq!(json["deprecate_notes"], "Use script");
    assert_eq!(json["source"]["commit"], "c0.1.0");
}

#[test]
fn test_step_info_bad_format() {
    let env = Env::new();
    env.publish("script", "1.0.0");
    env.setup();

    env.stepman()
        .args(["step-info", "--library", &env.uri(), "--id", "script", "--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown output format"));
}

#[test]
fn test_step_list() {
    let env = Env::new();
    env.publish("script", "1.0.0");
    env.publish("legacy", "0.1.0");
    env.deprecate("legacy");
    env.setup();

    env.stepman()
        .args(["step-list", "--library", &env.uri()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("legacy")
                .and(predicate::str::contains("(deprecated)"))
                .and(predicate::str::contains("script")),
        );
}

#[test]
fn test_export_spec_latest() {
    let env = Env::new();
    env.publish("script", "1.0.0");
    env.publish("script", "1.1.0");
    env.setup();
    let out = env.path("export/spec.json");

    env.stepman()
        .args(["export-spec", "--library", &env.uri(), "--latest"])
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_str(&support::read(&out)).unwrap();
    let versions = json["steps"]["script"]["versions"].as_object().unwrap();
    assert_eq!(versions.len(), 1);
    assert!(versions.contains_key("1.1.0"));
}
