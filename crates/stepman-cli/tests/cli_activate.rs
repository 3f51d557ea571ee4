mod support;

use predicates::prelude::*;
use support::{read, Env};

fn env_with_versions() -> Env {
    let env = Env::new();
    for v in ["1.0.0", "1.1.0", "1.2.0", "2.0.0"] {
        env.publish("script", v);
    }
    env.setup();
    env
}

#[test]
fn test_activate_minor_locked() {
    let env = env_with_versions();
    let dest = env.path("out");

    env.stepman()
        .args(["activate", "--library", &env.uri(), "--id", "script", "--version", "1.1"])
        .arg("--path")
        .arg(&dest)
        .assert()
        .success()
        .stdout(predicate::str::contains("script@1.1.0"));
    assert_eq!(read(&dest.join("step.sh")), "echo script 1.1.0");
}

#[test]
fn test_activate_major_locked() {
    let env = env_with_versions();
    let dest = env.path("out");

    env.stepman()
        .args(["activate", "--library", &env.uri(), "--id", "script", "--version", "1.x.x"])
        .arg("--path")
        .arg(&dest)
        .assert()
        .success()
        .stdout(predicate::str::contains("script@1.2.0"));
}

#[test]
fn test_activate_latest() {
    let env = env_with_versions();
    let dest = env.path("out");

    env.stepman()
        .args(["activate", "--library", &env.uri(), "--id", "script"])
        .arg("--path")
        .arg(&dest)
        .assert()
        .success()
        .stdout(predicate::str::contains("script@2.0.0"));
    assert_eq!(read(&dest.join("step.sh")), "echo script 2.0.0");
}

#[test]
fn test_activate_copy_definition() {
    let env = env_with_versions();
    let dest = env.path("out");
    let definition = env.path("step.toml");

    env.stepman()
        .args(["activate", "--library", &env.uri(), "--id", "script", "--version", "1.0.0"])
        .arg("--path")
        .arg(&dest)
        .arg("--copy-definition")
        .arg(&definition)
        .assert()
        .success();
    assert!(read(&definition).contains("commit = \"c1.0.0\""));
}

#[test]
fn test_activate_no_match() {
    let env = env_with_versions();

    env.stepman()
        .args(["activate", "--library", &env.uri(), "--id", "script", "--version", "3"])
        .arg("--path")
        .arg(env.path("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no version of `script` matches `3.x.x`"));
}

#[test]
fn test_activate_invalid_constraint() {
    let env = env_with_versions();

    env.stepman()
        .args(["activate", "--library", &env.uri(), "--id", "script", "--version", "x.x.x"])
        .arg("--path")
        .arg(env.path("out"))
        .assert()
        .failure();
}

#[test]
fn test_activate_unknown_step() {
    let env = env_with_versions();

    env.stepman()
        .args(["activate", "--library", &env.uri(), "--id", "missing"])
        .arg("--path")
        .arg(env.path("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_activate_update_retry() {
    let env = env_with_versions();
    env.publish("script", "3.0.0");

    env.stepman()
        .args(["activate", "--library", &env.uri(), "--id", "script", "--version", "3", "--update"])
        .arg("--path")
        .arg(env.path("out"))
        .assert()
        .success()
        .stdout(predicate::str::contains("script@3.0.0"));
}

#[test]
fn test_activate_library_not_set_up() {
    let env = Env::new();

    env.stepman()
        .args(["activate", "--library", &env.uri(), "--id", "script"])
        .arg("--path")
        .arg(env.path("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not set up"));
}
