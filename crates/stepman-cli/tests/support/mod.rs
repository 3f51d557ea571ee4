#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// A temp dir holding a stepman home, a `file://` library and its step archives.
pub struct Env {
    pub tmp: TempDir,
}

impl Env {
    pub fn new() -> Self {
        let env = Self {
            tmp: TempDir::new().unwrap(),
        };
        std::fs::create_dir_all(env.library()).unwrap();
        std::fs::write(
            env.library().join("steplib.toml"),
            format!(
                r#"format_version = "1.0.0"
steplib_source = "{}"

[[download_locations]]
type = "zip"
src = "file://{}"
"#,
                env.uri(),
                env.assets().display()
            ),
        )
        .unwrap();
        env
    }

    pub fn home(&self) -> PathBuf {
        self.tmp.path().join("home")
    }

    pub fn library(&self) -> PathBuf {
        self.tmp.path().join("library")
    }

    pub fn assets(&self) -> PathBuf {
        self.tmp.path().join("assets")
    }

    pub fn uri(&self) -> String {
        format!("file://{}", self.library().display())
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.tmp.path().join(name)
    }

    /// `stepman` running against this environment's home.
    #[allow(deprecated)]
    pub fn stepman(&self) -> Command {
        let mut cmd = Command::cargo_bin("stepman").unwrap();
        cmd.env("STEPMAN_HOME", self.home())
            .env_remove("STEPMAN_LIBRARY")
            .env_remove("RUST_LOG")
            .current_dir(self.tmp.path());
        cmd
    }

    pub fn publish(&self, id: &str, version: &str) {
        let dir = self.library().join("steps").join(id).join(version);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("step.toml"),
            format!(
                "title = \"{id}\"\nsummary = \"Runs {id}\"\n\n[source]\ngit = \"https://github.com/example/{id}.git\"\ncommit = \"c{version}\"\n"
            ),
        )
        .unwrap();

        let archive = self.assets().join(id).join(version);
        std::fs::create_dir_all(&archive).unwrap();
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("step/step.sh", SimpleFileOptions::default())
            .unwrap();
        writer
            .write_all(format!("echo {id} {version}").as_bytes())
            .unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        std::fs::write(archive.join("step.zip"), bytes).unwrap();
    }

    pub fn deprecate(&self, id: &str) {
        std::fs::write(
            self.library().join("steps").join(id).join("step-info.toml"),
            "removal_date = \"2030-01-01\"\ndeprecate_notes = \"Use script\"\n",
        )
        .unwrap();
    }

    pub fn setup(&self) {
        self.stepman()
            .args(["setup", "--library", &self.uri()])
            .assert()
            .success();
    }
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}
