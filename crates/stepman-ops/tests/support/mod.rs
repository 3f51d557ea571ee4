//! A throwaway stepman home plus a `file://` library with zipped steps.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use stepman_library::cache::LibraryCache;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

pub struct Fixture {
    pub tmp: TempDir,
    pub cache: LibraryCache,
    pub library: PathBuf,
    pub assets: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let cache = LibraryCache::new(tmp.path().join("home"));
        let library = tmp.path().join("library");
        let assets = tmp.path().join("assets");
        std::fs::create_dir_all(&library).unwrap();
        std::fs::write(
            library.join("steplib.toml"),
            format!(
                r#"format_version = "1.0.0"
steplib_source = "file://{}"

[[download_locations]]
type = "zip"
src = "file://{}"
"#,
                library.display(),
                assets.display()
            ),
        )
        .unwrap();
        Self {
            tmp,
            cache,
            library,
            assets,
        }
    }

    pub fn uri(&self) -> String {
        format!("file://{}", self.library.display())
    }

    /// Publish `id@version`: its `step.toml` in the library and its archive
    /// in the assets folder.
    pub fn publish(&self, id: &str, version: &str) {
        let dir = self.library.join("steps").join(id).join(version);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("step.toml"),
            format!(
                r#"title = "{id}"
summary = "{id} {version}"

[source]
git = "https://github.com/example/steps-{id}.git"
commit = "{version}-sha"
"#
            ),
        )
        .unwrap();

        let archive_dir = self.assets.join(id).join(version);
        std::fs::create_dir_all(&archive_dir).unwrap();
        std::fs::write(
            archive_dir.join("step.zip"),
            zip_with("step", &[("step.sh", &format!("echo {id} {version}"))]),
        )
        .unwrap();
    }

    pub fn deprecate(&self, id: &str, notes: &str) {
        std::fs::write(
            self.library.join("steps").join(id).join("step-info.toml"),
            format!("removal_date = \"2030-01-01\"\ndeprecate_notes = \"{notes}\"\n"),
        )
        .unwrap();
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.tmp.path().join(name)
    }
}

pub fn zip_with(wrapper: &str, files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().unix_permissions(0o755);
    for (name, content) in files {
        writer.start_file(format!("{wrapper}/{name}"), options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}
