//! Builders for on-disk library fixtures.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;

/// Write a library source tree with `steplib.toml` and the given step versions.
pub fn write_library(root: &Path, zip_src: &str, steps: &[(&str, &[&str])]) {
    std::fs::create_dir_all(root).unwrap();
    std::fs::write(
        root.join("steplib.toml"),
        format!(
            r#"format_version = "1.0.0"
steplib_source = "file://{}"

[[download_locations]]
type = "zip"
src = "{zip_src}"
"#,
            root.display()
        ),
    )
    .unwrap();

    for (id, versions) in steps {
        for version in *versions {
            let dir = root.join("steps").join(id).join(version);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(
                dir.join("step.toml"),
                format!(
                    r#"title = "{id}"
summary = "{id} at {version}"

[source]
git = "https://github.com/example/steps-{id}.git"
commit = "{version}-sha"
"#
                ),
            )
            .unwrap();
        }
    }
}

/// A zip archive containing `files` below an optional wrapper folder.
pub fn zip_bytes(wrapper: Option<&str>, files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().unix_permissions(0o755);
    if let Some(w) = wrapper {
        writer.add_directory(format!("{w}/"), options).unwrap();
    }
    for (name, content) in files {
        let path = match wrapper {
            Some(w) => format!("{w}/{name}"),
            None => name.to_string(),
        };
        writer.start_file(path, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Place a step archive where a `file://` zip location expects it.
pub fn write_step_zip(assets: &Path, id: &str, version: &str, files: &[(&str, &str)]) {
    let dir = assets.join(id).join(version);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("step.zip"), zip_bytes(Some("step"), files)).unwrap();
}
