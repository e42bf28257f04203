#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use prebuild::PrebuildOptions;

use crate::fake_host::{CallLog, FakeHost};

/// Create a temp directory populated with `files` (relative path, contents).
pub fn fixture_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    for (rel, contents) in files {
        write_file(dir.path(), rel, contents);
    }
    dir
}

/// The `files` fixture: three JSON files plus an unrelated entry module.
pub fn json_fixture() -> TempDir {
    fixture_dir(&[
        ("one.json", r#"{"one": 1}"#),
        ("two.json", r#"{"two": 2}"#),
        ("nested/three.json", r#"{"three": 3}"#),
        ("index.js", "console.log('hello')"),
    ])
}

pub fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create fixture dir");
    }
    fs::write(&path, contents).expect("failed to write fixture file");
}

/// Options whose build and watch callbacks record into the given logs.
pub fn recording_options(build: &CallLog, watch: &CallLog) -> PrebuildOptions<FakeHost> {
    let build = build.clone();
    let watch = watch.clone();
    PrebuildOptions::new()
        .build_sync(move |_host, _compilation, files| {
            build.record(files);
            Ok(())
        })
        .watch_sync(move |_host, _compilation, changed| {
            watch.record(changed);
            Ok(())
        })
}
