//! Shared helpers for unit tests.

use std::path::PathBuf;
use tempfile::TempDir;

/// Fresh, empty directory that disappears with the returned guard
pub fn create_test_storage_dir() -> TempDir {
    TempDir::new().expect("create temp dir")
}

/// Write `content` to `name` inside `dir` and return the full path
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write test file");
    path
}
