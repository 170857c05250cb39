//! Test fixtures for build request tests
//!
//! Request files live under `tests/fixtures/requests/`. Project directories
//! are created per test in a temporary base directory.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Path to a request fixture by file name
pub fn request_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/requests")
        .join(name)
}

/// Base directory with both the original and the working-copy project roots
pub fn base_with_sources() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    fs::create_dir_all(dir.path().join("src/xcode")).expect("create original dir");
    fs::create_dir_all(dir.path().join("target/xcode/src/main/xcode"))
        .expect("create working copy dir");
    dir
}

/// Helper to create argv from string slice
pub fn argv(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}
