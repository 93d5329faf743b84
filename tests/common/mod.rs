#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

pub use devwatch_test_utils::builders;
pub use devwatch_test_utils::{
    init_tracing, wait_until, with_timeout, BrokenExecutor, FakeExecutor, RecordingAction,
    SharedBuffer,
};

/// A temporary project with an empty `src/` directory.
///
/// Returns the guard and the canonical root (watch backends report
/// canonical paths on some platforms).
pub fn lua_project() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("creating temp project");
    std::fs::create_dir(dir.path().join("src")).expect("creating src/");
    let root = dir.path().canonicalize().expect("canonicalizing temp project");
    (dir, root)
}
