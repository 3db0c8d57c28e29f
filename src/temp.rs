//! Fixed-path temporary artifacts
//!
//! The executor binary and the package manifest live at fixed names under one
//! temporary directory and are overwritten on every run.

use std::env;
use std::path::{Path, PathBuf};

/// File name of the downloaded executor
pub const EXECUTOR_FILE_NAME: &str = "tuxmate";

/// File name of the package manifest handed to the executor
pub const MANIFEST_FILE_NAME: &str = "tuxsync_packages.txt";

/// Returns a directory path suitable for temporary artifacts.
/// Never returns a relative path, so artifacts never land under the current working
/// directory (e.g. when TMPDIR=tmp).
pub fn temp_dir_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        t
    } else {
        PathBuf::from("/tmp")
    }
}

/// Where a downloaded executor is written
pub fn executor_artifact_path(tmp_dir: &Path) -> PathBuf {
    tmp_dir.join(EXECUTOR_FILE_NAME)
}

/// Where the package manifest is written
pub fn manifest_path(tmp_dir: &Path) -> PathBuf {
    tmp_dir.join(MANIFEST_FILE_NAME)
}
