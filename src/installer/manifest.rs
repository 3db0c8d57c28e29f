//! Temporary package manifest handed to the executor

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::error::fs::write_failed;

/// Newline-separated package list, deleted when dropped
#[derive(Debug)]
pub struct ManifestFile {
    path: PathBuf,
}

impl ManifestFile {
    /// Write `packages` to `path`, replacing any previous manifest
    pub fn write(path: PathBuf, packages: &[String]) -> Result<Self> {
        fs::write(&path, packages.join("\n")).map_err(|e| write_failed(&path, e))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ManifestFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "could not remove package manifest");
            }
        }
    }
}
