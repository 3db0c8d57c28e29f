//! Writing restored shell config over `~/.bashrc`

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::error::fs::{read_failed, write_failed};
use crate::ui;

/// Marker placed between existing and restored content when merging
pub const MERGE_SEPARATOR: &str = "\n\n# === TuxSync Restored Content ===\n";

/// Restores shell config into a single target file
#[derive(Debug, Clone)]
pub struct BashrcRestorer {
    path: PathBuf,
}

impl BashrcRestorer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Restorer for `~/.bashrc`, if a home directory is known
    pub fn for_home() -> Option<Self> {
        dirs::home_dir().map(|home| Self::new(home.join(".bashrc")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `content`, replacing or appending after [`MERGE_SEPARATOR`]
    ///
    /// When the target exists and `backup_existing` is set, it is first copied
    /// to `.bashrc.backup_<YYYYmmdd_HHMMSS>` alongside it. Returns that path.
    pub fn restore(
        &self,
        content: &str,
        backup_existing: bool,
        merge: bool,
    ) -> Result<Option<PathBuf>> {
        if !self.path.exists() {
            fs::write(&self.path, content).map_err(|e| write_failed(&self.path, e))?;
            ui::success(".bashrc restored");
            return Ok(None);
        }

        let backup = if backup_existing {
            let backup = self.backup_path();
            ui::step(&format!(
                "Backing up existing .bashrc to {}",
                backup.display()
            ));
            fs::copy(&self.path, &backup).map_err(|e| write_failed(&backup, e))?;
            Some(backup)
        } else {
            None
        };

        let new_content = if merge {
            ui::step("Merging .bashrc content...");
            let existing =
                fs::read_to_string(&self.path).map_err(|e| read_failed(&self.path, e))?;
            format!("{existing}{MERGE_SEPARATOR}{content}")
        } else {
            ui::step("Replacing .bashrc...");
            content.to_string()
        };
        fs::write(&self.path, new_content).map_err(|e| write_failed(&self.path, e))?;

        tracing::info!(path = %self.path.display(), merge, "shell config restored");
        ui::success(".bashrc restored");
        Ok(backup)
    }

    fn backup_path(&self) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let name = self
            .path
            .file_name()
            .map_or_else(|| ".bashrc".into(), |n| n.to_string_lossy().into_owned());
        self.path.with_file_name(format!("{name}.backup_{stamp}"))
    }
}
