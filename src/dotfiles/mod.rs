//! Optional dotfile-manager integration
//!
//! Orchestrators talk to a [`DotfileManager`] without knowing whether a real
//! tool backs it. [`Chezmoi`] drives the chezmoi CLI; [`NoDotfiles`] is used
//! when chezmoi is absent or the user declined to install it. Every operation
//! fails soft and reports a boolean.

mod chezmoi;

pub use chezmoi::Chezmoi;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::exec::CommandRunner;
use crate::ui::{self, Prompter};

/// Capability interface for a dotfile manager
pub trait DotfileManager {
    fn is_installed(&self) -> bool;

    /// Bootstrap the tool itself
    fn install(&mut self) -> bool;

    /// Initialize from a dotfiles repository
    fn init_repo(&self, repo_url: &str) -> bool;

    /// Write managed dotfiles into the home directory
    fn apply(&self, dry_run: bool) -> bool;

    /// Directory holding the managed source state
    fn source_dir(&self) -> Option<PathBuf>;

    /// Start managing `path`
    fn add_file(&self, path: &Path) -> bool;

    /// Commit and push source-state changes; a clean tree is a success
    fn git_push(&self) -> bool;
}

/// Stand-in when no dotfile manager is available
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDotfiles;

impl DotfileManager for NoDotfiles {
    fn is_installed(&self) -> bool {
        false
    }

    fn install(&mut self) -> bool {
        false
    }

    fn init_repo(&self, _repo_url: &str) -> bool {
        tracing::debug!("dotfile manager unavailable, init skipped");
        ui::warn("chezmoi not available, skipping dotfile init");
        false
    }

    fn apply(&self, _dry_run: bool) -> bool {
        tracing::debug!("dotfile manager unavailable, apply skipped");
        ui::warn("chezmoi not available, skipping dotfile apply");
        false
    }

    fn source_dir(&self) -> Option<PathBuf> {
        None
    }

    fn add_file(&self, _path: &Path) -> bool {
        false
    }

    fn git_push(&self) -> bool {
        tracing::debug!("dotfile manager unavailable, push skipped");
        ui::warn("chezmoi not available, skipping dotfile push");
        false
    }
}

/// Hand back a usable chezmoi, offering to install it when `auto_install`
///
/// Falls back to [`NoDotfiles`] when chezmoi is missing and not installed.
pub fn ensure_chezmoi<'a>(
    runner: &'a dyn CommandRunner,
    prompter: &dyn Prompter,
    auto_install: bool,
) -> Result<Box<dyn DotfileManager + 'a>> {
    let mut manager = Chezmoi::locate(runner);
    if manager.is_installed() {
        return Ok(Box::new(manager));
    }

    if auto_install {
        ui::warn("chezmoi not found");
        if prompter.confirm("Install chezmoi for dotfile management?", false)? && manager.install()
        {
            return Ok(Box::new(manager));
        }
    }

    Ok(Box::new(NoDotfiles))
}
