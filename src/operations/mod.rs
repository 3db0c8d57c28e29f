//! Operations module for backing up and restoring a machine profile
//!
//! This module provides the high-level workflows:
//! - BackupOperation: scan, optional dotfile delegation, storage selection, persist
//! - RestoreOperation: validate, confirm, fetch, install, shell config, dotfiles
//!
//! The operations coordinate with:
//! - Scanner: package and shell-config discovery (from scanner module)
//! - Storage: backend selection and persistence (from storage module)
//! - Installer: executor-driven package installation (from installer module)
//! - Dotfiles: optional chezmoi delegation (from dotfiles module)
//! - UI: progress reporting and prompts (from ui module)

pub mod backup;
pub mod bashrc;
pub mod restore;

pub use backup::{BackupOperation, BackupOptions};
pub use bashrc::BashrcRestorer;
pub use restore::{RestoreOperation, RestoreOptions, RestoreOutcome};

use crate::config::TuxSyncConfig;
use crate::exec::CommandRunner;
use crate::ui::Prompter;

/// Everything an operation needs from the outside world
pub struct Context<'a> {
    pub config: &'a TuxSyncConfig,
    pub runner: &'a dyn CommandRunner,
    pub prompter: &'a dyn Prompter,
}
