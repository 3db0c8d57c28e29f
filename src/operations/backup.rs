//! Backup workflow
//!
//! Phases run strictly in order:
//! 1. Scan the system
//! 2. Optionally delegate dotfiles to chezmoi (never fails the backup)
//! 3. Select a storage backend: flag, then interactive choice
//! 4. Persist through the backend; success requires its explicit flag

use crate::dotfiles::ensure_chezmoi;
use crate::error::storage::{backend, cancelled};
use crate::error::{Result, TuxSyncError};
use crate::scanner::{ScanResult, Scanner};
use crate::storage::{BackupResult, StorageProvider, StorageTarget};
use crate::ui;
use crate::validation::sanitize_url;

use super::Context;

const STORAGE_CHOICES: [&str; 2] = ["GitHub Gist (recommended)", "Custom Server"];

/// Options for backup
#[derive(Debug, Clone, Default)]
pub struct BackupOptions {
    /// Backend chosen on the command line, if any
    pub target: Option<StorageTarget>,
    pub non_interactive: bool,
    pub use_chezmoi: bool,
    pub chezmoi_repo: Option<String>,
}

/// Main orchestrator for backup
pub struct BackupOperation<'a> {
    ctx: &'a Context<'a>,
    scanner: &'a dyn Scanner,
    storage: &'a dyn StorageProvider,
}

impl<'a> BackupOperation<'a> {
    pub fn new(
        ctx: &'a Context<'a>,
        scanner: &'a dyn Scanner,
        storage: &'a dyn StorageProvider,
    ) -> Self {
        Self {
            ctx,
            scanner,
            storage,
        }
    }

    /// Run all phases, returning the successful save result
    pub fn execute(&self, options: &BackupOptions) -> Result<BackupResult> {
        tracing::debug!(?options, "backup started");
        ui::heading("Starting Backup...");

        let scan = self.scan(options)?;
        print_scan_summary(&scan, options.use_chezmoi);

        if options.use_chezmoi {
            match self.delegate_dotfiles(options) {
                Ok(true) => {}
                Ok(false) => ui::warn("Skipping chezmoi integration"),
                Err(e) => {
                    tracing::warn!(error = %e, "dotfile delegation failed");
                    ui::warn(&format!("Chezmoi integration failed: {e}"));
                    ui::hint("Continuing with package backup only");
                }
            }
        }

        let target = self.select_storage(options)?;
        tracing::info!(?target, "storage selected");
        let storage = self.storage.open(&target)?;
        storage.prepare()?;

        let result = storage.save(&scan)?;
        if !result.success {
            let reason = result.error.unwrap_or_else(|| "unknown error".to_string());
            ui::failure(&format!("Backup failed: {reason}"));
            return Err(backend(reason));
        }

        print_restore_command(&result);
        Ok(result)
    }

    fn scan(&self, options: &BackupOptions) -> Result<ScanResult> {
        let scan = self.scanner.scan()?;
        if scan.packages.is_empty() {
            ui::warn("Warning: No packages found to backup");
            if options.non_interactive || !self.ctx.prompter.confirm("Continue anyway?", false)? {
                ui::failure("Backup cancelled");
                return Err(cancelled("Backup"));
            }
        }
        Ok(scan)
    }

    /// Returns whether chezmoi handled the dotfiles
    fn delegate_dotfiles(&self, options: &BackupOptions) -> Result<bool> {
        let manager = ensure_chezmoi(
            self.ctx.runner,
            self.ctx.prompter,
            !options.non_interactive,
        )?;

        ui::step("Managing dotfiles with chezmoi...");
        if let Some(repo) = &options.chezmoi_repo {
            let pushed = manager.init_repo(repo) && manager.git_push();
            if pushed {
                ui::success(&format!("Dotfiles backed up to {repo}"));
            }
            return Ok(pushed);
        }

        match manager.source_dir() {
            Some(dir) => {
                ui::success(&format!("Using existing chezmoi repo at {}", dir.display()));
                Ok(manager.git_push())
            }
            None => {
                ui::warn("No chezmoi source directory found");
                ui::hint("Run 'chezmoi init <repo>' manually or use --chezmoi-repo");
                Ok(false)
            }
        }
    }

    fn select_storage(&self, options: &BackupOptions) -> Result<StorageTarget> {
        if let Some(target) = &options.target {
            return Ok(target.clone());
        }
        if options.non_interactive {
            ui::failure("--github or --server required in non-interactive mode");
            return Err(TuxSyncError::StorageSelectionRequired);
        }

        let prompter = self.ctx.prompter;
        match prompter.choose("Where would you like to store your backup?", &STORAGE_CHOICES)? {
            Some(0) => Ok(StorageTarget::Gist),
            Some(1) => {
                let Some(url) = prompter.input("Enter your server URL", "https://your-server.com")?
                else {
                    ui::failure("Server URL required");
                    return Err(cancelled("Backup"));
                };
                Ok(StorageTarget::Server(sanitize_url(&url)?))
            }
            _ => {
                ui::failure("Backup cancelled");
                Err(cancelled("Backup"))
            }
        }
    }
}

fn print_scan_summary(scan: &ScanResult, use_chezmoi: bool) {
    let mark = |present: bool| if present { "✓" } else { "✗" };
    println!();
    ui::heading("Scan Summary:");
    ui::field(
        "Distro:",
        format!("{} {}", scan.distro, scan.distro_version),
    );
    ui::field("Packages:", scan.packages.len());
    ui::field("Bashrc:", mark(scan.bashrc_content.is_some()));
    ui::field("Chezmoi:", mark(use_chezmoi));
    println!();
}

fn print_restore_command(result: &BackupResult) {
    println!();
    ui::success("Backup complete!");
    if let Some(id) = &result.backup_id {
        ui::field("Backup ID:", id);
    }
    if let Some(command) = &result.restore_command {
        println!();
        ui::heading("To restore on a new machine, run:");
        println!("  {command}");
    }
    println!();
}
