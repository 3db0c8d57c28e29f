//! Restore workflow
//!
//! Phases run strictly in order:
//! 1. Validate the backup ID and server URL before any network call
//! 2. Confirm, unless `--yes` or `--dry-run`
//! 3. Fetch metadata and shell config from storage
//! 4. Install packages (best-effort, failure demotes to [`RestoreOutcome::Warn`])
//! 5. Restore shell config (best-effort, same demotion)
//! 6. Apply chezmoi dotfiles, only after a clean restore; never escalated

use crate::dotfiles::ensure_chezmoi;
use crate::error::Result;
use crate::error::storage::cancelled;
use crate::exec::ExecutorResolver;
use crate::installer::PackageInstaller;
use crate::storage::{BackupMetadata, StorageProvider, StorageTarget};
use crate::ui;
use crate::validation::{sanitize_backup_id, sanitize_url};

use super::{BashrcRestorer, Context};

/// Options for restore
#[derive(Debug, Clone, Default)]
pub struct RestoreOptions {
    pub backup_id: String,
    pub server_url: Option<String>,
    pub dry_run: bool,
    pub skip_packages: bool,
    pub skip_bashrc: bool,
    pub merge_bashrc: bool,
    pub use_chezmoi: bool,
    pub chezmoi_repo: Option<String>,
    pub yes: bool,
}

/// How a restore that ran to completion ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Done,
    /// A best-effort phase failed; later phases still ran
    Warn,
}

/// Main orchestrator for restore
pub struct RestoreOperation<'a> {
    ctx: &'a Context<'a>,
    storage: &'a dyn StorageProvider,
    bashrc: Option<BashrcRestorer>,
}

impl<'a> RestoreOperation<'a> {
    pub fn new(
        ctx: &'a Context<'a>,
        storage: &'a dyn StorageProvider,
        bashrc: Option<BashrcRestorer>,
    ) -> Self {
        Self {
            ctx,
            storage,
            bashrc,
        }
    }

    pub fn execute(&self, options: &RestoreOptions) -> Result<RestoreOutcome> {
        let backup_id = sanitize_backup_id(&options.backup_id)?;
        let server_url = options
            .server_url
            .as_deref()
            .map(sanitize_url)
            .transpose()?;
        let target = StorageTarget::from_server_url(server_url.as_deref());
        tracing::info!(%backup_id, ?target, "restore started");

        if !options.yes && !options.dry_run {
            ui::warn(&format!("This will restore packages from backup: {backup_id}"));
            if !self.ctx.prompter.confirm("Continue with restore?", true)? {
                ui::failure("Restore cancelled");
                return Err(cancelled("Restore"));
            }
        }

        ui::heading("═══ TuxSync Restore ═══");
        let storage = self.storage.open(&target)?;
        storage.prepare()?;
        ui::step(&format!("Fetching backup: {backup_id}"));
        let (metadata, bashrc_content) = storage.load(&backup_id)?;
        print_backup_info(&metadata);

        let mut outcome = RestoreOutcome::Done;

        if !options.skip_packages && !metadata.packages.is_empty() {
            ui::heading(&format!("Restoring {} packages...", metadata.packages.len()));
            let resolver = ExecutorResolver::new(self.ctx.runner, self.ctx.config);
            let installer = PackageInstaller::new(self.ctx.runner, &resolver, self.ctx.config);
            if !installer.install(&metadata.packages, options.dry_run) {
                ui::warn("Some packages may have failed to install");
                outcome = RestoreOutcome::Warn;
            }
        }

        if metadata.has_bashrc && !options.skip_bashrc {
            match &bashrc_content {
                Some(_) if options.dry_run => ui::warn("DRY RUN - Would restore .bashrc"),
                Some(content) => {
                    if !self.restore_bashrc(content, options.merge_bashrc) {
                        outcome = RestoreOutcome::Warn;
                    }
                }
                None => {
                    tracing::warn!(%backup_id, "backup declares a .bashrc but none was fetched");
                    ui::warn("Backup includes a .bashrc, but it could not be retrieved");
                    outcome = RestoreOutcome::Warn;
                }
            }
        }

        match outcome {
            RestoreOutcome::Done => ui::success("Restore completed successfully!"),
            RestoreOutcome::Warn => ui::warn("Restore completed with warnings"),
        }

        let dotfiles_repo = options
            .chezmoi_repo
            .as_deref()
            .filter(|_| options.use_chezmoi && outcome == RestoreOutcome::Done);
        if let Some(repo) = dotfiles_repo {
            if let Err(e) = self.restore_dotfiles(repo, options) {
                tracing::warn!(error = %e, "dotfile restore failed");
                ui::warn(&format!("Chezmoi restore failed: {e}"));
                ui::hint("Package restore was successful, but dotfiles may need manual setup");
            }
        }

        Ok(outcome)
    }

    fn restore_bashrc(&self, content: &str, merge: bool) -> bool {
        let Some(restorer) = &self.bashrc else {
            ui::warn("Home directory unknown, .bashrc not restored");
            return false;
        };
        match restorer.restore(content, true, merge) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(path = %restorer.path().display(), error = %e, "shell config restore failed");
                ui::failure(&format!(".bashrc restore failed: {e}"));
                false
            }
        }
    }

    fn restore_dotfiles(&self, repo: &str, options: &RestoreOptions) -> Result<()> {
        ui::step("Restoring dotfiles with chezmoi...");
        let manager = ensure_chezmoi(self.ctx.runner, self.ctx.prompter, !options.yes)?;
        if !manager.init_repo(repo) {
            return Ok(());
        }
        if options.dry_run {
            ui::hint("Dry run - would apply dotfiles");
            manager.apply(true);
        } else if manager.apply(false) {
            ui::success("Dotfiles restored successfully");
        }
        Ok(())
    }
}

fn print_backup_info(metadata: &BackupMetadata) {
    println!();
    ui::heading("Backup Information:");
    ui::field("Created:", &metadata.created_at);
    ui::field(
        "Source:",
        format!("{} {}", metadata.distro, metadata.distro_version),
    );
    ui::field("Package Manager:", &metadata.package_manager);
    ui::field("Packages:", metadata.package_count);
    ui::field("Has .bashrc:", metadata.has_bashrc);
    println!();
}
