//! List command implementation
//!
//! Lists the backups held by the selected storage backend.

use crate::cli::ListArgs;
use crate::error::Result;
use crate::operations::Context;
use crate::storage::{BackendProvider, BackupSummary, StorageProvider, StorageTarget};
use crate::ui;
use crate::validation::sanitize_url;

/// Run list command
pub fn run(args: &ListArgs, ctx: &Context<'_>) -> Result<()> {
    ui::banner();
    let provider = BackendProvider::new(ctx.runner, ctx.config);
    list_backups(&provider, args)
}

fn list_backups(provider: &dyn StorageProvider, args: &ListArgs) -> Result<()> {
    let server = args.server.as_deref().map(sanitize_url).transpose()?;
    let target = StorageTarget::from_server_url(server.as_deref());

    let storage = provider.open(&target)?;
    storage.prepare()?;
    match &target {
        StorageTarget::Gist => ui::step("Fetching your TuxSync backups from GitHub..."),
        StorageTarget::Server(url) => ui::step(&format!("Fetching your TuxSync backups from {url}...")),
    }

    let backups = storage.list()?;
    print_backups(&backups);
    Ok(())
}

fn print_backups(backups: &[BackupSummary]) {
    println!();
    if backups.is_empty() {
        ui::warn("No TuxSync backups found");
        ui::hint("Create one with: tuxsync backup");
        return;
    }

    ui::heading(&format!("Your TuxSync Backups ({}):", backups.len()));
    for backup in backups {
        ui::field(&backup.id, &backup.description);
    }
    println!();
    ui::hint("Restore with: tuxsync restore <BACKUP_ID>");
}
