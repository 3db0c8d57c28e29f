//! Backup command implementation
//!
//! Turns CLI flags into [`BackupOptions`] and runs the backup against the
//! real scanner and storage backends.

use crate::cli::BackupArgs;
use crate::error::Result;
use crate::operations::{BackupOperation, BackupOptions, Context};
use crate::scanner::SystemScanner;
use crate::storage::{BackendProvider, StorageTarget};
use crate::ui;
use crate::validation::sanitize_url;

/// Run backup command
pub fn run(args: BackupArgs, ctx: &Context<'_>) -> Result<()> {
    ui::banner();

    let options = BackupOptions {
        target: storage_target(&args)?,
        non_interactive: args.non_interactive,
        use_chezmoi: args.use_chezmoi,
        chezmoi_repo: args.chezmoi_repo,
    };

    let scanner = SystemScanner::new(ctx.runner, !args.no_bashrc);
    let provider = BackendProvider::new(ctx.runner, ctx.config);
    BackupOperation::new(ctx, &scanner, &provider).execute(&options)?;
    Ok(())
}

/// Backend named by flags; `--server` wins over `--github`
fn storage_target(args: &BackupArgs) -> Result<Option<StorageTarget>> {
    if let Some(url) = &args.server {
        return Ok(Some(StorageTarget::Server(sanitize_url(url)?)));
    }
    Ok(args.github.then_some(StorageTarget::Gist))
}
