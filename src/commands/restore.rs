//! Restore command implementation

use crate::cli::RestoreArgs;
use crate::error::Result;
use crate::operations::{BashrcRestorer, Context, RestoreOperation, RestoreOptions, RestoreOutcome};
use crate::storage::BackendProvider;
use crate::ui;

/// Run restore command
pub fn run(args: RestoreArgs, ctx: &Context<'_>) -> Result<RestoreOutcome> {
    ui::banner();

    let options = RestoreOptions {
        backup_id: args.backup_id,
        server_url: args.server,
        dry_run: args.dry_run,
        skip_packages: args.skip_packages,
        skip_bashrc: args.skip_bashrc,
        merge_bashrc: args.merge_bashrc,
        use_chezmoi: args.use_chezmoi,
        chezmoi_repo: args.chezmoi_repo,
        yes: args.yes,
    };

    let provider = BackendProvider::new(ctx.runner, ctx.config);
    RestoreOperation::new(ctx, &provider, BashrcRestorer::for_home()).execute(&options)
}
