use clap::Parser;

/// Arguments for the restore command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Restore from a GitHub Gist:\n    tuxsync restore <BACKUP_ID>\n\n\
                   Preview without changing anything:\n    tuxsync restore <BACKUP_ID> --dry-run\n\n\
                   Restore from a custom server without prompts:\n    \
                   tuxsync restore <BACKUP_ID> --server https://nas.local --yes\n\n\
                   Append to the current ~/.bashrc instead of replacing it:\n    \
                   tuxsync restore <BACKUP_ID> --merge-bashrc")]
pub struct RestoreArgs {
    /// Gist ID or backup identifier printed by the backup command
    #[arg(value_name = "BACKUP_ID")]
    pub backup_id: String,

    /// Custom server URL (if not using GitHub)
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// Show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Skip package installation
    #[arg(long)]
    pub skip_packages: bool,

    /// Skip .bashrc restoration
    #[arg(long)]
    pub skip_bashrc: bool,

    /// Merge .bashrc instead of replacing
    #[arg(long)]
    pub merge_bashrc: bool,

    /// Restore dotfiles using chezmoi
    #[arg(long)]
    pub use_chezmoi: bool,

    /// GitHub repository for chezmoi dotfiles (e.g., user/dotfiles)
    #[arg(long, value_name = "REPO")]
    pub chezmoi_repo: Option<String>,

    /// Skip confirmation prompts
    #[arg(long, short = 'y')]
    pub yes: bool,
}
