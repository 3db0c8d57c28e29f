use clap::Parser;

/// Arguments for the backup command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Back up interactively:\n    tuxsync backup\n\n\
                   Back up to a private GitHub Gist:\n    tuxsync backup --github\n\n\
                   Back up to a custom server from a script:\n    \
                   tuxsync backup --server https://nas.local --non-interactive\n\n\
                   Back up dotfiles with chezmoi too:\n    \
                   tuxsync backup --github --use-chezmoi --chezmoi-repo user/dotfiles")]
pub struct BackupArgs {
    /// Skip backing up ~/.bashrc
    #[arg(long)]
    pub no_bashrc: bool,

    /// Store the backup in a private GitHub Gist
    #[arg(long, conflicts_with = "server")]
    pub github: bool,

    /// Store the backup on a custom server
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// Run without interactive prompts (requires --github or --server)
    #[arg(long)]
    pub non_interactive: bool,

    /// Manage dotfiles with chezmoi
    #[arg(long)]
    pub use_chezmoi: bool,

    /// GitHub repository for chezmoi dotfiles (e.g., user/dotfiles)
    #[arg(long, value_name = "REPO")]
    pub chezmoi_repo: Option<String>,
}
