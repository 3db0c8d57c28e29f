//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - backup: Backup command arguments
//! - restore: Restore command arguments
//! - list: List command arguments
//! - completions: Completions command arguments

pub mod backup;
pub mod completions;
pub mod list;
pub mod restore;

pub use backup::BackupArgs;
pub use completions::CompletionsArgs;
pub use list::ListArgs;
pub use restore::RestoreArgs;

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

/// TuxSync - Profile Sync for Linux Users
///
/// Back up installed packages and shell configuration, and restore them on another machine.
#[derive(Parser, Debug)]
#[command(
    name = "tuxsync",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Profile sync for Linux users",
    long_about = "TuxSync backs up your installed packages and ~/.bashrc to a GitHub Gist or a \
                  custom server, and restores them on any distro through the TuxMate installer.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  tuxsync backup --github                   \x1b[90m# Back up to a private Gist\x1b[0m\n   \
                  tuxsync backup --server https://nas.local \x1b[90m# Back up to your own server\x1b[0m\n   \
                  tuxsync restore <BACKUP_ID>               \x1b[90m# Restore from a Gist\x1b[0m\n   \
                  tuxsync restore <BACKUP_ID> --dry-run     \x1b[90m# Show what would be restored\x1b[0m\n   \
                  tuxsync list                              \x1b[90m# List your backups\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Back up installed packages and configuration
    Backup(BackupArgs),

    /// Restore packages and configuration from a backup
    Restore(RestoreArgs),

    /// List available backups
    List(ListArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
