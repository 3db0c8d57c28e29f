use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List backups stored in your GitHub Gists:\n    tuxsync list\n\n\
                  List backups on a custom server:\n    tuxsync list --server https://nas.local")]
pub struct ListArgs {
    /// Custom server URL (if not using GitHub)
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,
}
