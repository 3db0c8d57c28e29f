use clap::Parser;
use clap_complete::Shell;

use crate::error::{Result, TuxSyncError};

/// Arguments for the completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Load bash completions from ~/.bashrc (restored along with your backup):\n    \
                  echo 'eval \"$(tuxsync completions bash)\"' >> ~/.bashrc\n\n\
                  Generate zsh completions:\n    tuxsync completions zsh > ~/.zfunc/_tuxsync\n\n\
                  Generate fish completions:\n    tuxsync completions fish > ~/.config/fish/completions/tuxsync.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(value_name = "SHELL")]
    pub shell: String,
}

impl CompletionsArgs {
    /// The requested shell, matched case-insensitively
    ///
    /// Unknown names are a `ParseFailed` error rather than a usage error, so
    /// they exit like every other TuxSync failure.
    pub fn target_shell(&self) -> Result<Shell> {
        match self.shell.to_lowercase().as_str() {
            "bash" => Ok(Shell::Bash),
            "elvish" => Ok(Shell::Elvish),
            "fish" => Ok(Shell::Fish),
            "powershell" | "pwsh" => Ok(Shell::PowerShell),
            "zsh" => Ok(Shell::Zsh),
            _ => Err(TuxSyncError::ParseFailed {
                what: format!("shell '{}'", self.shell),
                reason: "supported shells are bash, elvish, fish, powershell, zsh".to_string(),
            }),
        }
    }
}
