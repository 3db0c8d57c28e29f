//! Shell completions command

use clap::CommandFactory;

use crate::cli::{Cli, CompletionsArgs};
use crate::error::Result;

/// Generate shell completions on stdout
pub fn run(args: &CompletionsArgs) -> Result<()> {
    let shell = args.target_shell()?;
    let mut cmd = Cli::command();
    tracing::debug!(?shell, "generating completions");
    clap_complete::generate(shell, &mut cmd, "tuxsync", &mut std::io::stdout().lock());
    Ok(())
}
