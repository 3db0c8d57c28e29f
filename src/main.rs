//! TuxSync - Profile Sync for Linux Users
//!
//! Backs up a machine's user-installed packages and shell configuration to a
//! storage backend, and restores them elsewhere through an external installer.

use std::panic::{self, AssertUnwindSafe};

use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod dotfiles;
mod error;
mod exec;
mod installer;
mod operations;
mod progress;
mod scanner;
mod storage;
mod temp;
mod ui;
mod validation;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};
use config::TuxSyncConfig;
use error::{Result, TuxSyncError};
use exec::SystemRunner;
use operations::{Context, RestoreOutcome};
use ui::TerminalPrompter;

const LOG_ENV: &str = "TUXSYNC_LOG";

/// Route `tracing` output to stderr, filtered by `TUXSYNC_LOG`
fn init_logging(verbose: bool) {
    let default = if verbose { "tuxsync=debug" } else { "tuxsync=warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the selected command, mapping its outcome to an exit code
fn dispatch(cli: Cli, config: &TuxSyncConfig) -> Result<i32> {
    let runner = SystemRunner;
    let prompter = TerminalPrompter;
    let ctx = Context {
        config,
        runner: &runner,
        prompter: &prompter,
    };

    match cli.command {
        Commands::Backup(args) => commands::backup::run(args, &ctx).map(|()| 0),
        Commands::Restore(args) => commands::restore::run(args, &ctx).map(|outcome| match outcome {
            RestoreOutcome::Done => 0,
            RestoreOutcome::Warn => 1,
        }),
        Commands::List(args) => commands::list::run(&args, &ctx).map(|()| 0),
        Commands::Version => commands::version::run(config).map(|()| 0),
        Commands::Completions(args) => commands::completions::run(&args).map(|()| 0),
    }
}

fn report(error: &TuxSyncError) {
    eprintln!("Error: {error}");
    if let Some(help) = error.help() {
        eprintln!("  help: {help}");
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = TuxSyncConfig::from_env();
    tracing::debug!(?config, "configuration loaded");

    let code = match panic::catch_unwind(AssertUnwindSafe(|| dispatch(cli, &config))) {
        Ok(Ok(code)) => code,
        Ok(Err(e)) => {
            tracing::error!(error = %e, "command failed");
            report(&e);
            1
        }
        Err(_) => {
            eprintln!("Error: TuxSync stopped unexpectedly");
            1
        }
    };

    std::process::exit(code);
}
