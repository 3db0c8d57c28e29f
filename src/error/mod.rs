//! Error types and handling for TuxSync
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`validation`]: Rejected user input (backup IDs, URLs)
//! - [`exec`]: External process and executor acquisition errors
//! - [`storage`]: Storage backend and scanner errors
//! - [`fs`]: File system errors

pub mod exec;
pub mod fs;
pub mod storage;
pub mod validation;

#[cfg(test)]
mod tests;

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

/// Why a single attempt at running an external command did not succeed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecFailure {
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("exited with status {}{}", exit_code(.code), stderr_suffix(.stderr))]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("could not be started: {0}")]
    Spawn(String),
}

fn exit_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// Main error type for TuxSync operations
#[derive(Error, Diagnostic, Debug)]
pub enum TuxSyncError {
    // Validation errors
    #[error("Invalid backup ID format: '{id}'. {reason}")]
    #[diagnostic(
        code(tuxsync::validation::backup_id),
        help("Backup IDs are the alphanumeric identifiers printed by 'tuxsync backup'")
    )]
    InvalidBackupId { id: String, reason: String },

    #[error("Invalid URL format: '{url}'")]
    #[diagnostic(
        code(tuxsync::validation::url),
        help("Use a full http:// or https:// URL, e.g. https://backups.example.com")
    )]
    InvalidUrl { url: String },

    // Execution errors
    #[error("Command '{command}' failed after {attempts} attempt(s): {cause}")]
    #[diagnostic(code(tuxsync::exec::command_failed))]
    CommandFailed {
        command: String,
        attempts: u32,
        cause: ExecFailure,
    },

    #[error("Failed to acquire {name}. Please install it manually:\n{instructions}")]
    #[diagnostic(code(tuxsync::exec::executor_unavailable))]
    ExecutorUnavailable { name: String, instructions: String },

    // Storage errors
    #[error("Storage error: {message}")]
    #[diagnostic(code(tuxsync::storage::backend))]
    Storage { message: String },

    #[error("--github or --server is required in non-interactive mode")]
    #[diagnostic(
        code(tuxsync::storage::selection_required),
        help("Pass --github to use a GitHub Gist or --server URL for a custom server")
    )]
    StorageSelectionRequired,

    #[error("Package scan failed: {reason}")]
    #[diagnostic(code(tuxsync::scan::failed))]
    ScanFailed { reason: String },

    // Interaction errors
    #[error("{operation} cancelled")]
    #[diagnostic(code(tuxsync::cancelled))]
    Cancelled { operation: String },

    #[error("Prompt failed: {message}")]
    #[diagnostic(
        code(tuxsync::prompt::failed),
        help("Run in a terminal, or pass the flags that make the prompt unnecessary")
    )]
    Prompt { message: String },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(tuxsync::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(tuxsync::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Failed to parse {what}: {reason}")]
    #[diagnostic(code(tuxsync::parse_failed))]
    ParseFailed { what: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(tuxsync::fs::io_error))]
    Io { message: String },
}

impl TuxSyncError {
    /// The per-attempt failure, when this error came from running a command
    pub fn exec_failure(&self) -> Option<&ExecFailure> {
        match self {
            TuxSyncError::CommandFailed { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TuxSyncError {
    fn from(err: std::io::Error) -> Self {
        TuxSyncError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for TuxSyncError {
    fn from(err: serde_yaml::Error) -> Self {
        TuxSyncError::ParseFailed {
            what: "YAML".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for TuxSyncError {
    fn from(err: serde_json::Error) -> Self {
        TuxSyncError::ParseFailed {
            what: "JSON".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for TuxSyncError {
    fn from(err: inquire::InquireError) -> Self {
        TuxSyncError::Prompt {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, TuxSyncError>;
