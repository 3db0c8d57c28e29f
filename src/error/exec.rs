//! External process errors

use super::{ExecFailure, TuxSyncError};

/// Creates a command failure after `attempts` tries
pub fn command_failed(
    command: impl Into<String>,
    attempts: u32,
    cause: ExecFailure,
) -> TuxSyncError {
    TuxSyncError::CommandFailed {
        command: command.into(),
        attempts,
        cause,
    }
}

/// Creates a single-attempt spawn failure
pub fn spawn_failed(command: impl Into<String>, reason: impl std::fmt::Display) -> TuxSyncError {
    command_failed(command, 1, ExecFailure::Spawn(reason.to_string()))
}

/// Creates an executor acquisition failure
pub fn executor_unavailable(
    name: impl Into<String>,
    instructions: impl Into<String>,
) -> TuxSyncError {
    TuxSyncError::ExecutorUnavailable {
        name: name.into(),
        instructions: instructions.into(),
    }
}
