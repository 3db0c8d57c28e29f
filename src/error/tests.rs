//! Error type tests
//!
//! Tests for TuxSyncError and its conversions.

use std::time::Duration;

use miette::Diagnostic;

use super::exec::{command_failed, executor_unavailable, spawn_failed};
use super::fs::write_failed;
use super::storage::{backend, cancelled};
use super::validation::{invalid_backup_id, invalid_url};
use super::{ExecFailure, TuxSyncError};

macro_rules! test_error_contains {
    ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
        #[test]
        fn $test_name() {
            let err = $err;
            let error_string = err.to_string();
            $(
                assert!(error_string.contains($contains),
                    "Error message should contain '{}', got: {}",
                    $contains,
                    error_string
                );
            )+
        }
    };
}

#[test]
fn test_error_code() {
    let err = invalid_url("ftp://nope");
    assert_eq!(
        err.code().map(|c| c.to_string()),
        Some("tuxsync::validation::url".to_string())
    );
}

#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: TuxSyncError = io_err.into();
    assert!(matches!(err, TuxSyncError::Io { .. }));
}

#[test]
fn test_yaml_error_conversion() {
    let parse_result: std::result::Result<serde_yaml::Value, _> =
        serde_yaml::from_str("invalid: yaml: content: [unclosed");
    let err: TuxSyncError = parse_result.unwrap_err().into();
    assert!(matches!(err, TuxSyncError::ParseFailed { .. }));
}

#[test]
fn test_exec_failure_accessor() {
    let err = command_failed("curl", 3, ExecFailure::Timeout(Duration::from_secs(30)));
    assert_eq!(
        err.exec_failure(),
        Some(&ExecFailure::Timeout(Duration::from_secs(30)))
    );
    assert!(backend("boom").exec_failure().is_none());
}

test_error_contains!(
    test_command_failed_reports_attempts,
    command_failed("curl -fsSL", 3, ExecFailure::Timeout(Duration::from_secs(30))),
    "curl -fsSL",
    "3 attempt(s)",
    "timed out after 30s"
);

test_error_contains!(
    test_non_zero_exit_includes_stderr,
    command_failed(
        "git push",
        1,
        ExecFailure::NonZeroExit {
            code: Some(128),
            stderr: "fatal: no upstream\n".to_string(),
        }
    ),
    "exited with status 128: fatal: no upstream"
);

test_error_contains!(
    test_spawn_failed,
    spawn_failed("gh", "No such file or directory"),
    "could not be started",
    "1 attempt(s)"
);

test_error_contains!(
    test_executor_unavailable_carries_instructions,
    executor_unavailable("tuxmate", "  chmod +x /usr/local/bin/tuxmate"),
    "install it manually",
    "chmod +x /usr/local/bin/tuxmate"
);

test_error_contains!(
    test_invalid_backup_id,
    invalid_backup_id("abc", "Expected alphanumeric string (8-64 characters)."),
    "Invalid backup ID format: 'abc'"
);

test_error_contains!(test_cancelled, cancelled("Backup"), "Backup cancelled");

test_error_contains!(
    test_write_failed,
    write_failed(std::path::Path::new("/root/.bashrc"), "permission denied"),
    "/root/.bashrc",
    "permission denied"
);

test_error_contains!(
    test_storage_selection_required,
    TuxSyncError::StorageSelectionRequired,
    "non-interactive"
);
