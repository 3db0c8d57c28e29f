//! Storage backend and scanner errors

use super::TuxSyncError;

/// Creates a backend-reported storage error
pub fn backend(message: impl Into<String>) -> TuxSyncError {
    TuxSyncError::Storage {
        message: message.into(),
    }
}

/// Creates a scan failure
pub fn scan_failed(reason: impl Into<String>) -> TuxSyncError {
    TuxSyncError::ScanFailed {
        reason: reason.into(),
    }
}

/// Creates a cancellation error for a user-declined operation
pub fn cancelled(operation: impl Into<String>) -> TuxSyncError {
    TuxSyncError::Cancelled {
        operation: operation.into(),
    }
}
