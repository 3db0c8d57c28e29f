//! Input validation errors

use super::TuxSyncError;

/// Creates an invalid backup ID error
pub fn invalid_backup_id(id: impl Into<String>, reason: impl Into<String>) -> TuxSyncError {
    TuxSyncError::InvalidBackupId {
        id: id.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid URL error
pub fn invalid_url(url: impl Into<String>) -> TuxSyncError {
    TuxSyncError::InvalidUrl { url: url.into() }
}
