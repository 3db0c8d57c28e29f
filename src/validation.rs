//! Sanitization of user-supplied identifiers
//!
//! Both checks run before any network call so that malformed input never
//! reaches `gh`, `curl` or a shell.

use url::Url;

use crate::error::Result;
use crate::error::validation::{invalid_backup_id, invalid_url};

const BACKUP_ID_MIN_LEN: usize = 8;
const BACKUP_ID_MAX_LEN: usize = 64;

/// Trimmed backup ID, accepted only if 8-64 ASCII alphanumeric characters
pub fn sanitize_backup_id(raw: &str) -> Result<String> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(invalid_backup_id(raw, "Backup ID cannot be empty."));
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid_backup_id(
            id,
            "Only letters and digits are allowed.",
        ));
    }
    if !(BACKUP_ID_MIN_LEN..=BACKUP_ID_MAX_LEN).contains(&id.len()) {
        return Err(invalid_backup_id(
            id,
            format!("Expected {BACKUP_ID_MIN_LEN} to {BACKUP_ID_MAX_LEN} characters."),
        ));
    }
    Ok(id.to_string())
}

/// Trimmed server URL, accepted only for `http`/`https` with a host
pub fn sanitize_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid_url(raw));
    }
    let parsed = Url::parse(trimmed).map_err(|_| invalid_url(trimmed))?;
    let has_host = parsed.host_str().is_some_and(|h| !h.is_empty());
    if !matches!(parsed.scheme(), "http" | "https") || !has_host {
        return Err(invalid_url(trimmed));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TuxSyncError;

    #[test]
    fn test_backup_id_accepts_alphanumeric_in_range() {
        for id in ["abcd1234", "ABCDEFGH", &"a".repeat(64), "0a1b2c3d4e5f67890a1b"] {
            assert_eq!(sanitize_backup_id(id).unwrap(), id);
        }
        assert_eq!(sanitize_backup_id("  abcd1234\n").unwrap(), "abcd1234");
    }

    #[test]
    fn test_backup_id_rejects_length_out_of_range() {
        for len in [1, 7, 65, 200] {
            let id = "x".repeat(len);
            assert!(sanitize_backup_id(&id).is_err(), "length {len} accepted");
        }
    }

    #[test]
    fn test_backup_id_rejects_shell_metacharacters() {
        for meta in [";", "|", "&", "$", "`", "(", ")", "<", ">", "'", "\"", " ", "\\", "*", "-"] {
            let id = format!("abcd{meta}1234");
            let err = sanitize_backup_id(&id).unwrap_err();
            assert!(matches!(err, TuxSyncError::InvalidBackupId { .. }), "{id}");
        }
    }

    #[test]
    fn test_backup_id_rejects_empty() {
        assert!(sanitize_backup_id("").is_err());
        assert!(sanitize_backup_id("   ").is_err());
    }

    #[test]
    fn test_backup_id_rejects_non_ascii() {
        assert!(sanitize_backup_id("abcdéfgh1").is_err());
    }

    #[test]
    fn test_url_accepts_http_and_https() {
        for url in [
            "http://localhost:8080",
            "https://backups.example.com",
            "https://backups.example.com/tuxsync/",
            "http://10.0.0.2",
        ] {
            assert_eq!(sanitize_url(url).unwrap(), url);
        }
    }

    #[test]
    fn test_url_rejects_malformed() {
        for url in [
            "",
            "   ",
            "backups.example.com",
            "ftp://backups.example.com",
            "file:///etc/passwd",
            "https://",
            "javascript:alert(1)",
        ] {
            let err = sanitize_url(url).unwrap_err();
            assert!(matches!(err, TuxSyncError::InvalidUrl { .. }), "{url}");
        }
    }
}
