//! `/etc/os-release` parsing

use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsRelease {
    pub id: String,
    pub version_id: String,
}

impl OsRelease {
    /// Read the file, falling back to `linux`/`unknown` when absent
    pub fn read(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "os-release unavailable");
                Self::parse("")
            }
        }
    }

    pub fn parse(text: &str) -> Self {
        let mut id = None;
        let mut version_id = None;
        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').trim_matches('\'').to_string();
            match key.trim() {
                "ID" => id = Some(value),
                "VERSION_ID" => version_id = Some(value),
                _ => {}
            }
        }
        Self {
            id: id.filter(|v| !v.is_empty()).unwrap_or_else(|| "linux".to_string()),
            version_id: version_id
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}
