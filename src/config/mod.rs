//! Process-wide tunables for TuxSync
//!
//! Built once in `main` from `TUXSYNC_*` environment variables and passed by
//! reference into every component. Read-only after construction.

use std::path::PathBuf;
use std::time::Duration;

use crate::exec::RetryPolicy;
use crate::temp::temp_dir_base;

const ENV_GITHUB_REPO: &str = "TUXSYNC_GITHUB_REPO";
const ENV_TUXMATE_REPO: &str = "TUXSYNC_TUXMATE_REPO";
const ENV_TIMEOUT: &str = "TUXSYNC_TIMEOUT";
const ENV_RETRY_ATTEMPTS: &str = "TUXSYNC_RETRY_ATTEMPTS";
const ENV_BACKOFF_BASE: &str = "TUXSYNC_BACKOFF_BASE";
const ENV_BATCH_SIZE: &str = "TUXSYNC_BATCH_SIZE";
const ENV_TMP_DIR: &str = "TUXSYNC_TMP_DIR";

/// TuxSync configuration with sensible defaults
#[derive(Debug, Clone, PartialEq)]
pub struct TuxSyncConfig {
    /// Repository hosting `restore.sh`
    pub github_repo: String,
    /// Repository publishing the `tuxmate` executor
    pub tuxmate_repo: String,
    /// Upper bound for each network-facing command attempt
    pub network_timeout: Duration,
    /// Attempts for retry-wrapped commands, at least 1
    pub retry_attempts: u32,
    /// Exponential backoff base, greater than 1
    pub retry_backoff_base: f64,
    /// Packages per direct executor invocation, at least 1
    pub package_batch_size: usize,
    /// Maximum gists fetched by `list`
    pub gist_list_limit: usize,
    /// Directory for the executor artifact and the package manifest
    pub tmp_dir: PathBuf,
}

impl Default for TuxSyncConfig {
    fn default() -> Self {
        Self {
            github_repo: "Gururagavendra/tuxsync".to_string(),
            tuxmate_repo: "Gururagavendra/tuxmate".to_string(),
            network_timeout: Duration::from_secs(30),
            retry_attempts: 3,
            retry_backoff_base: 2.0,
            package_batch_size: 20,
            gist_list_limit: 20,
            tmp_dir: temp_dir_base(),
        }
    }
}

impl TuxSyncConfig {
    /// Load config from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load config from an arbitrary variable lookup
    ///
    /// Unparseable or out-of-range values are ignored and the default kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(repo) = non_empty(lookup(ENV_GITHUB_REPO)) {
            config.github_repo = repo;
        }
        if let Some(repo) = non_empty(lookup(ENV_TUXMATE_REPO)) {
            config.tuxmate_repo = repo;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, ENV_TIMEOUT, |v| *v > 0) {
            config.network_timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = parse_var::<u32>(&lookup, ENV_RETRY_ATTEMPTS, |v| *v >= 1) {
            config.retry_attempts = attempts;
        }
        if let Some(base) = parse_var::<f64>(&lookup, ENV_BACKOFF_BASE, |v| *v > 1.0) {
            config.retry_backoff_base = base;
        }
        if let Some(size) = parse_var::<usize>(&lookup, ENV_BATCH_SIZE, |v| *v >= 1) {
            config.package_batch_size = size;
        }
        if let Some(dir) = non_empty(lookup(ENV_TMP_DIR)) {
            let dir = PathBuf::from(dir);
            if dir.is_absolute() {
                config.tmp_dir = dir;
            } else {
                tracing::warn!(var = ENV_TMP_DIR, "ignoring relative temporary directory");
            }
        }

        config
    }

    /// Retry policy for network-facing commands
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_attempts,
            self.network_timeout,
            self.retry_backoff_base,
        )
    }

    /// URL of the restore script referenced by printed restore commands
    pub fn restore_script_url(&self) -> String {
        format!(
            "https://raw.githubusercontent.com/{}/main/restore.sh",
            self.github_repo
        )
    }

    /// Latest release artifact of the executor
    pub fn tuxmate_release_url(&self) -> String {
        format!(
            "https://github.com/{}/releases/latest/download/tuxmate",
            self.tuxmate_repo
        )
    }

    /// Raw-content fallback for the executor
    pub fn tuxmate_fallback_url(&self) -> String {
        format!(
            "https://raw.githubusercontent.com/{}/main/tuxmate",
            self.tuxmate_repo
        )
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    valid: impl Fn(&T) -> bool,
) -> Option<T> {
    let raw = non_empty(lookup(key))?;
    match raw.parse::<T>() {
        Ok(value) if valid(&value) => Some(value),
        _ => {
            tracing::warn!(var = key, value = %raw, "ignoring invalid configuration value");
            None
        }
    }
}
