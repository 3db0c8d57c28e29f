//! Backup persistence
//!
//! A [`Storage`] saves a [`ScanResult`] and loads it back as
//! [`BackupMetadata`] plus optional shell config. Two backends exist:
//! - [`GistStorage`]: private GitHub Gists through the `gh` CLI
//! - [`ServerStorage`]: a custom HTTP server through `curl`

mod gist;
mod server;

pub use gist::GistStorage;
pub use server::ServerStorage;

use serde::{Deserialize, Serialize};

use crate::config::TuxSyncConfig;
use crate::error::Result;
use crate::error::storage::backend;
use crate::exec::CommandRunner;
use crate::scanner::ScanResult;

/// Gist file holding [`BackupMetadata`] as YAML
pub const METADATA_FILE: &str = "tuxsync.yaml";
/// Gist file holding the shell config
pub const BASHRC_FILE: &str = "bashrc";

/// What a stored backup describes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupMetadata {
    pub created_at: String,
    pub distro: String,
    pub distro_version: String,
    pub package_manager: String,
    pub packages: Vec<String>,
    pub package_count: usize,
    pub has_bashrc: bool,
}

impl BackupMetadata {
    /// Metadata for `scan`, stamped with the current UTC time
    pub fn from_scan(scan: &ScanResult) -> Self {
        Self {
            created_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            distro: scan.distro.clone(),
            distro_version: scan.distro_version.clone(),
            package_manager: scan.package_manager.clone(),
            packages: scan.packages.clone(),
            package_count: scan.packages.len(),
            has_bashrc: scan.bashrc_content.is_some(),
        }
    }

    /// Reject metadata whose count disagrees with its package list
    pub fn validate(self) -> Result<Self> {
        if self.package_count != self.packages.len() {
            return Err(backend(format!(
                "backup metadata lists {} packages but declares {}",
                self.packages.len(),
                self.package_count
            )));
        }
        Ok(self)
    }

    /// One-line description used for gist titles and listings
    pub fn describe(&self) -> String {
        format!(
            "TuxSync Backup - {} {} ({} packages)",
            self.distro, self.distro_version, self.package_count
        )
    }
}

/// Outcome reported by a backend's save
///
/// `error` is set exactly when `success` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupResult {
    pub success: bool,
    pub backup_id: Option<String>,
    pub restore_command: Option<String>,
    pub error: Option<String>,
}

impl BackupResult {
    pub fn saved(backup_id: impl Into<String>, restore_command: impl Into<String>) -> Self {
        Self {
            success: true,
            backup_id: Some(backup_id.into()),
            restore_command: Some(restore_command.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            backup_id: None,
            restore_command: None,
            error: Some(error.into()),
        }
    }
}

/// Entry printed by `list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupSummary {
    pub id: String,
    pub description: String,
}

/// A loaded backup: metadata and the stored shell config, if any
pub type LoadedBackup = (BackupMetadata, Option<String>);

/// Storage contract
pub trait Storage {
    /// Make the backend usable (e.g. authenticate); no-op by default
    fn prepare(&self) -> Result<()> {
        Ok(())
    }

    fn save(&self, scan: &ScanResult) -> Result<BackupResult>;

    fn load(&self, backup_id: &str) -> Result<LoadedBackup>;

    fn list(&self) -> Result<Vec<BackupSummary>>;
}

/// Which backend a command targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageTarget {
    Gist,
    Server(String),
}

impl StorageTarget {
    /// `Server` when a URL is given, otherwise `Gist`
    pub fn from_server_url(server_url: Option<&str>) -> Self {
        server_url.map_or(StorageTarget::Gist, |url| StorageTarget::Server(url.to_string()))
    }
}

/// Opens a backend for a target
pub trait StorageProvider {
    fn open<'s>(&'s self, target: &StorageTarget) -> Result<Box<dyn Storage + 's>>;
}

/// Opens the real backends
pub struct BackendProvider<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a TuxSyncConfig,
}

impl<'a> BackendProvider<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &'a TuxSyncConfig) -> Self {
        Self { runner, config }
    }
}

impl StorageProvider for BackendProvider<'_> {
    fn open<'s>(&'s self, target: &StorageTarget) -> Result<Box<dyn Storage + 's>> {
        Ok(match target {
            StorageTarget::Gist => Box::new(GistStorage::new(self.runner, self.config)),
            StorageTarget::Server(url) => {
                Box::new(ServerStorage::new(self.runner, self.config, url.clone()))
            }
        })
    }
}
