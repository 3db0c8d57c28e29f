//! Custom server backend driven by `curl`
//!
//! Endpoints under `<server>/api/backups`:
//! - `POST /api/backups` with a [`BackupEnvelope`] body, answering `{"id": ...}`
//! - `GET /api/backups/<id>` answering a [`BackupEnvelope`]
//! - `GET /api/backups` answering a list of `{"id", "description"}`

use serde::{Deserialize, Serialize};

use super::{BackupMetadata, BackupResult, BackupSummary, LoadedBackup, Storage};
use crate::config::TuxSyncConfig;
use crate::error::Result;
use crate::error::storage::backend;
use crate::exec::{CommandRunner, CommandSpec, run_with_retry};
use crate::scanner::ScanResult;
use crate::ui;

/// Wire format of a stored backup
#[derive(Debug, Serialize, Deserialize)]
struct BackupEnvelope {
    metadata: BackupMetadata,
    #[serde(default)]
    bashrc: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedBackup {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ListedBackup {
    id: String,
    #[serde(default)]
    description: Option<String>,
}

pub struct ServerStorage<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a TuxSyncConfig,
    base_url: String,
}

impl<'a> ServerStorage<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &'a TuxSyncConfig, base_url: String) -> Self {
        Self {
            runner,
            config,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/backups{path}", self.base_url)
    }

    fn get(&self, url: String) -> Result<String> {
        let output = run_with_retry(
            self.runner,
            &CommandSpec::new("curl").args(["-fsSL", url.as_str()]).capture(),
            &self.config.retry_policy(),
        )?;
        Ok(output.stdout)
    }

    fn upload(&self, scan: &ScanResult) -> Result<String> {
        let envelope = BackupEnvelope {
            metadata: BackupMetadata::from_scan(scan),
            bashrc: scan.bashrc_content.clone(),
        };
        let body = tempfile::NamedTempFile::new_in(&self.config.tmp_dir)?;
        serde_json::to_writer(body.as_file(), &envelope)?;

        let command = CommandSpec::new("curl")
            .args([
                "-fsSL",
                "-X",
                "POST",
                "-H",
                "Content-Type: application/json",
                "--data-binary",
            ])
            .arg(format!("@{}", body.path().display()))
            .arg(self.endpoint(""))
            .capture()
            .timeout(self.config.network_timeout);
        // A POST that timed out may still have been stored, so it is sent once.
        let output = self.runner.run(&command)?;
        let created: CreatedBackup = serde_json::from_str(&output.stdout)?;
        Ok(created.id)
    }
}

impl Storage for ServerStorage<'_> {
    fn save(&self, scan: &ScanResult) -> Result<BackupResult> {
        ui::step(&format!("Uploading backup to {}...", self.base_url));
        match self.upload(scan) {
            Ok(id) => {
                let restore_command = format!(
                    "curl -fsSL {} | bash -s -- {id} --server {}",
                    self.config.restore_script_url(),
                    self.base_url
                );
                Ok(BackupResult::saved(id, restore_command))
            }
            Err(e) => {
                tracing::warn!(server = %self.base_url, error = %e, "server upload failed");
                Ok(BackupResult::failed(e.to_string()))
            }
        }
    }

    fn load(&self, backup_id: &str) -> Result<LoadedBackup> {
        let body = self
            .get(self.endpoint(&format!("/{backup_id}")))
            .map_err(|e| backend(format!("could not fetch backup {backup_id}: {e}")))?;
        let envelope: BackupEnvelope = serde_json::from_str(&body)?;
        let metadata = envelope.metadata.validate()?;
        let bashrc = envelope.bashrc.filter(|_| metadata.has_bashrc);
        Ok((metadata, bashrc))
    }

    fn list(&self) -> Result<Vec<BackupSummary>> {
        let body = self
            .get(self.endpoint(""))
            .map_err(|e| backend(format!("failed to list backups: {e}")))?;
        let listed: Vec<ListedBackup> = serde_json::from_str(&body)?;
        Ok(listed
            .into_iter()
            .map(|b| BackupSummary {
                id: b.id,
                description: b.description.unwrap_or_else(|| "No description".to_string()),
            })
            .collect())
    }
}
