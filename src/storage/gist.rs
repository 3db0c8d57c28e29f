//! GitHub Gist backend driven by the `gh` CLI

use std::fs;

use super::{
    BASHRC_FILE, BackupMetadata, BackupResult, BackupSummary, LoadedBackup, METADATA_FILE, Storage,
};
use crate::config::TuxSyncConfig;
use crate::error::Result;
use crate::error::storage::backend;
use crate::exec::{CommandRunner, CommandSpec, run_with_retry};
use crate::scanner::ScanResult;
use crate::ui;

pub struct GistStorage<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a TuxSyncConfig,
}

impl<'a> GistStorage<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &'a TuxSyncConfig) -> Self {
        Self { runner, config }
    }

    fn gh<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::new("gh").args(args).capture()
    }

    fn create_gist(&self, scan: &ScanResult) -> Result<String> {
        let metadata = BackupMetadata::from_scan(scan);
        let staging = tempfile::TempDir::new_in(&self.config.tmp_dir)?;

        let metadata_path = staging.path().join(METADATA_FILE);
        fs::write(&metadata_path, serde_yaml::to_string(&metadata)?)?;
        let mut files = vec![metadata_path.display().to_string()];

        if let Some(bashrc) = &scan.bashrc_content {
            let bashrc_path = staging.path().join(BASHRC_FILE);
            fs::write(&bashrc_path, bashrc)?;
            files.push(bashrc_path.display().to_string());
        }

        // Not idempotent: a timed-out create may still have succeeded. Run once.
        let command = self
            .gh(["gist", "create", "--desc"])
            .arg(metadata.describe())
            .args(files)
            .timeout(self.config.network_timeout);
        let output = self.runner.run(&command)?;
        parse_gist_id(&output.stdout)
            .ok_or_else(|| backend(format!("unexpected gh output: {}", output.stdout.trim())))
    }
}

/// Gist ID from the URL `gh gist create` prints last
fn parse_gist_id(stdout: &str) -> Option<String> {
    let url = stdout.lines().map(str::trim).rfind(|line| !line.is_empty())?;
    let id = url.trim_end_matches('/').rsplit('/').next()?;
    (!id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())).then(|| id.to_string())
}

/// Backups among `gh gist list` lines (tab-separated id, description, ...)
fn parse_gist_list(stdout: &str) -> Vec<BackupSummary> {
    stdout
        .lines()
        .filter(|line| line.to_lowercase().contains("tuxsync"))
        .filter_map(|line| {
            let mut parts = line.split('\t');
            let id = parts.next()?.trim();
            let description = parts.next().map_or("No description", str::trim);
            (!id.is_empty()).then(|| BackupSummary {
                id: id.to_string(),
                description: description.to_string(),
            })
        })
        .collect()
}

impl Storage for GistStorage<'_> {
    fn prepare(&self) -> Result<()> {
        if self.runner.which("gh").is_none() {
            return Err(backend(
                "GitHub CLI (gh) not found. Install it from https://cli.github.com/",
            ));
        }

        let status = self
            .runner
            .run(&self.gh(["auth", "status"]).check(false))?;
        if status.success() {
            return Ok(());
        }

        ui::warn("Not logged in to GitHub");
        ui::step("Starting GitHub authentication...");
        let login = self.runner.run(
            &CommandSpec::new("gh")
                .args(["auth", "login", "--web", "-p", "https"])
                .check(false),
        )?;
        if !login.success() {
            return Err(backend("GitHub authentication failed. Please try again."));
        }
        ui::success("Authentication successful!");
        Ok(())
    }

    fn save(&self, scan: &ScanResult) -> Result<BackupResult> {
        ui::step("Uploading backup to GitHub Gist...");
        match self.create_gist(scan) {
            Ok(id) => {
                let restore_command = format!(
                    "curl -fsSL {} | bash -s -- {id}",
                    self.config.restore_script_url()
                );
                Ok(BackupResult::saved(id, restore_command))
            }
            Err(e) => {
                tracing::warn!(error = %e, "gist creation failed");
                Ok(BackupResult::failed(e.to_string()))
            }
        }
    }

    fn load(&self, backup_id: &str) -> Result<LoadedBackup> {
        let policy = self.config.retry_policy();
        let metadata_yaml = run_with_retry(
            self.runner,
            &self.gh(["gist", "view", backup_id, "--filename", METADATA_FILE, "--raw"]),
            &policy,
        )
        .map_err(|e| backend(format!("could not fetch backup {backup_id}: {e}")))?;
        let metadata: BackupMetadata = serde_yaml::from_str(&metadata_yaml.stdout)?;
        let metadata = metadata.validate()?;

        let bashrc = if metadata.has_bashrc {
            let fetched = run_with_retry(
                self.runner,
                &self.gh(["gist", "view", backup_id, "--filename", BASHRC_FILE, "--raw"]),
                &policy,
            );
            match fetched {
                Ok(output) => Some(output.stdout),
                Err(e) => {
                    tracing::warn!(%backup_id, error = %e, "shell config fetch failed");
                    ui::warn(&format!("Could not fetch .bashrc from backup: {e}"));
                    None
                }
            }
        } else {
            None
        };

        Ok((metadata, bashrc))
    }

    fn list(&self) -> Result<Vec<BackupSummary>> {
        let limit = self.config.gist_list_limit.to_string();
        let output = run_with_retry(
            self.runner,
            &self.gh(["gist", "list", "--limit", limit.as_str()]),
            &self.config.retry_policy(),
        )
        .map_err(|e| backend(format!("failed to list gists: {e}")))?;
        Ok(parse_gist_list(&output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::ScriptedRunner;

    fn config() -> TuxSyncConfig {
        TuxSyncConfig {
            retry_attempts: 1,
            ..TuxSyncConfig::default()
        }
    }

    fn scan() -> ScanResult {
        ScanResult {
            distro: "arch".to_string(),
            distro_version: "unknown".to_string(),
            package_manager: "pacman".to_string(),
            packages: vec!["neovim".to_string()],
            bashrc_content: Some("set -o vi\n".to_string()),
        }
    }

    #[test]
    fn test_parse_gist_id() {
        assert_eq!(
            parse_gist_id("- Creating gist\nhttps://gist.github.com/me/0a1b2c3d4e5f67890a1b\n"),
            Some("0a1b2c3d4e5f67890a1b".to_string())
        );
        assert_eq!(parse_gist_id(""), None);
        assert_eq!(parse_gist_id("https://gist.github.com/me/not-an-id"), None);
    }

    #[test]
    fn test_parse_gist_list_filters_backups() {
        let listing = "abc123def456\tTuxSync Backup - fedora 40 (2 packages)\t2 files\tsecret\n\
                       fff000fff000\tunrelated notes\t1 file\tpublic\n";
        let backups = parse_gist_list(listing);
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0].id, "abc123def456");
        assert!(backups[0].description.starts_with("TuxSync Backup"));
    }

    #[test]
    fn test_save_uploads_metadata_and_bashrc() {
        let config = config();
        let runner = ScriptedRunner::new(|cmd| {
            let argv = cmd.argv();
            assert_eq!(&argv[..3], ["gist", "create", "--desc"]);
            assert_eq!(argv.len(), 6);
            let metadata = std::fs::read_to_string(&argv[4]).unwrap();
            assert!(metadata.contains("neovim"));
            assert_eq!(std::fs::read_to_string(&argv[5]).unwrap(), "set -o vi\n");
            Ok(ScriptedRunner::stdout("https://gist.github.com/me/abcdef0123456789\n"))
        });
        let storage = GistStorage::new(&runner, &config);

        let result = storage.save(&scan()).unwrap();
        assert!(result.success);
        assert_eq!(result.backup_id.as_deref(), Some("abcdef0123456789"));
        assert!(
            result
                .restore_command
                .unwrap()
                .ends_with("bash -s -- abcdef0123456789")
        );
    }

    #[test]
    fn test_save_failure_is_reported_in_result() {
        let config = config();
        let runner = ScriptedRunner::new(|_| Ok(ScriptedRunner::exit(1)));
        let storage = GistStorage::new(&runner, &config);

        let result = storage.save(&scan()).unwrap();
        assert!(!result.success);
        assert!(result.error.is_some());
    }

    #[test]
    fn test_load_fetches_bashrc_when_present() {
        let config = config();
        let metadata = BackupMetadata::from_scan(&scan());
        let yaml = serde_yaml::to_string(&metadata).unwrap();
        let runner = ScriptedRunner::new(move |cmd| {
            if cmd.argv().contains(&METADATA_FILE.to_string()) {
                Ok(ScriptedRunner::stdout(&yaml))
            } else {
                Ok(ScriptedRunner::stdout("set -o vi\n"))
            }
        });
        let storage = GistStorage::new(&runner, &config);

        let (loaded, bashrc) = storage.load("abcdef0123456789").unwrap();
        assert_eq!(loaded, metadata);
        assert_eq!(bashrc.as_deref(), Some("set -o vi\n"));
    }

    #[test]
    fn test_create_is_not_retried_after_timeout() {
        let config = TuxSyncConfig {
            retry_attempts: 3,
            ..TuxSyncConfig::default()
        };
        let attempts = std::cell::Cell::new(0);
        let runner = ScriptedRunner::new(move |_| {
            attempts.set(attempts.get() + 1);
            if attempts.get() == 1 {
                Err(crate::error::ExecFailure::Timeout(std::time::Duration::from_secs(30)))
            } else {
                Ok(ScriptedRunner::stdout("https://gist.github.com/me/abcdef0123456789\n"))
            }
        });
        let storage = GistStorage::new(&runner, &config);

        let result = storage.save(&scan()).unwrap();
        assert!(!result.success);
        assert_eq!(runner.calls().len(), 1);
        assert!(runner.pauses().is_empty());
        assert_eq!(runner.calls()[0].time_limit(), Some(config.network_timeout));
    }

    #[test]
    fn test_load_keeps_metadata_when_bashrc_fetch_fails() {
        let config = config();
        let metadata = BackupMetadata::from_scan(&scan());
        assert!(metadata.has_bashrc);
        let yaml = serde_yaml::to_string(&metadata).unwrap();
        let runner = ScriptedRunner::new(move |cmd| {
            if cmd.argv().contains(&METADATA_FILE.to_string()) {
                Ok(ScriptedRunner::stdout(&yaml))
            } else {
                Ok(ScriptedRunner::exit(1))
            }
        });
        let storage = GistStorage::new(&runner, &config);

        let (loaded, bashrc) = storage.load("abcdef0123456789").unwrap();
        assert!(loaded.has_bashrc);
        assert_eq!(bashrc, None);
        assert_eq!(runner.calls().len(), 2);
        assert!(runner.calls()[1].is_checked());
    }

    #[test]
    fn test_load_failure_is_storage_error() {
        let config = config();
        let runner = ScriptedRunner::new(|_| Ok(ScriptedRunner::exit(1)));
        let storage = GistStorage::new(&runner, &config);
        let err = storage.load("abcdef0123456789").unwrap_err();
        assert!(matches!(err, crate::error::TuxSyncError::Storage { .. }));
    }

    #[test]
    fn test_prepare_requires_gh() {
        let config = config();
        let runner = ScriptedRunner::succeeding();
        let storage = GistStorage::new(&runner, &config);
        assert!(storage.prepare().is_err());
    }

    #[test]
    fn test_prepare_logs_in_when_unauthenticated() {
        let config = config();
        let runner = ScriptedRunner::new(|cmd| {
            if cmd.argv().get(1).map(String::as_str) == Some("status") {
                Ok(ScriptedRunner::exit(1))
            } else {
                Ok(ScriptedRunner::exit(0))
            }
        })
        .with_program("gh", "/usr/bin/gh");
        let storage = GistStorage::new(&runner, &config);

        storage.prepare().unwrap();
        assert_eq!(
            runner.command_lines(),
            vec!["gh auth status", "gh auth login --web -p https"]
        );
    }
}
