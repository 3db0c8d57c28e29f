//! Locating or bootstrapping the package-installer executor
//!
//! The search path is consulted first. Otherwise the executor is downloaded
//! by walking an ordered list of acquisition sources; the first source that
//! produces a non-empty file wins. The result is cached for the rest of the
//! process.

use std::cell::RefCell;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use super::{CommandRunner, CommandSpec, run_with_retry};
use crate::config::TuxSyncConfig;
use crate::error::Result;
use crate::error::exec::executor_unavailable;
use crate::progress::Spinner;
use crate::temp::{EXECUTOR_FILE_NAME, executor_artifact_path};
use crate::ui;

/// Where a resolved executor came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    OnPath,
    Downloaded { url: String },
}

/// Absolute path of a usable executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorHandle {
    pub path: PathBuf,
    pub provenance: Provenance,
}

/// Tool used to fetch a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Downloader {
    Curl,
    Wget,
}

impl Downloader {
    fn program(self) -> &'static str {
        match self {
            Downloader::Curl => "curl",
            Downloader::Wget => "wget",
        }
    }

    fn command(self, url: &str, target: &Path) -> CommandSpec {
        let target = target.display().to_string();
        match self {
            Downloader::Curl => CommandSpec::new("curl").args(["-fsSL", "-o", &target, url]),
            Downloader::Wget => CommandSpec::new("wget").args(["-q", "-O", &target, url]),
        }
    }
}

/// One entry of the fallback chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionSource {
    pub downloader: Downloader,
    pub url: String,
}

/// Ordered download sources: release artifact, then raw content, then the
/// raw content again through the alternate downloader
pub fn acquisition_sources(config: &TuxSyncConfig) -> Vec<AcquisitionSource> {
    let release = config.tuxmate_release_url();
    let fallback = config.tuxmate_fallback_url();
    vec![
        AcquisitionSource {
            downloader: Downloader::Curl,
            url: release,
        },
        AcquisitionSource {
            downloader: Downloader::Curl,
            url: fallback.clone(),
        },
        AcquisitionSource {
            downloader: Downloader::Wget,
            url: fallback,
        },
    ]
}

/// Finds the executor once per process
pub struct ExecutorResolver<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a TuxSyncConfig,
    cached: RefCell<Option<ExecutorHandle>>,
}

impl<'a> ExecutorResolver<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &'a TuxSyncConfig) -> Self {
        Self {
            runner,
            config,
            cached: RefCell::new(None),
        }
    }

    /// Path to the executor, downloading it if necessary
    pub fn resolve(&self) -> Result<ExecutorHandle> {
        if let Some(handle) = self.cached.borrow().as_ref() {
            return Ok(handle.clone());
        }

        let handle = match self.runner.which(EXECUTOR_FILE_NAME) {
            Some(path) => {
                ui::success(&format!("Found TuxMate at {}", path.display()));
                ExecutorHandle {
                    path,
                    provenance: Provenance::OnPath,
                }
            }
            None => self.acquire()?,
        };

        tracing::info!(path = %handle.path.display(), provenance = ?handle.provenance, "executor resolved");
        *self.cached.borrow_mut() = Some(handle.clone());
        Ok(handle)
    }

    /// Forget the cached handle so the next `resolve` searches again
    #[cfg(test)]
    pub fn clear_cache(&self) {
        self.cached.borrow_mut().take();
    }

    fn acquire(&self) -> Result<ExecutorHandle> {
        ui::step("TuxMate not found in PATH. Downloading...");
        let target = executor_artifact_path(&self.config.tmp_dir);
        let policy = self.config.retry_policy();

        for source in acquisition_sources(self.config) {
            let program = source.downloader.program();
            if self.runner.which(program).is_none() {
                tracing::debug!(downloader = program, "downloader not installed, skipping source");
                continue;
            }

            remove_stale(&target);
            let spinner = Spinner::start(format!("Downloading from {}...", source.url));
            let outcome = run_with_retry(
                self.runner,
                &source.downloader.command(&source.url, &target).capture(),
                &policy,
            );
            spinner.finish();

            match outcome {
                Ok(_) if is_non_empty_file(&target) => {
                    mark_executable(&target)?;
                    ui::success(&format!("TuxMate downloaded to {}", target.display()));
                    return Ok(ExecutorHandle {
                        path: target,
                        provenance: Provenance::Downloaded { url: source.url },
                    });
                }
                Ok(_) => {
                    tracing::warn!(url = %source.url, "download produced no file");
                }
                Err(e) => {
                    tracing::warn!(url = %source.url, downloader = program, error = %e, "download source failed");
                }
            }
        }

        Err(executor_unavailable(
            EXECUTOR_FILE_NAME,
            manual_install_instructions(self.config),
        ))
    }
}

/// Recovery steps shown when every source failed
pub fn manual_install_instructions(config: &TuxSyncConfig) -> String {
    format!(
        "  curl -fsSL {} -o /usr/local/bin/{EXECUTOR_FILE_NAME}\n  chmod +x /usr/local/bin/{EXECUTOR_FILE_NAME}",
        config.tuxmate_fallback_url()
    )
}

fn remove_stale(target: &Path) {
    if let Err(e) = fs::remove_file(target) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::debug!(path = %target.display(), error = %e, "could not remove previous download");
        }
    }
}

fn is_non_empty_file(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|m| m.is_file() && m.len() > 0)
}

fn mark_executable(path: &Path) -> Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    fs::set_permissions(path, permissions)?;
    Ok(())
}
