//! Package installation through the external executor
//!
//! The installation process:
//! 1. Write the package list to the fixed-path manifest file
//! 2. Try each invocation pattern in order until one reports success
//! 3. Remove the manifest, whatever happened
//!
//! Installation is best-effort: errors are logged and reported as `false`,
//! never propagated to the caller.

mod manifest;

use crate::config::TuxSyncConfig;
use crate::error::Result;
use crate::exec::{CommandRunner, CommandSpec, ExecutorResolver};
use crate::temp::manifest_path;
use crate::ui;

use manifest::ManifestFile;

/// Ways of handing packages to the executor, tried in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InvocationPattern {
    /// `tuxmate install --file <manifest>`
    Manifest,
    /// `tuxmate install <pkg>...` in fixed-size batches
    Batched,
}

const INVOCATION_PATTERNS: [InvocationPattern; 2] =
    [InvocationPattern::Manifest, InvocationPattern::Batched];

/// Drives the executor to install a package set
pub struct PackageInstaller<'a> {
    runner: &'a dyn CommandRunner,
    resolver: &'a ExecutorResolver<'a>,
    config: &'a TuxSyncConfig,
}

impl<'a> PackageInstaller<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        resolver: &'a ExecutorResolver<'a>,
        config: &'a TuxSyncConfig,
    ) -> Self {
        Self {
            runner,
            resolver,
            config,
        }
    }

    /// Install `packages`, returning whether the executor reported success
    pub fn install(&self, packages: &[String], dry_run: bool) -> bool {
        match self.try_install(packages, dry_run) {
            Ok(installed) => installed,
            Err(e) => {
                tracing::error!(error = %e, "package installation failed");
                ui::failure(&format!("Installation failed: {e}"));
                false
            }
        }
    }

    fn try_install(&self, packages: &[String], dry_run: bool) -> Result<bool> {
        if packages.is_empty() {
            ui::warn("No packages to install");
            return Ok(true);
        }

        if dry_run {
            ui::warn(&format!("DRY RUN - Would install {} packages:", packages.len()));
            for package in packages {
                ui::item(package);
            }
            return Ok(true);
        }

        let executor = self.resolver.resolve()?;
        ui::step(&format!("Installing {} packages via TuxMate...", packages.len()));

        let manifest = ManifestFile::write(manifest_path(&self.config.tmp_dir), packages)?;
        let executable = executor.path.display().to_string();

        for pattern in INVOCATION_PATTERNS {
            if self.invoke(pattern, &executable, &manifest, packages)? {
                tracing::info!(?pattern, count = packages.len(), "packages handed to executor");
                return Ok(true);
            }
            tracing::warn!(?pattern, "invocation pattern failed, trying next");
            ui::warn("Trying alternative invocation...");
        }

        Ok(false)
    }

    fn invoke(
        &self,
        pattern: InvocationPattern,
        executable: &str,
        manifest: &ManifestFile,
        packages: &[String],
    ) -> Result<bool> {
        match pattern {
            InvocationPattern::Manifest => {
                let output = self.runner.run(
                    &CommandSpec::new(executable)
                        .args(["install", "--file"])
                        .arg(manifest.path().display().to_string())
                        .check(false),
                )?;
                Ok(output.success())
            }
            InvocationPattern::Batched => {
                // Batch exit codes are not inspected.
                for batch in packages.chunks(self.config.package_batch_size.max(1)) {
                    let output = self.runner.run(
                        &CommandSpec::new(executable)
                            .arg("install")
                            .args(batch.iter().cloned())
                            .check(false),
                    )?;
                    tracing::debug!(size = batch.len(), code = ?output.code, "batch finished");
                }
                Ok(true)
            }
        }
    }
}
