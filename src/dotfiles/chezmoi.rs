//! chezmoi-backed dotfile management

use std::path::{Path, PathBuf};

use super::DotfileManager;
use crate::exec::{CommandRunner, CommandSpec};
use crate::ui;

const INSTALL_SCRIPT: &str = r#"sh -c "$(curl -fsLS get.chezmoi.io)" -- -b "$HOME/.local/bin""#;
const COMMIT_MESSAGE: &str = "Update dotfiles via tuxsync";

/// Wraps the chezmoi executable
pub struct Chezmoi<'a> {
    runner: &'a dyn CommandRunner,
    bin: Option<PathBuf>,
}

impl<'a> Chezmoi<'a> {
    /// Look chezmoi up on the search path
    pub fn locate(runner: &'a dyn CommandRunner) -> Self {
        Self {
            bin: runner.which("chezmoi"),
            runner,
        }
    }

    fn bin(&self) -> Option<String> {
        let bin = self.bin.as_ref().map(|p| p.display().to_string());
        if bin.is_none() {
            ui::failure("chezmoi is not installed");
        }
        bin
    }

    /// Run a checked command, reporting failure as `false`
    fn run_soft(&self, command: &CommandSpec, what: &str) -> bool {
        match self.runner.run(command) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "{what} failed");
                ui::failure(&format!("Failed to {what}: {e}"));
                false
            }
        }
    }
}

impl DotfileManager for Chezmoi<'_> {
    fn is_installed(&self) -> bool {
        self.bin.is_some()
    }

    fn install(&mut self) -> bool {
        ui::step("Installing chezmoi...");
        if !self.run_soft(&CommandSpec::shell(INSTALL_SCRIPT), "install chezmoi") {
            return false;
        }
        self.bin = self
            .runner
            .which("chezmoi")
            .or_else(|| dirs::home_dir().map(|home| home.join(".local/bin/chezmoi")));
        ui::success("chezmoi installed successfully");
        self.bin.is_some()
    }

    fn init_repo(&self, repo_url: &str) -> bool {
        let Some(bin) = self.bin() else {
            return false;
        };
        ui::step(&format!("Initializing chezmoi with {repo_url}"));
        let ok = self.run_soft(
            &CommandSpec::new(bin).args(["init", repo_url]),
            "initialize chezmoi",
        );
        if ok {
            ui::success("chezmoi initialized");
        }
        ok
    }

    fn apply(&self, dry_run: bool) -> bool {
        let Some(bin) = self.bin() else {
            return false;
        };
        let mut command = CommandSpec::new(bin).arg("apply");
        if dry_run {
            command = command.arg("--dry-run");
            ui::step("Dry run - showing what would be applied:");
        } else {
            ui::step("Applying dotfiles...");
        }
        let ok = self.run_soft(&command, "apply dotfiles");
        if ok && !dry_run {
            ui::success("Dotfiles applied");
        }
        ok
    }

    fn source_dir(&self) -> Option<PathBuf> {
        let bin = self.bin.as_ref()?;
        let output = self
            .runner
            .run(&CommandSpec::new(bin.display().to_string()).arg("source-path").capture())
            .ok()?;
        let path = output.stdout.trim();
        (!path.is_empty()).then(|| PathBuf::from(path))
    }

    fn add_file(&self, path: &Path) -> bool {
        let Some(bin) = self.bin() else {
            return false;
        };
        let shown = path.display().to_string();
        ui::step(&format!("Adding {shown} to chezmoi"));
        let ok = self.run_soft(
            &CommandSpec::new(bin).arg("add").arg(shown.clone()),
            &format!("add {shown}"),
        );
        if ok {
            ui::success(&format!("Added {shown}"));
        }
        ok
    }

    fn git_push(&self) -> bool {
        let Some(source_dir) = self.source_dir() else {
            ui::failure("chezmoi source directory not found");
            return false;
        };

        ui::step("Pushing dotfiles to remote repository...");
        let git = |args: &[&str]| {
            CommandSpec::new("git")
                .args(args.iter().copied())
                .cwd(&source_dir)
        };

        if !self.run_soft(&git(&["add", "."]), "stage dotfiles") {
            return false;
        }

        let status = match self
            .runner
            .run(&git(&["status", "--porcelain"]).capture().check(false))
        {
            Ok(status) => status,
            Err(e) => {
                ui::failure(&format!("Failed to push dotfiles: {e}"));
                return false;
            }
        };
        if status.stdout.trim().is_empty() {
            ui::success("No changes to push (dotfiles already up to date)");
            return true;
        }

        if !self.run_soft(&git(&["commit", "-m", COMMIT_MESSAGE]), "commit dotfiles")
            || !self.run_soft(&git(&["push"]), "push dotfiles")
        {
            return false;
        }
        ui::success("Dotfiles pushed successfully");
        true
    }
}
