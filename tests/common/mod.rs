//! Common test utilities for TuxSync integration tests
//!
//! A [`TestHome`] is an isolated `$HOME` plus a `bin/` directory placed first
//! on `PATH`, where tests drop fake `gh`, `apt-mark` or `tuxmate` scripts.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// An isolated home directory with fake executables
pub struct TestHome {
    #[allow(dead_code)]
    pub temp: TempDir,
    /// `$HOME` for the binary under test
    pub path: PathBuf,
    /// Directory prepended to `PATH`
    pub bin: PathBuf,
    /// `TUXSYNC_TMP_DIR` for the binary under test
    pub tmp: PathBuf,
}

impl TestHome {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        let bin = path.join("bin");
        let tmp = path.join("tmp");
        fs::create_dir_all(&bin).expect("Failed to create bin directory");
        fs::create_dir_all(&tmp).expect("Failed to create tmp directory");
        Self {
            temp,
            path,
            bin,
            tmp,
        }
    }

    /// Install an executable `sh` script named `name` on the fake PATH
    pub fn fake_program(&self, name: &str, body: &str) {
        let script = self.bin.join(name);
        fs::write(&script, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
            .expect("Failed to mark script executable");
    }

    /// Write a file relative to the home directory
    #[allow(dead_code)]
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file relative to the home directory
    #[allow(dead_code)]
    pub fn read_file(&self, path: &str) -> String {
        fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    #[allow(dead_code)]
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// `tuxsync` running against this home, with no inherited TUXSYNC_* tuning
    pub fn tuxsync(&self) -> Command {
        let inherited = std::env::var("PATH").unwrap_or_else(|_| "/usr/bin:/bin".to_string());
        self.command(format!("{}:{inherited}", self.bin.display()))
    }

    /// Like [`TestHome::tuxsync`], but only the fake programs are on `PATH`
    #[allow(dead_code)]
    pub fn tuxsync_isolated(&self) -> Command {
        self.command(self.bin.display().to_string())
    }

    // Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
    #[allow(deprecated)]
    fn command(&self, search_path: String) -> Command {
        let mut cmd = Command::cargo_bin("tuxsync").expect("tuxsync binary not built");
        cmd.env("HOME", &self.path)
            .env("PATH", search_path)
            .env("TUXSYNC_TMP_DIR", &self.tmp)
            .env("TUXSYNC_RETRY_ATTEMPTS", "1")
            .env("NO_COLOR", "1")
            .env_remove("TUXSYNC_LOG")
            .env_remove("TUXSYNC_BATCH_SIZE");
        cmd
    }
}

/// `tuxsync` outside any test home
#[allow(deprecated, dead_code)]
pub fn tuxsync_cmd() -> Command {
    Command::cargo_bin("tuxsync").expect("tuxsync binary not built")
}

/// Backup metadata as the gist backend stores it
#[allow(dead_code)]
pub fn metadata_yaml(packages: &[&str], has_bashrc: bool) -> String {
    let list: String = packages.iter().map(|p| format!("- {p}\n")).collect();
    format!(
        "created_at: 2026-01-05T09:30:00Z\n\
         distro: arch\n\
         distro_version: unknown\n\
         package_manager: pacman\n\
         packages:\n{list}\
         package_count: {}\n\
         has_bashrc: {has_bashrc}\n",
        packages.len()
    )
}

/// Shell function printing a file with builtins only, usable on an isolated PATH
#[allow(dead_code)]
pub const EMIT: &str = r#"emit() { while IFS= read -r line || [ -n "$line" ]; do printf '%s\n' "$line"; done < "$1"; }"#;

/// Fake `gh` serving one stored backup and logging every call to `gh.log`
#[allow(dead_code)]
pub fn fake_gh_with_backup(home: &TestHome, metadata: &str, bashrc: &str) {
    home.write_file("fixtures/tuxsync.yaml", metadata);
    home.write_file("fixtures/bashrc", bashrc);
    let fixtures = home.path.join("fixtures");
    let log = home.path.join("gh.log");
    home.fake_program(
        "gh",
        &format!(
            r#"{EMIT}
echo "$*" >> "{log}"
case "$*" in
  "auth status") exit 0 ;;
  *"--filename tuxsync.yaml"*) emit "{fixtures}/tuxsync.yaml" ;;
  *"--filename bashrc"*) emit "{fixtures}/bashrc" ;;
  *) exit 1 ;;
esac"#,
            log = log.display(),
            fixtures = fixtures.display(),
        ),
    );
}

/// Lines logged by a fake program to `<home>/<name>.log`
#[allow(dead_code)]
pub fn logged(home: &Path, name: &str) -> Vec<String> {
    fs::read_to_string(home.join(format!("{name}.log")))
        .map(|text| text.lines().map(ToString::to_string).collect())
        .unwrap_or_default()
}
