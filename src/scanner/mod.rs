//! System scanning: distro identity, user-installed packages, shell config

mod os_release;

use std::fs;
use std::path::PathBuf;

use crate::error::Result;
use crate::error::storage::scan_failed;
use crate::exec::{CommandRunner, CommandSpec};

pub use os_release::OsRelease;

/// Snapshot of the machine being backed up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub distro: String,
    pub distro_version: String,
    pub package_manager: String,
    pub packages: Vec<String>,
    pub bashrc_content: Option<String>,
}

/// Produces a [`ScanResult`]
pub trait Scanner {
    fn scan(&self) -> Result<ScanResult>;
}

/// A package manager and the query listing user-installed packages
struct PackageQuery {
    manager: &'static str,
    program: &'static str,
    args: &'static [&'static str],
}

/// Probed in order; the first manager present on the system is used
const PACKAGE_QUERIES: &[PackageQuery] = &[
    PackageQuery {
        manager: "apt",
        program: "apt-mark",
        args: &["showmanual"],
    },
    PackageQuery {
        manager: "dnf",
        program: "dnf",
        args: &["repoquery", "--userinstalled", "--qf", "%{name}\n"],
    },
    PackageQuery {
        manager: "pacman",
        program: "pacman",
        args: &["-Qqe"],
    },
    PackageQuery {
        manager: "zypper",
        program: "zypper",
        args: &["--quiet", "packages", "--userinstalled"],
    },
];

/// Scans the local machine through its package manager
pub struct SystemScanner<'a> {
    runner: &'a dyn CommandRunner,
    os_release: PathBuf,
    bashrc: Option<PathBuf>,
}

impl<'a> SystemScanner<'a> {
    /// Scanner reading `/etc/os-release` and, when `include_bashrc`, `~/.bashrc`
    pub fn new(runner: &'a dyn CommandRunner, include_bashrc: bool) -> Self {
        Self {
            runner,
            os_release: PathBuf::from("/etc/os-release"),
            bashrc: include_bashrc
                .then(dirs::home_dir)
                .flatten()
                .map(|home| home.join(".bashrc")),
        }
    }

    #[cfg(test)]
    fn with_paths(runner: &'a dyn CommandRunner, os_release: PathBuf, bashrc: Option<PathBuf>) -> Self {
        Self {
            runner,
            os_release,
            bashrc,
        }
    }

    fn query_packages(&self) -> Result<(String, Vec<String>)> {
        let Some(query) = PACKAGE_QUERIES
            .iter()
            .find(|q| self.runner.which(q.program).is_some())
        else {
            tracing::warn!("no supported package manager found");
            return Ok(("unknown".to_string(), Vec::new()));
        };

        let output = self
            .runner
            .run(&CommandSpec::new(query.program).args(query.args.iter().copied()).capture())
            .map_err(|e| scan_failed(format!("{} query failed: {e}", query.manager)))?;

        let packages = if query.manager == "zypper" {
            parse_zypper_table(&output.stdout)
        } else {
            parse_lines(&output.stdout)
        };
        Ok((query.manager.to_string(), packages))
    }
}

impl Scanner for SystemScanner<'_> {
    fn scan(&self) -> Result<ScanResult> {
        let release = OsRelease::read(&self.os_release);
        let (package_manager, packages) = self.query_packages()?;

        let bashrc_content = self.bashrc.as_ref().and_then(|path| match fs::read_to_string(path) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::info!(path = %path.display(), error = %e, "shell config not read");
                None
            }
        });

        tracing::info!(
            distro = %release.id,
            package_manager = %package_manager,
            packages = packages.len(),
            "scan complete"
        );

        Ok(ScanResult {
            distro: release.id,
            distro_version: release.version_id,
            package_manager,
            packages,
            bashrc_content,
        })
    }
}

fn parse_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Package names from the third column of `zypper packages` output
fn parse_zypper_table(stdout: &str) -> Vec<String> {
    let mut packages: Vec<String> = stdout
        .lines()
        .filter(|line| line.contains('|') && !line.starts_with("S ") && !line.starts_with("--"))
        .filter_map(|line| line.split('|').nth(2))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    packages.dedup();
    packages
}
