//! Test fixtures and utilities for reducing test setup duplication.
//!
//! [`ScriptedRunner`] stands in for real processes: a responder closure
//! decides each command's outcome, and every call, pause and path lookup is
//! recorded for assertions. [`ScriptedPrompter`] answers prompts from a queue,
//! and [`MemoryStorage`] keeps backups in memory.
//!
//! ```ignore
//! let runner = ScriptedRunner::new(|cmd| match cmd.program() {
//!     "git" => Ok(ScriptedRunner::stdout(" M dot_bashrc\n")),
//!     _ => Ok(ScriptedRunner::exit(0)),
//! })
//! .with_program("chezmoi", "/usr/bin/chezmoi");
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;

use crate::error::exec::command_failed;
use crate::error::storage::backend;
use crate::error::{ExecFailure, Result};
use crate::exec::{CommandOutput, CommandRunner, CommandSpec};
use crate::scanner::{ScanResult, Scanner};
use crate::storage::{
    BackupMetadata, BackupResult, BackupSummary, LoadedBackup, Storage, StorageProvider,
    StorageTarget,
};
use crate::ui::Prompter;

type Responder = Box<dyn Fn(&CommandSpec) -> std::result::Result<CommandOutput, ExecFailure>>;

/// Create a temp directory in the system temp location.
pub fn create_temp_dir() -> TempDir {
    TempDir::new_in(crate::temp::temp_dir_base()).expect("Failed to create temp directory")
}

/// A [`CommandRunner`] driven by a closure
pub struct ScriptedRunner {
    respond: Responder,
    on_path: HashMap<String, PathBuf>,
    calls: RefCell<Vec<CommandSpec>>,
    pauses: RefCell<Vec<Duration>>,
}

impl ScriptedRunner {
    /// Runner whose outcomes come from `respond`
    ///
    /// Check semantics match the system runner: a non-zero exit from a checked
    /// command becomes a `CommandFailed` error.
    pub fn new(
        respond: impl Fn(&CommandSpec) -> std::result::Result<CommandOutput, ExecFailure> + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            on_path: HashMap::new(),
            calls: RefCell::new(Vec::new()),
            pauses: RefCell::new(Vec::new()),
        }
    }

    /// Runner where every command exits 0 with no output
    pub fn succeeding() -> Self {
        Self::new(|_| Ok(Self::exit(0)))
    }

    /// Make `which(name)` resolve to `path`
    pub fn with_program(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.on_path.insert(name.to_string(), path.into());
        self
    }

    pub fn exit(code: i32) -> CommandOutput {
        CommandOutput {
            code: Some(code),
            ..CommandOutput::default()
        }
    }

    pub fn stdout(text: &str) -> CommandOutput {
        CommandOutput {
            code: Some(0),
            stdout: text.to_string(),
            stderr: String::new(),
        }
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }

    /// Calls rendered as shell-like lines
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(ToString::to_string).collect()
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.borrow().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput> {
        self.calls.borrow_mut().push(command.clone());
        let output = (self.respond)(command)
            .map_err(|failure| command_failed(command.to_string(), 1, failure))?;
        if command.is_checked() && !output.success() {
            return Err(command_failed(
                command.to_string(),
                1,
                ExecFailure::NonZeroExit {
                    code: output.code,
                    stderr: output.stderr,
                },
            ));
        }
        Ok(output)
    }

    fn which(&self, program: &str) -> Option<PathBuf> {
        self.on_path.get(program).cloned()
    }

    fn pause(&self, delay: Duration) {
        self.pauses.borrow_mut().push(delay);
    }
}

/// One queued answer for [`ScriptedPrompter`]
#[derive(Debug, Clone)]
pub enum Answer {
    Confirm(bool),
    Choose(Option<usize>),
    Input(Option<String>),
}

/// A [`Prompter`] that replays queued answers and records every question
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<Answer>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    /// Questions asked so far, in order
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    fn next(&self, message: &str) -> Answer {
        self.asked.borrow_mut().push(message.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected prompt: {message}"))
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, message: &str, _default: bool) -> Result<bool> {
        match self.next(message) {
            Answer::Confirm(answer) => Ok(answer),
            other => panic!("expected confirm answer for '{message}', got {other:?}"),
        }
    }

    fn choose(&self, message: &str, _options: &[&str]) -> Result<Option<usize>> {
        match self.next(message) {
            Answer::Choose(answer) => Ok(answer),
            other => panic!("expected choose answer for '{message}', got {other:?}"),
        }
    }

    fn input(&self, message: &str, _placeholder: &str) -> Result<Option<String>> {
        match self.next(message) {
            Answer::Input(answer) => Ok(answer),
            other => panic!("expected input answer for '{message}', got {other:?}"),
        }
    }
}

/// A [`Scanner`] returning a fixed result
pub struct FixedScanner(pub ScanResult);

impl Scanner for FixedScanner {
    fn scan(&self) -> Result<ScanResult> {
        Ok(self.0.clone())
    }
}

/// In-memory [`Storage`] and [`StorageProvider`] recording what it is asked
#[derive(Default)]
pub struct MemoryStorage {
    backups: RefCell<HashMap<String, LoadedBackup>>,
    fail_saves: bool,
    opened: RefCell<Vec<StorageTarget>>,
    saved: RefCell<Vec<ScanResult>>,
}

impl MemoryStorage {
    /// Storage whose saves report failure
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    /// Storage already holding `backup` under `id`
    pub fn with_backup(id: &str, metadata: BackupMetadata, bashrc: Option<&str>) -> Self {
        let storage = Self::default();
        storage
            .backups
            .borrow_mut()
            .insert(id.to_string(), (metadata, bashrc.map(ToString::to_string)));
        storage
    }

    pub fn opened(&self) -> Vec<StorageTarget> {
        self.opened.borrow().clone()
    }

    pub fn saved(&self) -> Vec<ScanResult> {
        self.saved.borrow().clone()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, scan: &ScanResult) -> Result<BackupResult> {
        self.saved.borrow_mut().push(scan.clone());
        if self.fail_saves {
            return Ok(BackupResult::failed("backend rejected the upload"));
        }
        let id = format!("mem{:08}", self.backups.borrow().len());
        let metadata = BackupMetadata::from_scan(scan);
        self.backups
            .borrow_mut()
            .insert(id.clone(), (metadata, scan.bashrc_content.clone()));
        Ok(BackupResult::saved(id.clone(), format!("tuxsync restore {id}")))
    }

    fn load(&self, backup_id: &str) -> Result<LoadedBackup> {
        self.backups
            .borrow()
            .get(backup_id)
            .cloned()
            .ok_or_else(|| backend(format!("no backup {backup_id}")))
    }

    fn list(&self) -> Result<Vec<BackupSummary>> {
        Ok(self
            .backups
            .borrow()
            .iter()
            .map(|(id, (metadata, _))| BackupSummary {
                id: id.clone(),
                description: metadata.describe(),
            })
            .collect())
    }
}

impl StorageProvider for MemoryStorage {
    fn open<'s>(&'s self, target: &StorageTarget) -> Result<Box<dyn Storage + 's>> {
        self.opened.borrow_mut().push(target.clone());
        Ok(Box::new(self))
    }
}

impl Storage for &MemoryStorage {
    fn save(&self, scan: &ScanResult) -> Result<BackupResult> {
        (**self).save(scan)
    }

    fn load(&self, backup_id: &str) -> Result<LoadedBackup> {
        (**self).load(backup_id)
    }

    fn list(&self) -> Result<Vec<BackupSummary>> {
        (**self).list()
    }
}

/// Scan result with `packages` and optional shell config
pub fn scan_result(packages: &[&str], bashrc: Option<&str>) -> ScanResult {
    ScanResult {
        distro: "ubuntu".to_string(),
        distro_version: "24.04".to_string(),
        package_manager: "apt".to_string(),
        packages: packages.iter().map(ToString::to_string).collect(),
        bashrc_content: bashrc.map(ToString::to_string),
    }
}
