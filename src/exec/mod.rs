//! External process execution
//!
//! Every subprocess TuxSync starts goes through a [`CommandRunner`]. The
//! production runner is [`SystemRunner`]; tests substitute scripted runners.
//!
//! - [`retry`]: bounded retries with exponential backoff
//! - [`resolver`]: locating or bootstrapping the package-installer executor

pub mod resolver;
pub mod retry;

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::exec::{command_failed, spawn_failed};
use crate::error::{ExecFailure, Result};

pub use resolver::{ExecutorHandle, ExecutorResolver, Provenance};
pub use retry::{RetryPolicy, run_with_retry};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// What to execute
#[derive(Debug, Clone, PartialEq, Eq)]
enum Program {
    /// An executable with separately passed arguments
    Direct { program: String, args: Vec<String> },
    /// A script run through `sh -c`; only `'static` text is accepted
    Shell(&'static str),
}

/// Description of a single external command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: Program,
    cwd: Option<PathBuf>,
    capture: bool,
    check: bool,
    timeout: Option<Duration>,
}

impl CommandSpec {
    /// Command with arguments passed verbatim, never through a shell
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: Program::Direct {
                program: program.into(),
                args: Vec::new(),
            },
            cwd: None,
            capture: false,
            check: true,
            timeout: None,
        }
    }

    /// Hardcoded script interpreted by `sh -c`
    ///
    /// Takes `&'static str` so caller-supplied strings cannot reach a shell.
    pub fn shell(script: &'static str) -> Self {
        Self {
            program: Program::Shell(script),
            ..Self::new("sh")
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        if let Program::Direct { args, .. } = &mut self.program {
            args.push(arg.into());
        }
        self
    }

    pub fn args<I, S>(mut self, new_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Program::Direct { args, .. } = &mut self.program {
            args.extend(new_args.into_iter().map(Into::into));
        }
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Capture stdout/stderr instead of inheriting the terminal
    pub fn capture(mut self) -> Self {
        self.capture = true;
        self
    }

    /// Whether a non-zero exit status is an error (default: true)
    pub fn check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    pub fn timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Executable name, `sh` for shell scripts
    pub fn program(&self) -> &str {
        match &self.program {
            Program::Direct { program, .. } => program,
            Program::Shell(_) => "sh",
        }
    }

    /// Arguments as they will be passed to the process
    pub fn argv(&self) -> Vec<String> {
        match &self.program {
            Program::Direct { args, .. } => args.clone(),
            Program::Shell(script) => vec!["-c".to_string(), (*script).to_string()],
        }
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn is_checked(&self) -> bool {
        self.check
    }

    pub fn is_captured(&self) -> bool {
        self.capture
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.timeout
    }

    fn to_process(&self) -> Command {
        let mut cmd = Command::new(self.program());
        cmd.args(self.argv());
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        if self.capture {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        }
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program())?;
        for arg in self.argv() {
            if arg.contains(char::is_whitespace) {
                write!(f, " '{arg}'")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    /// Captured stdout, empty unless the command was captured
    pub stdout: String,
    /// Captured stderr, empty unless the command was captured
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Seam for running external processes
pub trait CommandRunner {
    /// Run `command` once
    ///
    /// Fails with `CommandFailed` when the process cannot be started, exceeds
    /// its time limit, or (when checked) exits non-zero.
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput>;

    /// Locate `program` on the executable search path
    fn which(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    /// Block the calling thread between retry attempts
    fn pause(&self, delay: Duration) {
        thread::sleep(delay);
    }
}

/// Runs commands as real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput> {
        tracing::debug!(command = %command, "running");

        let mut child = command
            .to_process()
            .spawn()
            .map_err(|e| spawn_failed(command.to_string(), e))?;

        let readers = command.capture.then(|| OutputReaders::attach(&mut child));

        let waited = match command.timeout {
            Some(limit) => wait_with_deadline(&mut child, limit),
            None => child.wait().map(Some),
        };
        // Readers are joined only after the child has been reaped.
        let (stdout, stderr) = readers.map(OutputReaders::finish).unwrap_or_default();

        let status = waited
            .map_err(|e| spawn_failed(command.to_string(), e))?
            .ok_or_else(|| {
                let limit = command.timeout.unwrap_or_default();
                tracing::debug!(command = %command, ?limit, discarded = stdout.len(), "timed out");
                command_failed(command.to_string(), 1, ExecFailure::Timeout(limit))
            })?;
        let output = CommandOutput {
            code: status.code(),
            stdout,
            stderr,
        };

        if command.check && !output.success() {
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
}

/// Poll the child until it exits or `limit` elapses
///
/// Returns `Ok(None)` after killing a child that ran out of time.
fn wait_with_deadline(child: &mut Child, limit: Duration) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            if let Err(e) = child.kill() {
                // The child may have exited between try_wait and kill.
                tracing::debug!(error = %e, "kill after deadline failed");
            }
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Drains captured pipes on background threads so a chatty child never blocks
struct OutputReaders {
    stdout: Option<thread::JoinHandle<String>>,
    stderr: Option<thread::JoinHandle<String>>,
}

impl OutputReaders {
    fn attach(child: &mut Child) -> Self {
        Self {
            stdout: child.stdout.take().map(drain),
            stderr: child.stderr.take().map(drain),
        }
    }

    fn finish(self) -> (String, String) {
        let join = |handle: Option<thread::JoinHandle<String>>| {
            handle
                .and_then(|h| h.join().ok())
                .unwrap_or_default()
        };
        (join(self.stdout), join(self.stderr))
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}
