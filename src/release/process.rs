//! External process execution.
//!
//! Every tool the pipeline drives (xcodebuild, codesign, ditto, hdiutil,
//! notarytool, stapler, Sparkle's helpers) goes through a [`CommandRunner`].
//! The system runner spawns the process with `tokio::process` and waits for
//! it; tests substitute a recording runner.

use crate::release::error::{Error, Result};
use async_trait::async_trait;
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A single external tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    quiet: bool,
}

impl CommandSpec {
    /// Creates an invocation of `program` with no arguments.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            cwd: None,
            quiet: false,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Runs the process in `dir`.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Captures output without echoing it to the terminal.
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Program to execute.
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Program name for messages (file name only).
    pub fn display_name(&self) -> String {
        Path::new(&self.program)
            .file_name()
            .unwrap_or(&self.program)
            .to_string_lossy()
            .into_owned()
    }

    /// Arguments as passed to the process.
    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    /// Arguments rendered as UTF-8, lossily.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Working directory, if one was set.
    pub fn working_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Whether output is captured silently.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Outcome of one external process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageResult {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    /// Captured standard output
    pub stdout: Vec<u8>,
    /// Captured standard error
    pub stderr: Vec<u8>,
}

impl StageResult {
    /// Successful result with the given stdout.
    pub fn success(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: Vec::new(),
        }
    }

    /// Failed result with the given exit code and stderr.
    pub fn failure(code: i32, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            code: Some(code),
            stdout: Vec::new(),
            stderr: stderr.into(),
        }
    }

    /// Whether the process exited with status 0.
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Trimmed standard output as text.
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).trim().to_string()
    }

    /// Converts a non-zero exit into [`Error::CommandFailed`].
    pub fn check(self, spec: &CommandSpec) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::CommandFailed {
                command: spec.display_name(),
                code: self.code,
                stderr: String::from_utf8_lossy(&self.stderr).trim().to_string(),
            })
        }
    }
}

/// Executes external processes.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs the process to completion and returns its raw outcome.
    ///
    /// Only failure to spawn is an error here; exit status is left to the caller.
    async fn execute(&self, spec: &CommandSpec) -> Result<StageResult>;

    /// Runs the process and fails on a non-zero exit status.
    async fn run(&self, spec: &CommandSpec) -> Result<StageResult> {
        self.execute(spec).await?.check(spec)
    }
}

/// Runner that spawns real processes, inheriting the parent environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn execute(&self, spec: &CommandSpec) -> Result<StageResult> {
        log::debug!("Running: {}", spec);

        let mut command = tokio::process::Command::new(spec.program());
        command.args(spec.arguments());
        if let Some(dir) = spec.working_dir() {
            command.current_dir(dir);
        }

        let output = command.output().await.map_err(|source| Error::CommandSpawn {
            command: spec.display_name(),
            source,
        })?;

        if !spec.is_quiet() {
            // Best effort echo
            let _ = std::io::stdout().write_all(&output.stdout);
            let _ = std::io::stderr().write_all(&output.stderr);
        }

        Ok(StageResult {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
