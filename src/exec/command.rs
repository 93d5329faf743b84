// src/exec/command.rs

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// A literal command line run through the platform shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub line: String,
    /// Working directory of the child process.
    pub cwd: PathBuf,
    pub timeout: Option<Duration>,
}

impl ShellCommand {
    pub fn new(line: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            line: line.into(),
            cwd: cwd.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// `sh -c <line>` or `cmd /C <line>`.
    pub(crate) fn to_process(&self) -> tokio::process::Command {
        let mut cmd = if cfg!(windows) {
            let mut c = tokio::process::Command::new("cmd");
            c.arg("/C").arg(&self.line);
            c
        } else {
            let mut c = tokio::process::Command::new("sh");
            c.arg("-c").arg(&self.line);
            c
        };
        cmd.current_dir(&self.cwd).kill_on_drop(true);
        cmd
    }
}

/// How a command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Exited(i32),
    /// Terminated by a signal, no exit code.
    Signalled,
    /// Killed after exceeding its timeout.
    TimedOut(Duration),
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        matches!(self, CommandOutcome::Exited(0))
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutcome::Exited(code) => write!(f, "exit code {code}"),
            CommandOutcome::Signalled => write!(f, "terminated by signal"),
            CommandOutcome::TimedOut(limit) => write!(f, "timed out after {limit:?}"),
        }
    }
}
