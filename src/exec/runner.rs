// src/exec/runner.rs

use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex};

use tracing::{debug, error, info, warn};

use crate::clock;
use crate::exec::backend::ExecutorBackend;
use crate::exec::command::{CommandOutcome, ShellCommand};
use crate::watch::{Action, ActionFuture, FsEvent};

/// Width of the `-` line printed before and after each command.
pub const SEPARATOR_WIDTH: usize = 79;

/// Where banner lines are written.
pub type DiagnosticSink = Arc<Mutex<dyn Write + Send>>;

/// The process's stderr as a banner sink.
pub fn stderr_sink() -> DiagnosticSink {
    Arc::new(Mutex::new(std::io::stderr()))
}

pub fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// Runs one fixed command whenever its handler fires.
///
/// Output per invocation:
///
/// ```text
/// Running unit tests at 2024/03/01 14:05:09
/// -------------------------------------------------------------------------------
/// <command output>
/// -------------------------------------------------------------------------------
/// ```
///
/// The command's outcome is logged and otherwise ignored, so a failing test
/// run never stops the watch loop.
pub struct CommandRunner {
    label: String,
    command: ShellCommand,
    executor: Arc<dyn ExecutorBackend>,
    sink: DiagnosticSink,
}

impl fmt::Debug for CommandRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRunner")
            .field("label", &self.label)
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}

impl CommandRunner {
    pub fn new(
        label: impl Into<String>,
        command: ShellCommand,
        executor: Arc<dyn ExecutorBackend>,
    ) -> Self {
        Self {
            label: label.into(),
            command,
            executor,
            sink: stderr_sink(),
        }
    }

    pub fn with_sink(mut self, sink: DiagnosticSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn command(&self) -> &ShellCommand {
        &self.command
    }

    /// Print the banner, run the command once, print the closing separator.
    ///
    /// Only the command's own output appears between the separators; the
    /// outcome is logged after the closing one.
    pub async fn run_action(&self, event: &FsEvent) {
        debug!(
            action = %self.label,
            path = ?event.path,
            cmd = %self.command.line,
            "running command"
        );

        self.emit(&format!("{} at {}", self.label, clock::now()));
        self.emit(&separator());
        let result = self.executor.run(&self.command).await;
        self.emit(&separator());

        match result {
            Ok(CommandOutcome::Exited(0)) => {
                info!(action = %self.label, "command succeeded");
            }
            Ok(CommandOutcome::Exited(code)) => {
                warn!(action = %self.label, exit_code = code, "command failed");
            }
            Ok(outcome) => {
                warn!(action = %self.label, %outcome, "command did not finish normally");
            }
            Err(err) => {
                error!(action = %self.label, error = %err, "could not run command");
            }
        }
    }

    fn emit(&self, line: &str) {
        match self.sink.lock() {
            Ok(mut out) => {
                if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
                    warn!(error = %e, "failed to write banner line");
                }
            }
            Err(_) => warn!("banner sink mutex poisoned"),
        }
    }
}

impl Action for CommandRunner {
    fn call<'a>(&'a self, event: &'a FsEvent) -> ActionFuture<'a> {
        Box::pin(self.run_action(event))
    }
}
