use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use devwatch::errors::DevwatchError;
use devwatch::exec::{
    CommandOutcome, DiagnosticSink, ExecutorBackend, ExecutorFuture, ShellCommand,
};
use devwatch::watch::{Action, ActionFuture, FsEvent};

/// An executor that records every command instead of running it, and
/// reports a fixed outcome.
#[derive(Clone)]
pub struct FakeExecutor {
    calls: Arc<Mutex<Vec<ShellCommand>>>,
    outcome: CommandOutcome,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::with_outcome(CommandOutcome::Exited(0))
    }

    pub fn with_outcome(outcome: CommandOutcome) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            outcome,
        }
    }

    pub fn calls(&self) -> Vec<ShellCommand> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded runs of exactly this command line.
    pub fn count(&self, line: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.line == line)
            .count()
    }
}

impl Default for FakeExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutorBackend for FakeExecutor {
    fn run<'a>(&'a self, command: &'a ShellCommand) -> ExecutorFuture<'a> {
        self.calls.lock().unwrap().push(command.clone());
        let outcome = self.outcome;
        Box::pin(async move { Ok(outcome) })
    }
}

/// An executor whose every run fails to start.
pub struct BrokenExecutor;

impl ExecutorBackend for BrokenExecutor {
    fn run<'a>(&'a self, command: &'a ShellCommand) -> ExecutorFuture<'a> {
        let line = command.line.clone();
        Box::pin(async move {
            Err(DevwatchError::Other(anyhow::anyhow!("cannot spawn `{line}`")))
        })
    }
}

/// An action that records the events it was called with.
#[derive(Clone, Default)]
pub struct RecordingAction {
    events: Arc<Mutex<Vec<FsEvent>>>,
}

impl RecordingAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<FsEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl Action for RecordingAction {
    fn call<'a>(&'a self, event: &'a FsEvent) -> ActionFuture<'a> {
        self.events.lock().unwrap().push(event.clone());
        Box::pin(async {})
    }
}

/// In-memory banner sink.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sink(&self) -> DiagnosticSink {
        Arc::new(Mutex::new(self.clone()))
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock().unwrap()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
