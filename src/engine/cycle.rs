// src/engine/cycle.rs

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::config::ConfigFile;
use crate::errors::Result;
use crate::exec::{CommandRunner, DiagnosticSink, ExecutorBackend, ShellCommand};
use crate::watch::{ChangeHandler, ExcludeFilter, Observer};

/// Builds the registrations for one watch cycle.
///
/// Called once per cycle; every call must produce new handlers.
pub trait CycleFactory: Send {
    fn build(&mut self, cycle: u64) -> Result<Observer>;
}

impl<F> CycleFactory for F
where
    F: FnMut(u64) -> Result<Observer> + Send,
{
    fn build(&mut self, cycle: u64) -> Result<Observer> {
        self(cycle)
    }
}

/// Production factory: one command-running handler per configured action.
pub struct ConfigCycleFactory {
    root: PathBuf,
    config: ConfigFile,
    executor: Arc<dyn ExecutorBackend>,
    sink: DiagnosticSink,
}

impl ConfigCycleFactory {
    pub fn new(
        root: impl Into<PathBuf>,
        config: ConfigFile,
        executor: Arc<dyn ExecutorBackend>,
        sink: DiagnosticSink,
    ) -> Self {
        Self {
            root: root.into(),
            config,
            executor,
            sink,
        }
    }
}

impl CycleFactory for ConfigCycleFactory {
    fn build(&mut self, _cycle: u64) -> Result<Observer> {
        build_observer(&self.root, &self.config, &self.executor, &self.sink)
    }
}

/// Schedule every configured action on a new, unstarted observer.
pub fn build_observer(
    root: &Path,
    config: &ConfigFile,
    executor: &Arc<dyn ExecutorBackend>,
    sink: &DiagnosticSink,
) -> Result<Observer> {
    let mut observer = Observer::new();

    for action in config.actions() {
        let command = ShellCommand::new(action.cmd.clone(), root).with_timeout(action.timeout);
        let runner = CommandRunner::new(action.label.clone(), command, Arc::clone(executor))
            .with_sink(Arc::clone(sink));

        let mut handler =
            ChangeHandler::new(action.extensions.clone(), Arc::new(runner)).named(&action.name);
        if !action.exclude.is_empty() {
            let exclude = ExcludeFilter::new(root, &action.exclude)
                .with_context(|| format!("action '{}'", action.name))?;
            handler = handler.with_exclude(exclude);
        }

        observer.schedule(handler, scope_path(root, &action.scope), action.recursive);
    }

    Ok(observer)
}

/// `root` joined with a relative scope, dropping `.` components.
pub fn scope_path(root: &Path, scope: &Path) -> PathBuf {
    scope
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .fold(root.to_path_buf(), |acc, part| acc.join(part))
}
