// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The command runner talks to an `ExecutorBackend` instead of spawning
//! processes itself, so tests can record commands instead of running them.

use std::future::Future;
use std::pin::Pin;

use anyhow::Context;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::exec::command::{CommandOutcome, ShellCommand};

/// Future returned by [`ExecutorBackend::run`].
pub type ExecutorFuture<'a> = Pin<Box<dyn Future<Output = Result<CommandOutcome>> + Send + 'a>>;

/// Trait abstracting how a shell command is executed.
pub trait ExecutorBackend: Send + Sync {
    /// Run `command` to completion.
    ///
    /// An `Err` means the command could not be run at all; a command that
    /// ran and failed is an `Ok` outcome.
    fn run<'a>(&'a self, command: &'a ShellCommand) -> ExecutorFuture<'a>;
}

/// Real executor backend used in production.
///
/// The child inherits stdin/stdout/stderr, so test and doc output goes
/// straight to the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealExecutorBackend;

impl ExecutorBackend for RealExecutorBackend {
    fn run<'a>(&'a self, command: &'a ShellCommand) -> ExecutorFuture<'a> {
        Box::pin(async move { Ok(run_shell(command).await?) })
    }
}

async fn run_shell(command: &ShellCommand) -> anyhow::Result<CommandOutcome> {
    let mut child = command
        .to_process()
        .spawn()
        .with_context(|| format!("spawning `{}` in {:?}", command.line, command.cwd))?;

    let status = match command.timeout {
        None => child.wait().await,
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(status) => status,
            Err(_) => {
                if let Err(e) = child.kill().await {
                    warn!(cmd = %command.line, error = %e, "failed to kill timed out command");
                }
                return Ok(CommandOutcome::TimedOut(limit));
            }
        },
    }
    .with_context(|| format!("waiting for `{}`", command.line))?;

    debug!(cmd = %command.line, ?status, "command exited");

    Ok(match status.code() {
        Some(code) => CommandOutcome::Exited(code),
        None => CommandOutcome::Signalled,
    })
}
