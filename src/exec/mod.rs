// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] describes a shell command line and how it ended.
//! - [`backend`] provides the `ExecutorBackend` trait and the
//!   `RealExecutorBackend` that spawns processes with `tokio::process`;
//!   tests replace it with a fake.
//! - [`runner`] wraps one command as a watch [`Action`](crate::watch::Action)
//!   that prints the banner around it.

pub mod backend;
pub mod command;
pub mod runner;

pub use backend::{ExecutorBackend, ExecutorFuture, RealExecutorBackend};
pub use command::{CommandOutcome, ShellCommand};
pub use runner::{separator, stderr_sink, CommandRunner, DiagnosticSink, SEPARATOR_WIDTH};
