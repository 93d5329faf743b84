// src/lib.rs

pub mod cli;
pub mod clock;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{resolve_config, ConfigFile};
use crate::engine::{
    scope_path, spawn_interrupt_listener, ConfigCycleFactory, WatchLoop, WatchLoopOptions,
};
use crate::errors::Result;
use crate::exec::{stderr_sink, ExecutorBackend, RealExecutorBackend};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - project root + config resolution
/// - the command executor
/// - the per-cycle watch registrations
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let root = resolve_root(args.root.as_deref())?;
    let cfg = resolve_config(args.config.as_deref(), &root)?;

    if args.dry_run {
        print_dry_run(&root, &cfg);
        return Ok(());
    }

    info!(root = ?root, actions = cfg.actions().len(), "starting devwatch");

    let executor: Arc<dyn ExecutorBackend> = Arc::new(RealExecutorBackend);
    let options = WatchLoopOptions::from(cfg.settings());
    let factory = ConfigCycleFactory::new(root, cfg, executor, stderr_sink());

    WatchLoop::new(factory, options, spawn_interrupt_listener())
        .run()
        .await
}

/// Absolute project root, resolved once at startup.
///
/// `--root` if given, else the current working directory.
pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf> {
    let root = match explicit {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().context("reading current directory")?,
    };
    let root = root
        .canonicalize()
        .with_context(|| format!("resolving project root {:?}", root))?;
    Ok(root)
}

/// Print the effective actions without watching anything.
fn print_dry_run(root: &Path, cfg: &ConfigFile) {
    println!("devwatch dry-run");
    println!("  root = {}", root.display());
    println!(
        "  config.interrupt_grace = {:?}",
        cfg.settings().interrupt_grace
    );
    println!();

    println!("actions ({}):", cfg.actions().len());
    for action in cfg.actions() {
        println!("  - {}", action.name);
        println!("      label: {}", action.label);
        println!("      cmd: {}", action.cmd);
        println!(
            "      scope: {} (recursive: {})",
            scope_path(root, &action.scope).display(),
            action.recursive
        );
        println!(
            "      extensions: {:?}",
            action.extensions.iter().collect::<Vec<_>>()
        );
        if !action.exclude.is_empty() {
            println!("      exclude: {:?}", action.exclude);
        }
        if let Some(timeout) = action.timeout {
            println!("      timeout: {timeout:?}");
        }
    }

    debug!("dry-run complete (no watching)");
}
