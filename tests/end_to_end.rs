//! Real filesystem notifications through real watchers.
//!
//! Exact event counts depend on the platform backend; these run where
//! inotify semantics are known.
#![cfg(target_os = "linux")]

mod common;
use crate::common::builders::{ActionBuilder, ConfigBuilder};
use crate::common::{init_tracing, lua_project, wait_until, FakeExecutor, SharedBuffer};

use std::error::Error;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use devwatch::config::ConfigFile;
use devwatch::engine::{
    build_observer, ConfigCycleFactory, CycleFactory, WatchLoop, WatchLoopOptions,
};
use devwatch::exec::ExecutorBackend;

type TestResult = Result<(), Box<dyn Error>>;

const SETTLE: Duration = Duration::from_millis(300);
const WAIT: Duration = Duration::from_secs(5);

fn start(
    root: &std::path::Path,
    cfg: &ConfigFile,
) -> Result<(devwatch::watch::Observer, FakeExecutor, SharedBuffer), Box<dyn Error>> {
    let executor = FakeExecutor::new();
    let out = SharedBuffer::new();
    let backend: Arc<dyn ExecutorBackend> = Arc::new(executor.clone());

    let mut observer = build_observer(root, cfg, &backend, &out.sink())?;
    observer.start()?;
    Ok((observer, executor, out))
}

#[tokio::test]
async fn new_src_file_triggers_both_handlers_with_default_extensions() -> TestResult {
    init_tracing();
    let (_dir, root) = lua_project();
    let cfg = ConfigBuilder::new().with_default_actions().build();
    let (mut observer, executor, out) = start(&root, &cfg)?;

    fs::File::create(root.join("src/foo.lua"))?;

    assert!(
        wait_until(WAIT, || executor.count("ldoc.lua src") >= 1 && executor.count("busted") >= 1)
            .await,
        "commands seen: {:?}",
        executor.calls()
    );
    tokio::time::sleep(SETTLE).await;

    observer.stop();
    observer.join().await?;

    assert_eq!(executor.count("ldoc.lua src"), 1);
    assert_eq!(executor.count("busted"), 1);
    assert!(executor.calls().iter().all(|c| c.cwd == root));
    assert_eq!(out.lines().len(), 6);
    Ok(())
}

#[tokio::test]
async fn new_src_file_only_builds_docs_when_tests_watch_other_files() -> TestResult {
    init_tracing();
    let (_dir, root) = lua_project();
    let cfg = ConfigBuilder::new()
        .with_action("tests", ActionBuilder::new("busted").extension(".moon").build())
        .with_action(
            "docs",
            ActionBuilder::new("ldoc.lua src")
                .scope("src")
                .extension(".lua")
                .build(),
        )
        .build();
    let (mut observer, executor, _out) = start(&root, &cfg)?;

    fs::File::create(root.join("src/foo.lua"))?;

    assert!(wait_until(WAIT, || executor.count("ldoc.lua src") >= 1).await);
    tokio::time::sleep(SETTLE).await;

    observer.stop();
    observer.join().await?;

    assert_eq!(executor.count("ldoc.lua src"), 1);
    assert_eq!(executor.count("busted"), 0);
    Ok(())
}

#[tokio::test]
async fn changes_outside_src_only_run_tests() -> TestResult {
    init_tracing();
    let (_dir, root) = lua_project();
    fs::create_dir(root.join("spec"))?;
    let cfg = ConfigBuilder::new().with_default_actions().build();
    let (mut observer, executor, _out) = start(&root, &cfg)?;

    fs::File::create(root.join("spec/foo_spec.lua"))?;

    assert!(wait_until(WAIT, || executor.count("busted") >= 1).await);
    tokio::time::sleep(SETTLE).await;

    observer.stop();
    observer.join().await?;

    assert_eq!(executor.count("ldoc.lua src"), 0);
    Ok(())
}

#[tokio::test]
async fn directories_and_excluded_paths_are_ignored() -> TestResult {
    init_tracing();
    let (_dir, root) = lua_project();
    fs::create_dir(root.join("src/generated"))?;
    let cfg = ConfigBuilder::new()
        .with_action(
            "docs",
            ActionBuilder::new("ldoc.lua src")
                .scope("src")
                .extension(".lua")
                .exclude("src/generated/**")
                .build(),
        )
        .build();
    let (mut observer, executor, _out) = start(&root, &cfg)?;

    fs::create_dir(root.join("src/plugin.lua"))?;
    fs::File::create(root.join("src/generated/tables.lua"))?;
    tokio::time::sleep(SETTLE).await;

    observer.stop();
    observer.join().await?;

    assert!(executor.calls().is_empty(), "{:?}", executor.calls());
    Ok(())
}

fn docs_only() -> ConfigFile {
    ConfigBuilder::new()
        .with_action(
            "docs",
            ActionBuilder::new("ldoc.lua src")
                .scope("src")
                .extension(".lua")
                .build(),
        )
        .build()
}

#[tokio::test]
async fn one_rename_runs_the_command_once() -> TestResult {
    init_tracing();
    let (_dir, root) = lua_project();
    fs::write(root.join("src/a.lua"), "return {}\n")?;
    let (mut observer, executor, _out) = start(&root, &docs_only())?;

    fs::rename(root.join("src/a.lua"), root.join("src/b.lua"))?;

    assert!(wait_until(WAIT, || executor.count("ldoc.lua src") >= 1).await);
    tokio::time::sleep(SETTLE).await;

    observer.stop();
    observer.join().await?;

    assert_eq!(executor.count("ldoc.lua src"), 1, "{:?}", executor.calls());
    Ok(())
}

#[tokio::test]
async fn renaming_a_directory_named_like_a_source_file_is_ignored() -> TestResult {
    init_tracing();
    let (_dir, root) = lua_project();
    fs::create_dir(root.join("src/old.lua"))?;
    let (mut observer, executor, _out) = start(&root, &docs_only())?;

    fs::rename(root.join("src/old.lua"), root.join("src/new.lua"))?;
    tokio::time::sleep(SETTLE).await;

    observer.stop();
    observer.join().await?;

    assert!(executor.calls().is_empty(), "{:?}", executor.calls());
    Ok(())
}

#[tokio::test]
async fn change_right_after_an_interrupt_is_seen() -> TestResult {
    init_tracing();
    let (_dir, root) = lua_project();
    let cfg = ConfigBuilder::new().with_default_actions().build();
    let options = WatchLoopOptions::from(cfg.settings());
    assert_eq!(options.interrupt_grace, Duration::from_secs(1));

    let executor = FakeExecutor::new();
    let out = SharedBuffer::new();
    let backend: Arc<dyn ExecutorBackend> = Arc::new(executor.clone());
    let mut inner = ConfigCycleFactory::new(root.clone(), cfg, backend, out.sink());

    let built = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&built);
    let factory = move |cycle: u64| {
        let observer = inner.build(cycle);
        counter.fetch_add(1, Ordering::SeqCst);
        observer
    };

    let (int_tx, int_rx) = mpsc::channel(4);
    let handle = tokio::spawn(WatchLoop::new(factory, options, int_rx).run());

    assert!(wait_until(WAIT, || built.load(Ordering::SeqCst) == 1).await);
    int_tx.send(()).await?;
    tokio::time::sleep(Duration::from_millis(200)).await;

    fs::File::create(root.join("src/foo.lua"))?;

    assert!(
        wait_until(WAIT, || executor.count("ldoc.lua src") >= 1 && executor.count("busted") >= 1)
            .await,
        "commands seen: {:?}",
        executor.calls()
    );
    tokio::time::sleep(SETTLE).await;
    assert_eq!(executor.count("ldoc.lua src"), 1);
    assert_eq!(executor.count("busted"), 1);
    assert_eq!(built.load(Ordering::SeqCst), 2);

    drop(int_tx);
    handle.await??;
    Ok(())
}
