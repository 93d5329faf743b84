// src/engine/mod.rs

//! The outer watch loop.
//!
//! - [`cycle`] turns the validated config into a fresh [`Observer`] per
//!   cycle (`CycleFactory`).
//! - [`watch_loop`] drives cycles: watch until interrupted, stop, join,
//!   rebuild, repeat.
//! - [`interrupt`] turns Ctrl-C into messages on a channel.
//!
//! [`Observer`]: crate::watch::Observer

pub mod cycle;
pub mod interrupt;
pub mod watch_loop;

pub use cycle::{build_observer, scope_path, ConfigCycleFactory, CycleFactory};
pub use interrupt::spawn_interrupt_listener;
pub use watch_loop::{WatchLoop, WatchLoopOptions};
