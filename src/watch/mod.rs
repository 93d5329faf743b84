// src/watch/mod.rs

//! File watching and change dispatch.
//!
//! This module is responsible for:
//! - Classifying changed paths by extension.
//! - Binding extension sets to actions ([`ChangeHandler`]).
//! - Wiring up a cross-platform filesystem watcher (`notify`) per watch
//!   scope and delivering its events to the handlers, one at a time.
//!
//! It does **not** know what the actions do; running commands lives in
//! [`crate::exec`].

pub mod event;
pub mod ext;
pub mod handler;
pub mod observer;
pub mod patterns;

pub use event::{ChangeKind, FsEvent};
pub use ext::{classify, ExtensionSet};
pub use handler::{from_fn, Action, ActionFuture, ChangeHandler};
pub use observer::{EventInjector, Observer};
pub use patterns::ExcludeFilter;
