// src/watch/handler.rs

//! Extension-filtered dispatch of filesystem events to actions.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::watch::event::FsEvent;
use crate::watch::ext::{classify, ExtensionSet};
use crate::watch::patterns::ExcludeFilter;

/// Future returned by [`Action::call`].
pub type ActionFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Something to do when a matching file changes.
///
/// Production code uses [`crate::exec::CommandRunner`]; tests substitute
/// recording doubles.
pub trait Action: Send + Sync {
    fn call<'a>(&'a self, event: &'a FsEvent) -> ActionFuture<'a>;
}

/// Wraps a plain closure as an [`Action`].
pub fn from_fn<F>(f: F) -> Arc<dyn Action>
where
    F: Fn(&FsEvent) + Send + Sync + 'static,
{
    Arc::new(FnAction(f))
}

struct FnAction<F>(F);

impl<F> Action for FnAction<F>
where
    F: Fn(&FsEvent) + Send + Sync,
{
    fn call<'a>(&'a self, event: &'a FsEvent) -> ActionFuture<'a> {
        (self.0)(event);
        Box::pin(async {})
    }
}

/// Binds a fixed set of extensions to one action.
#[derive(Clone)]
pub struct ChangeHandler {
    name: String,
    extensions: ExtensionSet,
    exclude: Option<ExcludeFilter>,
    action: Arc<dyn Action>,
}

impl fmt::Debug for ChangeHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeHandler")
            .field("name", &self.name)
            .field("extensions", &self.extensions)
            .field("exclude", &self.exclude)
            .finish_non_exhaustive()
    }
}

impl ChangeHandler {
    pub fn new(extensions: impl Into<ExtensionSet>, action: Arc<dyn Action>) -> Self {
        Self {
            name: "handler".to_string(),
            extensions: extensions.into(),
            exclude: None,
            action,
        }
    }

    /// Name used in logs.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_exclude(mut self, exclude: ExcludeFilter) -> Self {
        self.exclude = Some(exclude);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extensions(&self) -> &ExtensionSet {
        &self.extensions
    }

    /// Whether `event` would invoke the action.
    pub fn matches(&self, event: &FsEvent) -> bool {
        if event.is_directory {
            return false;
        }
        if let Some(exclude) = &self.exclude {
            if exclude.is_excluded(&event.path) {
                trace!(handler = %self.name, path = ?event.path, "path excluded");
                return false;
            }
        }
        self.extensions.contains(&classify(&event.path))
    }

    /// Invoke the action for a matching file event; ignore everything else.
    ///
    /// Returns whether the action ran.
    pub async fn on_event(&self, event: &FsEvent) -> bool {
        if !self.matches(event) {
            return false;
        }

        debug!(
            handler = %self.name,
            path = ?event.path,
            kind = ?event.kind,
            "change matched; invoking action"
        );
        self.action.call(event).await;
        true
    }
}
