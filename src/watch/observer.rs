// src/watch/observer.rs

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::anyhow;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::{DevwatchError, Result};
use crate::watch::event::{FsEvent, RenameCoalescer};
use crate::watch::handler::ChangeHandler;

/// One `(scope, recursive, handler)` registration.
#[derive(Debug, Clone)]
struct Registration {
    scope: PathBuf,
    recursive: bool,
    handler: ChangeHandler,
}

/// How long the source half of a rename waits for its destination before
/// it is dispatched on its own.
const RENAME_PAIR_WINDOW: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
enum Payload {
    /// Straight from the slot's watcher; still to be coalesced.
    Notify(notify::Event),
    Event(FsEvent),
}

/// Something addressed to the handler registered in `slot`.
#[derive(Debug, Clone)]
struct Delivery {
    slot: usize,
    payload: Payload,
}

/// Feeds events into a running [`Observer`] as if a watcher had reported
/// them for the given registration slot.
#[derive(Debug, Clone)]
pub struct EventInjector {
    tx: mpsc::UnboundedSender<Delivery>,
}

impl EventInjector {
    /// Returns false once the observer's worker is gone.
    pub fn inject(&self, slot: usize, event: FsEvent) -> bool {
        self.send(slot, Payload::Event(event))
    }

    /// Deliver a raw watcher notification, coalesced like a real one.
    pub fn inject_notify(&self, slot: usize, event: notify::Event) -> bool {
        self.send(slot, Payload::Notify(event))
    }

    fn send(&self, slot: usize, payload: Payload) -> bool {
        self.tx.send(Delivery { slot, payload }).is_ok()
    }
}

/// Owns the filesystem watchers for one watch cycle.
///
/// Lifecycle: [`schedule`](Observer::schedule) registrations, then
/// [`start`](Observer::start), later [`stop`](Observer::stop) and
/// [`join`](Observer::join). An observer is not restartable; the watch loop
/// builds a fresh one per cycle.
///
/// Each registration gets its own `notify` watcher, so an event is routed
/// to a handler only through the scope that handler was registered for.
/// All watchers feed one worker task, which runs handlers strictly one at a
/// time.
pub struct Observer {
    registrations: Vec<Registration>,
    tx: mpsc::UnboundedSender<Delivery>,
    rx: Option<mpsc::UnboundedReceiver<Delivery>>,
    watchers: Vec<RecommendedWatcher>,
    cancel: CancellationToken,
    worker: Option<JoinHandle<()>>,
}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("registrations", &self.registrations)
            .field("started", &self.rx.is_none())
            .field("stopped", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl Default for Observer {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            registrations: Vec::new(),
            tx,
            rx: Some(rx),
            watchers: Vec::new(),
            cancel: CancellationToken::new(),
            worker: None,
        }
    }

    /// Register `handler` for changes under `scope`. Returns its slot.
    pub fn schedule(
        &mut self,
        handler: ChangeHandler,
        scope: impl Into<PathBuf>,
        recursive: bool,
    ) -> usize {
        self.registrations.push(Registration {
            scope: scope.into(),
            recursive,
            handler,
        });
        self.registrations.len() - 1
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn injector(&self) -> EventInjector {
        EventInjector {
            tx: self.tx.clone(),
        }
    }

    /// Start one watcher per registration and the delivery worker.
    ///
    /// Fails if a scope cannot be watched (e.g. it does not exist). Must be
    /// called inside a Tokio runtime.
    pub fn start(&mut self) -> Result<()> {
        let mut rx = self
            .rx
            .take()
            .ok_or_else(|| DevwatchError::Other(anyhow!("observer already started")))?;

        for (slot, reg) in self.registrations.iter().enumerate() {
            let mut watcher =
                RecommendedWatcher::new(forwarder(slot, self.tx.clone()), Config::default())?;

            let mode = if reg.recursive {
                RecursiveMode::Recursive
            } else {
                RecursiveMode::NonRecursive
            };
            watcher.watch(&reg.scope, mode)?;

            info!(
                handler = %reg.handler.name(),
                scope = ?reg.scope,
                recursive = reg.recursive,
                "watching"
            );
            self.watchers.push(watcher);
        }

        let handlers: Vec<ChangeHandler> = self
            .registrations
            .iter()
            .map(|reg| reg.handler.clone())
            .collect();
        let cancel = self.cancel.clone();

        self.worker = Some(tokio::spawn(async move {
            let mut coalescers: Vec<RenameCoalescer> =
                handlers.iter().map(|_| RenameCoalescer::new()).collect();

            loop {
                let waiting = coalescers.iter().any(RenameCoalescer::has_pending);
                let next = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    next = rx.recv() => match next {
                        Some(d) => Some(d),
                        None => break,
                    },
                    _ = tokio::time::sleep(RENAME_PAIR_WINDOW), if waiting => None,
                };

                let batch: Vec<(usize, FsEvent)> = match next {
                    None => coalescers
                        .iter_mut()
                        .enumerate()
                        .filter_map(|(slot, c)| c.flush().map(|event| (slot, event)))
                        .collect(),
                    Some(Delivery {
                        slot,
                        payload: Payload::Notify(event),
                    }) => match coalescers.get_mut(slot) {
                        Some(c) => c.push(&event).into_iter().map(|e| (slot, e)).collect(),
                        None => vec![],
                    },
                    Some(Delivery {
                        slot,
                        payload: Payload::Event(event),
                    }) => vec![(slot, event)],
                };

                for (slot, event) in batch {
                    match handlers.get(slot) {
                        Some(handler) => {
                            handler.on_event(&event).await;
                        }
                        None => warn!(slot, "event for unknown registration slot"),
                    }
                }
            }
            debug!("observer worker finished");
        }));

        Ok(())
    }

    /// Stop watching. Events not yet delivered are dropped; an action that is
    /// already running finishes first.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        self.watchers.clear();
    }

    /// Wait for the delivery worker to terminate.
    pub async fn join(&mut self) -> Result<()> {
        if let Some(worker) = self.worker.take() {
            worker
                .await
                .map_err(|e| DevwatchError::Other(anyhow!("observer worker failed: {e}")))?;
        }
        Ok(())
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Callback run by `notify` on its own thread for registration `slot`.
fn forwarder(
    slot: usize,
    tx: mpsc::UnboundedSender<Delivery>,
) -> impl FnMut(notify::Result<Event>) + Send + 'static {
    move |res: notify::Result<Event>| match res {
        Ok(event) => {
            // A closed channel means the worker is gone; nothing to do.
            let _ = tx.send(Delivery {
                slot,
                payload: Payload::Notify(event),
            });
        }
        Err(err) => warn!(slot, error = %err, "file watch error"),
    }
}
