// src/engine/watch_loop.rs

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::engine::cycle::CycleFactory;
use crate::errors::{DevwatchError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchLoopOptions {
    /// An interrupt arriving within this long of the previous one ends the
    /// loop with [`DevwatchError::Interrupted`]. Zero disables the window.
    pub interrupt_grace: Duration,
}

impl From<&Settings> for WatchLoopOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            interrupt_grace: settings.interrupt_grace,
        }
    }
}

/// Watch, and on every interrupt tear everything down and start over.
///
/// Each cycle asks the factory for a fresh observer, starts it and waits
/// for an interrupt. On interrupt the observer is stopped and joined and the
/// next cycle is built and started straight away. The loop only returns when:
/// - starting a cycle fails (e.g. a scope is missing),
/// - a second interrupt arrives while stopping, or within `interrupt_grace`
///   of the previous one (`Interrupted`),
/// - the interrupt channel closes (`Ok`).
pub struct WatchLoop<F: CycleFactory> {
    factory: F,
    options: WatchLoopOptions,
    interrupts: mpsc::Receiver<()>,
}

impl<F: CycleFactory> WatchLoop<F> {
    pub fn new(factory: F, options: WatchLoopOptions, interrupts: mpsc::Receiver<()>) -> Self {
        Self {
            factory,
            options,
            interrupts,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut cycle: u64 = 0;
        let mut last_interrupt: Option<Instant> = None;

        loop {
            let mut observer = self.factory.build(cycle)?;
            observer.start()?;
            info!(cycle, registrations = observer.len(), "watching for changes");

            let interrupted = self.interrupts.recv().await.is_some();
            let received = Instant::now();

            observer.stop();
            tokio::select! {
                joined = observer.join() => joined?,
                Some(()) = self.interrupts.recv() => {
                    warn!(cycle, "second interrupt while stopping; exiting");
                    return Err(DevwatchError::Interrupted);
                }
            }
            drop(observer);

            if !interrupted {
                info!(cycle, "interrupt source closed; watch loop finished");
                return Ok(());
            }

            if self.within_grace(last_interrupt, received) {
                warn!(cycle, "second interrupt right after a restart; exiting");
                return Err(DevwatchError::Interrupted);
            }

            info!(cycle, "interrupt received; restarting watchers");
            last_interrupt = Some(received);
            cycle += 1;
            debug!(cycle, "rebuilding handlers");
        }
    }

    fn within_grace(&self, previous: Option<Instant>, now: Instant) -> bool {
        previous.is_some_and(|prev| now.duration_since(prev) < self.options.interrupt_grace)
    }
}
