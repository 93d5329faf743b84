// src/engine/interrupt.rs

use tokio::sync::mpsc;
use tracing::{debug, error};

/// Forward every Ctrl-C to the returned channel.
///
/// Installing the handler replaces the default "terminate on SIGINT"
/// behaviour, so the watch loop decides what an interrupt means.
pub fn spawn_interrupt_listener() -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel::<()>(8);

    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for Ctrl+C; interrupts disabled");
                // Keep the sender alive so the watch loop keeps watching.
                std::future::pending::<()>().await;
            }
            debug!("Ctrl+C received");
            if tx.send(()).await.is_err() {
                break;
            }
        }
    });

    rx
}
