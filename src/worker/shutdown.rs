//! Cooperative shutdown flag and signal wiring.
//!
//! The flag is a single-writer atomic set from the signal task and read
//! by the run loop at pass boundaries only. An in-flight materialization
//! is never interrupted; the process exits between passes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::info;
use tokio::sync::Notify;

/// Shared stop flag checked at pass boundaries.
#[derive(Clone, Default)]
pub struct ShutdownFlag {
    stop: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ShutdownFlag {
    /// Create a new, unset flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown. Wakes any task waiting in [`requested`].
    ///
    /// [`requested`]: ShutdownFlag::requested
    pub fn request(&self) {
        self.stop.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Whether shutdown has been requested
    pub fn is_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Resolve once shutdown is requested. Used to cut the inter-pass
    /// sleep short.
    pub async fn requested(&self) {
        loop {
            // Register the waiter before checking, so a request landing
            // in between is not missed
            let notified = self.notify.notified();
            if self.is_requested() {
                return;
            }
            notified.await;
        }
    }
}

/// Spawn a task that sets the flag on SIGINT or SIGTERM.
#[cfg(unix)]
pub fn listen_for_signals(flag: ShutdownFlag) -> std::io::Result<tokio::task::JoinHandle<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    Ok(tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM, stopping after current pass");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, stopping after current pass");
            }
        }
        flag.request();
    }))
}

/// Spawn a task that sets the flag on Ctrl-C.
#[cfg(not(unix))]
pub fn listen_for_signals(flag: ShutdownFlag) -> std::io::Result<tokio::task::JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, stopping after current pass");
        }
        flag.request();
    }))
}
