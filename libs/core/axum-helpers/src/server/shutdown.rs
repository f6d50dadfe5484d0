use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

/// Broadcasts a single shutdown transition to any number of waiters.
///
/// Clones share state. Once [`shutdown`](Self::shutdown) has been called every
/// current and future [`wait`](Self::wait) resolves immediately.
#[derive(Clone, Debug)]
pub struct ShutdownCoordinator {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn shutdown(&self) {
        let first = self.tx.send_if_modified(|flag| !std::mem::replace(flag, true));
        if first {
            info!("Initiating graceful shutdown");
        }
    }

    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as self, so this cannot fail.
        let _ = rx.wait_for(|flag| *flag).await;
    }

    /// Waits for SIGINT or SIGTERM and then triggers shutdown.
    pub async fn listen_for_signals(&self) {
        shutdown_signal().await;
        self.shutdown();
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves on Ctrl+C or SIGTERM. A handler that fails to install is logged
/// and then never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
