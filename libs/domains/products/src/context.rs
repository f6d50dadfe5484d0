//! Per-request carrier for the request id, deadline and cancellation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};

/// Trips every [`CancellationSignal`] created from it. Clones share state.
#[derive(Debug, Clone)]
pub struct CancellationHandle {
    tx: Arc<watch::Sender<bool>>,
}

/// Observes a [`CancellationHandle`].
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    rx: watch::Receiver<bool>,
}

impl CancellationHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn signal(&self) -> CancellationSignal {
        CancellationSignal {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for CancellationHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationSignal {
    /// A signal nobody can trip
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled. Pends forever if the handle was dropped
    /// without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    deadline: Option<Instant>,
    cancellation: CancellationSignal,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            deadline: None,
            cancellation: CancellationSignal::never(),
        }
    }

    /// A context for work that is not tied to an inbound request
    pub fn background() -> Self {
        Self::new(Uuid::now_v7().to_string())
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancellation(mut self, signal: CancellationSignal) -> Self {
        self.cancellation = signal;
        self
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Drives `work` unless the context is cancelled or its deadline passes
    /// first, in which case `work` is dropped and `Cancelled` is returned.
    ///
    /// An already-cancelled context never polls `work`.
    pub async fn run<T, F>(&self, operation: &str, work: F) -> ProductResult<T>
    where
        F: Future<Output = ProductResult<T>>,
    {
        if self.is_cancelled() {
            return Err(ProductError::cancelled(operation));
        }

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => {
                tracing::debug!(request_id = %self.request_id, operation, "Operation cancelled");
                Err(ProductError::cancelled(operation))
            }
            _ = deadline => {
                tracing::warn!(request_id = %self.request_id, operation, "Operation exceeded deadline");
                Err(ProductError::cancelled(operation))
            }
            result = work => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_run_returns_work_result() {
        let ctx = RequestContext::new("req-1");
        let value = ctx.run("find", async { Ok::<_, ProductError>(7) }).await.unwrap();
        assert_eq!(value, 7);
        assert_eq!(ctx.request_id(), "req-1");
    }

    #[tokio::test]
    async fn test_pre_cancelled_context_never_polls_work() {
        let handle = CancellationHandle::new();
        let ctx = RequestContext::new("req-2").with_cancellation(handle.signal());
        handle.cancel();

        let polled = AtomicBool::new(false);
        let err = ctx
            .run("store", async {
                polled.store(true, Ordering::SeqCst);
                Ok::<_, ProductError>(())
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert!(err.to_string().contains("store"));
        assert!(!polled.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_pending_work() {
        let handle = CancellationHandle::new();
        let ctx = RequestContext::new("req-3").with_cancellation(handle.signal());

        let canceller = handle.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let err = ctx
            .run("find_all", std::future::pending::<ProductResult<()>>())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn test_deadline_interrupts_pending_work() {
        let ctx = RequestContext::new("req-4").with_timeout(Duration::from_millis(20));
        let err = ctx
            .run("find", std::future::pending::<ProductResult<()>>())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_dropped_handle_does_not_cancel() {
        let signal = CancellationHandle::new().signal();
        let ctx = RequestContext::background().with_cancellation(signal);
        assert!(!ctx.is_cancelled());
        assert!(ctx.run("find", async { Ok::<_, ProductError>(()) }).await.is_ok());
    }
}
