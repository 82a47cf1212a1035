//! # Mutations
//!
//! A write operation packaged for views: await it, or fire it and forget.

use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::error;

use crate::error::ApiError;

type Run<I, O> = dyn Fn(I) -> BoxFuture<'static, Result<O, ApiError>> + Send + Sync;

/// One kind of write (create product, delete product, ...).
///
/// Cloning shares the pending counter, so every clone reports the same
/// [`is_pending`](Self::is_pending).
pub struct Mutation<I, O> {
    name: &'static str,
    run: Arc<Run<I, O>>,
    pending: Arc<AtomicUsize>,
}

impl<I, O> Clone for Mutation<I, O> {
    fn clone(&self) -> Self {
        Mutation {
            name: self.name,
            run: Arc::clone(&self.run),
            pending: Arc::clone(&self.pending),
        }
    }
}

/// Decrements the pending count when the write finishes or is dropped.
struct PendingGuard(Arc<AtomicUsize>);

impl PendingGuard {
    fn enter(pending: &Arc<AtomicUsize>) -> Self {
        pending.fetch_add(1, Ordering::SeqCst);
        PendingGuard(Arc::clone(pending))
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<I, O> Mutation<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    pub fn new<F, Fut>(name: &'static str, operation: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, ApiError>> + Send + 'static,
    {
        let run: Arc<Run<I, O>> = Arc::new(move |input: I| operation(input).boxed());
        Mutation {
            name,
            run,
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Runs the write and returns its outcome to the caller.
    pub async fn mutate_async(&self, input: I) -> Result<O, ApiError> {
        let _pending = PendingGuard::enter(&self.pending);
        (self.run)(input).await
    }

    /// Runs the write in the background; failures are logged.
    pub fn mutate(&self, input: I) -> JoinHandle<()> {
        let mutation = self.clone();
        // Counted before the task starts so callers see it immediately.
        let pending = PendingGuard::enter(&self.pending);
        tokio::spawn(async move {
            let _pending = pending;
            if let Err(e) = (mutation.run)(input).await {
                error!(mutation = mutation.name, error = %e, "Mutation failed");
            }
        })
    }

    /// Whether any write of this kind is running.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }
}
