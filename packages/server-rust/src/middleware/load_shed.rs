//! Load-shedding middleware for dispatches.
//!
//! Rejects dispatches while `max_concurrent` dispatches are already in flight
//! through the same layer, with `DispatchError::Overloaded`.

use std::sync::Arc;

use async_trait::async_trait;
use icedispatch_core::{DispatchError, IncomingRequest};
use tokio::sync::Semaphore;
use tower::Layer;

use crate::dispatch::{DispatchResult, Dispatcher};

// ---------------------------------------------------------------------------
// LoadShedLayer
// ---------------------------------------------------------------------------

/// Layer that limits concurrent dispatches via a semaphore.
///
/// When all permits are taken, incoming requests are rejected immediately
/// rather than queued. Every middleware built from one layer shares its permits.
#[derive(Debug, Clone)]
pub struct LoadShedLayer {
    semaphore: Arc<Semaphore>,
}

impl LoadShedLayer {
    /// Create a new `LoadShedLayer` with the given concurrency limit.
    ///
    /// Limits above `Semaphore::MAX_PERMITS` are clamped to it.
    #[must_use]
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.min(Semaphore::MAX_PERMITS))),
        }
    }

    /// Number of dispatches that can still be admitted right now.
    #[must_use]
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

impl<S> Layer<S> for LoadShedLayer {
    type Service = LoadShedMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoadShedMiddleware {
            inner,
            semaphore: self.semaphore.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// LoadShedMiddleware
// ---------------------------------------------------------------------------

/// Dispatcher wrapper that enforces the concurrency limit.
#[derive(Debug, Clone)]
pub struct LoadShedMiddleware<S> {
    inner: S,
    semaphore: Arc<Semaphore>,
}

#[async_trait]
impl<S: Dispatcher> Dispatcher for LoadShedMiddleware<S> {
    async fn dispatch(&self, request: IncomingRequest) -> DispatchResult {
        let Ok(permit) = self.semaphore.clone().try_acquire_owned() else {
            tracing::debug!(operation = %request.current.operation, "dispatch shed");
            return Err(DispatchError::Overloaded);
        };

        // The permit is released when this future completes or is dropped.
        let result = self.inner.dispatch(request).await;
        drop(permit);
        result
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
