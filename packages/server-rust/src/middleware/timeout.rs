//! Timeout middleware for dispatches.
//!
//! Fails dispatches that take longer than the configured budget with
//! `DispatchError::Timeout`. The inner future is dropped on expiry, which is
//! how cancellation reaches the inner stages.

use std::time::Duration;

use async_trait::async_trait;
use icedispatch_core::{DispatchError, IncomingRequest};
use tower::Layer;

use crate::dispatch::{DispatchResult, Dispatcher};

// ---------------------------------------------------------------------------
// TimeoutLayer
// ---------------------------------------------------------------------------

/// Layer that bounds the duration of every dispatch passing through it.
#[derive(Debug, Clone)]
pub struct TimeoutLayer {
    timeout: Duration,
}

impl TimeoutLayer {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl<S> Layer<S> for TimeoutLayer {
    type Service = TimeoutMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TimeoutMiddleware {
            inner,
            timeout: self.timeout,
        }
    }
}

// ---------------------------------------------------------------------------
// TimeoutMiddleware
// ---------------------------------------------------------------------------

/// Dispatcher wrapper that enforces the timeout.
#[derive(Debug, Clone)]
pub struct TimeoutMiddleware<S> {
    inner: S,
    timeout: Duration,
}

#[async_trait]
impl<S: Dispatcher> Dispatcher for TimeoutMiddleware<S> {
    async fn dispatch(&self, request: IncomingRequest) -> DispatchResult {
        match tokio::time::timeout(self.timeout, self.inner.dispatch(request)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(DispatchError::Timeout {
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
