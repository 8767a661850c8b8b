//! Metrics middleware for dispatches.
//!
//! Wraps every dispatch in a `tracing` span and records a counter and a
//! duration histogram through the `metrics` facade. Without an installed
//! recorder the `metrics` calls are no-ops.

use std::time::Instant;

use async_trait::async_trait;
use icedispatch_core::{IncomingRequest, ReplyStatus};
use tower::Layer;
use tracing::{info_span, Instrument};

use crate::dispatch::{DispatchResult, Dispatcher};

/// Counter of completed dispatches, labelled by `operation` and `outcome`.
pub const DISPATCH_TOTAL: &str = "icedispatch_dispatch_total";
/// Histogram of dispatch durations in seconds, labelled by `operation`.
pub const DISPATCH_DURATION: &str = "icedispatch_dispatch_duration_seconds";

// ---------------------------------------------------------------------------
// MetricsLayer
// ---------------------------------------------------------------------------

/// Layer that instruments dispatches with timing and counting.
#[derive(Debug, Clone)]
pub struct MetricsLayer;

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsMiddleware { inner }
    }
}

// ---------------------------------------------------------------------------
// MetricsMiddleware
// ---------------------------------------------------------------------------

/// Dispatcher wrapper that records dispatch duration and outcome.
#[derive(Debug, Clone)]
pub struct MetricsMiddleware<S> {
    inner: S,
}

fn outcome(result: &DispatchResult) -> &'static str {
    match result {
        Ok(resp) if resp.status == ReplyStatus::Ok => "ok",
        Ok(resp) if resp.status == ReplyStatus::UserException => "user_exception",
        Ok(resp) if resp.status.is_not_exist() => "not_exist",
        Ok(_) => "unknown",
        Err(_) => "error",
    }
}

#[async_trait]
impl<S: Dispatcher> Dispatcher for MetricsMiddleware<S> {
    async fn dispatch(&self, request: IncomingRequest) -> DispatchResult {
        let operation = request.current.operation.clone();
        let span = info_span!(
            "dispatch",
            identity = %request.current.identity,
            facet = %request.current.facet,
            operation = %operation,
            request_id = request.current.request_id,
            duration_ms = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );

        async move {
            let start = Instant::now();
            let result = self.inner.dispatch(request).await;
            let elapsed = start.elapsed();
            let outcome = outcome(&result);

            let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
            tracing::Span::current().record("duration_ms", duration_ms);
            tracing::Span::current().record("outcome", outcome);

            metrics::counter!(DISPATCH_TOTAL, "operation" => operation.clone(), "outcome" => outcome)
                .increment(1);
            metrics::histogram!(DISPATCH_DURATION, "operation" => operation)
                .record(elapsed.as_secs_f64());

            tracing::debug!(duration_ms, outcome, "dispatch complete");
            result
        }
        .instrument(span)
        .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
