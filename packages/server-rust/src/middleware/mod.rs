//! Middleware factories and the built-in middleware layers.
//!
//! A middleware factory turns the "next" dispatcher into a new dispatcher that
//! wraps it. Any `tower::Layer<DispatcherRef>` whose service is a
//! [`Dispatcher`] is a factory, so ad-hoc middleware is written with
//! [`layer_fn`] and the built-ins ship as layers:
//!
//! - [`load_shed`]: Semaphore-based concurrency limiting
//! - [`metrics`]: Dispatch timing and counting via `tracing` spans and `metrics`
//! - [`logger`]: Warnings for failed dispatches
//! - [`timeout`]: Per-dispatch timeout enforcement

use std::sync::Arc;

use tower::Layer;

use crate::dispatch::{Dispatcher, DispatcherRef};

pub mod load_shed;
pub mod logger;
pub mod metrics;
pub mod timeout;

pub use load_shed::LoadShedLayer;
pub use logger::LoggerLayer;
pub use metrics::MetricsLayer;
pub use timeout::TimeoutLayer;
pub use tower::layer::layer_fn;

/// Maps the next dispatcher of the chain to the dispatcher that wraps it.
pub trait MiddlewareFactory: Send + Sync + 'static {
    fn wrap(&self, next: DispatcherRef) -> DispatcherRef;
}

impl<L> MiddlewareFactory for L
where
    L: Layer<DispatcherRef> + Send + Sync + 'static,
    L::Service: Dispatcher + 'static,
{
    fn wrap(&self, next: DispatcherRef) -> DispatcherRef {
        Arc::new(self.layer(next))
    }
}

/// Type-erased factory as stored by pipeline builders.
pub type BoxedFactory = Arc<dyn MiddlewareFactory>;
