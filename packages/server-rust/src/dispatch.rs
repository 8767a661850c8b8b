//! The dispatcher capability shared by servants, middleware, and built pipelines.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use icedispatch_core::{DispatchError, IncomingRequest, OutgoingResponse};

/// Result of dispatching one request.
pub type DispatchResult = Result<OutgoingResponse, DispatchError>;

/// Anything that accepts a request and eventually produces a response or fails.
///
/// Implemented by servants, by every middleware stage, and by the built
/// [`Pipeline`](crate::pipeline::Pipeline). `dispatch` takes `&self`, so one
/// instance serves any number of concurrent requests; state shared between
/// requests must be synchronized by the implementor.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, request: IncomingRequest) -> DispatchResult;
}

/// Shared, type-erased dispatcher. This is what middleware wraps.
pub type DispatcherRef = Arc<dyn Dispatcher>;

#[async_trait]
impl<D: Dispatcher + ?Sized> Dispatcher for Arc<D> {
    async fn dispatch(&self, request: IncomingRequest) -> DispatchResult {
        (**self).dispatch(request).await
    }
}

/// Dispatcher backed by an async closure. Created with [`dispatcher_fn`].
#[derive(Clone)]
pub struct DispatchFn<F> {
    f: F,
}

/// Wraps an async closure into a [`Dispatcher`].
pub fn dispatcher_fn<F, Fut>(f: F) -> DispatchFn<F>
where
    F: Fn(IncomingRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = DispatchResult> + Send + 'static,
{
    DispatchFn { f }
}

#[async_trait]
impl<F, Fut> Dispatcher for DispatchFn<F>
where
    F: Fn(IncomingRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = DispatchResult> + Send + 'static,
{
    async fn dispatch(&self, request: IncomingRequest) -> DispatchResult {
        (self.f)(request).await
    }
}

#[cfg(test)]
mod tests {
    use icedispatch_core::{Current, Identity, ReplyStatus};

    use super::*;

    fn request(payload: &'static [u8]) -> IncomingRequest {
        IncomingRequest::new(Current::new(Identity::new("echo"), "echo"), payload)
    }

    #[tokio::test]
    async fn closure_dispatcher_echoes() {
        let echo = dispatcher_fn(|req: IncomingRequest| async move {
            Ok(OutgoingResponse::ok(req.payload))
        });
        let resp = echo.dispatch(request(b"hi")).await.unwrap();
        assert_eq!(&resp.payload[..], b"hi");
    }

    #[tokio::test]
    async fn arc_dispatcher_delegates() {
        let failing: DispatcherRef = Arc::new(dispatcher_fn(|req: IncomingRequest| async move {
            Err(DispatchError::operation_not_exist(&req.current))
        }));
        let err = Arc::new(failing).dispatch(request(b"")).await.unwrap_err();
        assert_eq!(err.reply_status(), ReplyStatus::OperationNotExist);
    }
}
