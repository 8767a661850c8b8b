//! Logging middleware for dispatches.
//!
//! Mirrors the `Ice.Warn.Dispatch` property: level 1 warns about dispatches
//! that fail or produce an `Unknown*` reply, level 2 additionally warns about
//! `*NotExist` replies. Level 0 only traces. User exceptions are part of an
//! operation's contract and never produce a warning.

use async_trait::async_trait;
use icedispatch_core::{IncomingRequest, ReplyStatus};
use tower::Layer;
use tracing::{trace, warn};

use crate::dispatch::{DispatchResult, Dispatcher};

/// Layer that logs dispatch failures according to a warning level.
#[derive(Debug, Clone)]
pub struct LoggerLayer {
    warning_level: u8,
}

impl LoggerLayer {
    #[must_use]
    pub fn new(warning_level: u8) -> Self {
        Self { warning_level }
    }
}

impl<S> Layer<S> for LoggerLayer {
    type Service = LoggerMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggerMiddleware {
            inner,
            warning_level: self.warning_level,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerMiddleware<S> {
    inner: S,
    warning_level: u8,
}

impl<S> LoggerMiddleware<S> {
    /// Whether a reply with `status` is worth a warning at this level.
    fn warns_on(&self, status: ReplyStatus) -> bool {
        (status.is_unknown() && self.warning_level >= 1)
            || (status.is_not_exist() && self.warning_level >= 2)
    }
}

#[async_trait]
impl<S: Dispatcher> Dispatcher for LoggerMiddleware<S> {
    async fn dispatch(&self, request: IncomingRequest) -> DispatchResult {
        let identity = request.current.identity.clone();
        let facet = request.current.facet.clone();
        let operation = request.current.operation.clone();

        trace!(%identity, %facet, %operation, "dispatching request");
        let result = self.inner.dispatch(request).await;

        match &result {
            Ok(resp) if self.warns_on(resp.status) => warn!(
                %identity,
                %facet,
                %operation,
                status = %resp.status,
                message = resp.message.as_deref().unwrap_or_default(),
                "dispatch replied with failure"
            ),
            Ok(resp) => trace!(%identity, %operation, status = %resp.status, "dispatch replied"),
            Err(err) if self.warning_level >= 1 => {
                warn!(%identity, %facet, %operation, error = %err, "dispatch failed");
            }
            Err(err) => trace!(%identity, %operation, error = %err, "dispatch failed"),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use icedispatch_core::{Current, DispatchError, Identity, OutgoingResponse};

    use super::*;
    use crate::dispatch::dispatcher_fn;

    fn middleware(level: u8) -> LoggerMiddleware<()> {
        LoggerLayer::new(level).layer(())
    }

    #[test]
    fn level_zero_never_warns() {
        let mw = middleware(0);
        assert!(!mw.warns_on(ReplyStatus::UnknownException));
        assert!(!mw.warns_on(ReplyStatus::ObjectNotExist));
    }

    #[test]
    fn level_one_warns_on_unknown_only() {
        let mw = middleware(1);
        assert!(mw.warns_on(ReplyStatus::UnknownLocalException));
        assert!(!mw.warns_on(ReplyStatus::FacetNotExist));
        assert!(!mw.warns_on(ReplyStatus::UserException));
        assert!(!mw.warns_on(ReplyStatus::Ok));
    }

    #[test]
    fn level_two_warns_on_not_exist() {
        let mw = middleware(2);
        assert!(mw.warns_on(ReplyStatus::OperationNotExist));
        assert!(mw.warns_on(ReplyStatus::UnknownUserException));
        assert!(!mw.warns_on(ReplyStatus::UserException));
    }

    #[tokio::test]
    async fn result_is_unchanged() {
        let svc = LoggerLayer::new(2).layer(dispatcher_fn(|req: IncomingRequest| async move {
            Ok(OutgoingResponse::from_error(&DispatchError::object_not_exist(
                &req.current,
            )))
        }));
        let request = IncomingRequest::empty(Current::new(Identity::new("ghost"), "ping"));
        let resp = svc.dispatch(request).await.unwrap();
        assert_eq!(resp.status, ReplyStatus::ObjectNotExist);
    }
}
