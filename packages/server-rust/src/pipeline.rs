//! Pipeline composition: folds middleware factories around a terminal dispatcher.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use icedispatch_core::{DispatchError, IncomingRequest, OutgoingResponse};

use crate::dispatch::{DispatchResult, Dispatcher, DispatcherRef};
use crate::middleware::{BoxedFactory, MiddlewareFactory};

// ---------------------------------------------------------------------------
// PipelineBuilder
// ---------------------------------------------------------------------------

/// Accumulates middleware factories in installation order.
///
/// Installation order is inbound-visit order: with factories `F1, F2, F3` and
/// terminal `T` the built chain is `F1(F2(F3(T)))`, so a request visits
/// `F1 -> F2 -> F3 -> T` and the response travels back `T -> F3 -> F2 -> F1`.
/// This matches `tower::ServiceBuilder`, where the first layer added is the
/// outermost.
#[derive(Default, Clone)]
pub struct PipelineBuilder {
    factories: Vec<BoxedFactory>,
}

impl PipelineBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a middleware factory. The first one installed ends up outermost.
    pub fn use_middleware<F: MiddlewareFactory>(&mut self, factory: F) -> &mut Self {
        self.factories.push(Arc::new(factory));
        self
    }

    /// Number of installed factories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Builds the chain around `terminal`.
    ///
    /// The builder is left untouched, so building again from the same factory
    /// sequence produces a chain with identical dispatch order.
    #[must_use]
    pub fn build(&self, terminal: DispatcherRef) -> Pipeline {
        let chain = self
            .factories
            .iter()
            .rev()
            .fold(terminal, |next, factory| factory.wrap(next));
        Pipeline {
            chain,
            depth: self.factories.len(),
        }
    }
}

impl fmt::Debug for PipelineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineBuilder")
            .field("factories", &self.factories.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// A built, immutable dispatch chain.
///
/// Cloning is cheap and every clone shares the same chain, so one pipeline can
/// be handed to any number of concurrent callers. Besides [`Dispatcher`] it
/// implements `tower::Service<IncomingRequest>` for transports built on tower.
#[derive(Clone)]
pub struct Pipeline {
    chain: DispatcherRef,
    depth: usize,
}

impl Pipeline {
    /// Number of middleware stages in front of the terminal dispatcher.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline").field("depth", &self.depth).finish()
    }
}

#[async_trait]
impl Dispatcher for Pipeline {
    async fn dispatch(&self, request: IncomingRequest) -> DispatchResult {
        self.chain.dispatch(request).await
    }
}

impl tower::Service<IncomingRequest> for Pipeline {
    type Response = OutgoingResponse;
    type Error = DispatchError;
    type Future = Pin<Box<dyn Future<Output = DispatchResult> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: IncomingRequest) -> Self::Future {
        let chain = Arc::clone(&self.chain);
        Box::pin(async move { chain.dispatch(request).await })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
