//! The object adapter: servants, middleware, and the pipeline that joins them.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use icedispatch_core::{Identity, IncomingRequest, OutgoingResponse};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info};

use super::lifecycle::{AdapterState, LifecycleController};
use crate::config::AdapterConfig;
use crate::dispatch::{Dispatcher, DispatcherRef};
use crate::error::AdapterError;
use crate::middleware::{LoadShedLayer, LoggerLayer, MetricsLayer, MiddlewareFactory, TimeoutLayer};
use crate::pipeline::{Pipeline, PipelineBuilder};
use crate::servant::ServantManager;

/// Hosts servants and dispatches requests to them through a middleware pipeline.
///
/// Lifecycle (see [`AdapterState`]):
/// 1. `Unbuilt` -- `use_middleware` appends factories; servants can be added
/// 2. `Built` -- the pipeline was built by `activate()`, `dispatch_pipeline()`
///    or the first `dispatch()`; `use_middleware` now fails with `PipelineFrozen`
/// 3. `Destroyed` -- `destroy()` was called; new dispatches fail with
///    `Deactivated` while in-flight ones run to completion
///
/// Installing middleware and building the pipeline are serialized by one
/// mutex, so a registration can never race with the build.
pub struct ObjectAdapter {
    config: AdapterConfig,
    servants: Arc<ServantManager>,
    /// Pending factories; `None` once the pipeline is built.
    builder: Mutex<Option<PipelineBuilder>>,
    pipeline: OnceLock<Pipeline>,
    lifecycle: LifecycleController,
}

impl ObjectAdapter {
    /// Creates an adapter and installs the built-in middleware the config asks for.
    ///
    /// Built-ins come first, so they wrap all user middleware. Order (outermost
    /// to innermost):
    /// 1. `LoadShedLayer` -- reject when overloaded (fail fast before doing any work)
    /// 2. `MetricsLayer` -- record timing and outcome of everything below
    /// 3. `LoggerLayer` -- warn about failures, including those of user middleware
    /// 4. `TimeoutLayer` -- bound the time spent in user middleware and servants
    #[must_use]
    pub fn new(config: AdapterConfig) -> Self {
        let mut builder = PipelineBuilder::new();
        if config.max_dispatches > 0 {
            builder.use_middleware(LoadShedLayer::new(config.max_dispatches));
        }
        if config.metrics {
            builder.use_middleware(MetricsLayer);
        }
        if config.warn_dispatch > 0 {
            builder.use_middleware(LoggerLayer::new(config.warn_dispatch));
        }
        if let Some(timeout) = config.dispatch_timeout {
            builder.use_middleware(TimeoutLayer::new(timeout));
        }

        info!(adapter = %config.name, builtins = builder.len(), "object adapter created");

        Self {
            config,
            servants: Arc::new(ServantManager::new()),
            builder: Mutex::new(Some(builder)),
            pipeline: OnceLock::new(),
            lifecycle: LifecycleController::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[must_use]
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> AdapterState {
        self.lifecycle.state()
    }

    fn deactivated(&self) -> AdapterError {
        AdapterError::Deactivated {
            adapter: self.config.name.clone(),
        }
    }

    fn ensure_active(&self) -> Result<(), AdapterError> {
        if self.lifecycle.state() == AdapterState::Destroyed {
            return Err(self.deactivated());
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Middleware and pipeline
    // -----------------------------------------------------------------------

    /// Appends a middleware factory to the pipeline.
    ///
    /// The first factory installed sees each request first and its response
    /// last. Returns `self` so calls chain with `?`.
    ///
    /// # Errors
    ///
    /// `PipelineFrozen` once the pipeline is built, `Deactivated` after `destroy()`.
    pub fn use_middleware<F: MiddlewareFactory>(&self, factory: F) -> Result<&Self, AdapterError> {
        let mut pending = self.builder.lock();
        self.ensure_active()?;
        match pending.as_mut() {
            Some(builder) => {
                builder.use_middleware(factory);
                debug!(adapter = %self.config.name, installed = builder.len(), "middleware installed");
                Ok(self)
            }
            None => Err(AdapterError::PipelineFrozen {
                adapter: self.config.name.clone(),
            }),
        }
    }

    /// Returns the dispatch pipeline, building and freezing it on first use.
    ///
    /// # Errors
    ///
    /// `Deactivated` after `destroy()`.
    pub fn dispatch_pipeline(&self) -> Result<Pipeline, AdapterError> {
        if let Some(pipeline) = self.pipeline.get() {
            self.ensure_active()?;
            return Ok(pipeline.clone());
        }

        let mut pending = self.builder.lock();
        self.ensure_active()?;
        if let Some(pipeline) = self.pipeline.get() {
            return Ok(pipeline.clone());
        }

        let builder = pending.take().unwrap_or_default();
        let terminal: DispatcherRef = self.servants.clone();
        let pipeline = self.pipeline.get_or_init(|| builder.build(terminal)).clone();
        self.lifecycle.mark_built();
        info!(adapter = %self.config.name, depth = pipeline.depth(), "dispatch pipeline built");
        Ok(pipeline)
    }

    /// Builds the pipeline eagerly. Calling it again while built is a no-op.
    ///
    /// # Errors
    ///
    /// `Deactivated` after `destroy()`.
    pub fn activate(&self) -> Result<(), AdapterError> {
        self.dispatch_pipeline().map(|_| ())
    }

    /// Dispatches one request through the pipeline.
    ///
    /// A request arriving while the adapter is `Unbuilt` builds the pipeline
    /// first, exactly like `activate()`. Request-level failures that escape the
    /// pipeline are converted into error replies; only lifecycle violations
    /// are returned as `Err`.
    ///
    /// # Errors
    ///
    /// `Deactivated` after `destroy()`.
    pub async fn dispatch(&self, request: IncomingRequest) -> Result<OutgoingResponse, AdapterError> {
        // Register before checking the state so `wait_for_deactivate` cannot miss us.
        let _in_flight = self.lifecycle.in_flight_guard();
        let pipeline = self.dispatch_pipeline()?;

        match pipeline.dispatch(request).await {
            Ok(response) => Ok(response),
            Err(err) => Ok(OutgoingResponse::from_error(&err)),
        }
    }

    // -----------------------------------------------------------------------
    // Servants
    // -----------------------------------------------------------------------

    /// Registers `servant` for the default facet of `identity`.
    ///
    /// # Errors
    ///
    /// `IllegalIdentity`, `AlreadyRegistered`, or `Deactivated`.
    pub fn add(&self, servant: DispatcherRef, identity: Identity) -> Result<(), AdapterError> {
        self.add_facet(servant, identity, "")
    }

    /// Registers `servant` for `facet` of `identity`.
    ///
    /// # Errors
    ///
    /// `IllegalIdentity`, `AlreadyRegistered`, or `Deactivated`.
    pub fn add_facet(
        &self,
        servant: DispatcherRef,
        identity: Identity,
        facet: &str,
    ) -> Result<(), AdapterError> {
        self.ensure_active()?;
        self.servants.add_servant(servant, identity, facet)
    }

    /// Registers a default servant for `category`.
    ///
    /// # Errors
    ///
    /// `DefaultServantAlreadyRegistered` or `Deactivated`.
    pub fn add_default_servant(
        &self,
        servant: DispatcherRef,
        category: &str,
    ) -> Result<(), AdapterError> {
        self.ensure_active()?;
        self.servants.add_default_servant(servant, category)
    }

    /// Removes the default-facet servant of `identity`.
    ///
    /// # Errors
    ///
    /// `NotRegistered` or `Deactivated`.
    pub fn remove(&self, identity: &Identity) -> Result<DispatcherRef, AdapterError> {
        self.remove_facet(identity, "")
    }

    /// # Errors
    ///
    /// `NotRegistered` or `Deactivated`.
    pub fn remove_facet(&self, identity: &Identity, facet: &str) -> Result<DispatcherRef, AdapterError> {
        self.ensure_active()?;
        self.servants.remove_servant(identity, facet)
    }

    /// # Errors
    ///
    /// `NotRegistered` or `Deactivated`.
    pub fn remove_all_facets(
        &self,
        identity: &Identity,
    ) -> Result<HashMap<String, DispatcherRef>, AdapterError> {
        self.ensure_active()?;
        self.servants.remove_all_facets(identity)
    }

    /// # Errors
    ///
    /// `DefaultServantNotRegistered` or `Deactivated`.
    pub fn remove_default_servant(&self, category: &str) -> Result<DispatcherRef, AdapterError> {
        self.ensure_active()?;
        self.servants.remove_default_servant(category)
    }

    /// The servant a request for the default facet of `identity` would reach.
    #[must_use]
    pub fn find(&self, identity: &Identity) -> Option<DispatcherRef> {
        self.servants.find_servant(identity, "")
    }

    #[must_use]
    pub fn find_facet(&self, identity: &Identity, facet: &str) -> Option<DispatcherRef> {
        self.servants.find_servant(identity, facet)
    }

    #[must_use]
    pub fn find_all_facets(&self, identity: &Identity) -> HashMap<String, DispatcherRef> {
        self.servants.find_all_facets(identity)
    }

    #[must_use]
    pub fn find_default_servant(&self, category: &str) -> Option<DispatcherRef> {
        self.servants.find_default_servant(category)
    }

    #[must_use]
    pub fn has_servant(&self, identity: &Identity) -> bool {
        self.servants.has_servant(identity)
    }

    /// Shared handle to the terminal dispatcher.
    #[must_use]
    pub fn servant_manager(&self) -> Arc<ServantManager> {
        Arc::clone(&self.servants)
    }

    // -----------------------------------------------------------------------
    // Deactivation
    // -----------------------------------------------------------------------

    /// Stops accepting dispatches. Idempotent.
    ///
    /// Dispatches already running are not cancelled; use
    /// [`wait_for_deactivate`](Self::wait_for_deactivate) to wait for them.
    pub fn destroy(&self) {
        let _pending = self.builder.lock();
        if self.lifecycle.destroy() {
            info!(
                adapter = %self.config.name,
                in_flight = self.lifecycle.in_flight_count(),
                "object adapter destroyed"
            );
        }
    }

    /// Receiver that turns `true` when the adapter is destroyed. Long-running
    /// servants can select on it to give up early.
    #[must_use]
    pub fn deactivation_receiver(&self) -> watch::Receiver<bool> {
        self.lifecycle.deactivation_receiver()
    }

    #[must_use]
    pub fn in_flight_count(&self) -> u64 {
        self.lifecycle.in_flight_count()
    }

    /// Waits up to the configured drain timeout for in-flight dispatches.
    ///
    /// Returns `true` if all of them completed.
    pub async fn wait_for_deactivate(&self) -> bool {
        self.wait_for_deactivate_timeout(self.config.drain_timeout).await
    }

    /// Like [`wait_for_deactivate`](Self::wait_for_deactivate) with an explicit timeout.
    pub async fn wait_for_deactivate_timeout(&self, timeout: Duration) -> bool {
        self.lifecycle.wait_for_drain(timeout).await
    }
}

impl fmt::Debug for ObjectAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectAdapter")
            .field("name", &self.config.name)
            .field("state", &self.lifecycle.state())
            .field("in_flight", &self.lifecycle.in_flight_count())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use icedispatch_core::{Current, DispatchError, ReplyStatus};

    use super::*;
    use crate::dispatch::{dispatcher_fn, DispatchResult};
    use crate::middleware::layer_fn;
    use crate::servant::OperationRouter;

    /// Shared observation logs of the middleware ordering test.
    #[derive(Default)]
    struct OrderLog {
        in_log: Vec<&'static str>,
        out_log: Vec<&'static str>,
    }

    struct OrderMiddleware {
        name: &'static str,
        log: Arc<Mutex<OrderLog>>,
        next: DispatcherRef,
    }

    #[async_trait]
    impl Dispatcher for OrderMiddleware {
        async fn dispatch(&self, request: IncomingRequest) -> DispatchResult {
            self.log.lock().in_log.push(self.name);
            let result = self.next.dispatch(request).await;
            self.log.lock().out_log.push(self.name);
            result
        }
    }

    fn order_middleware(name: &'static str, log: &Arc<Mutex<OrderLog>>) -> impl MiddlewareFactory {
        let log = Arc::clone(log);
        layer_fn(move |next: DispatcherRef| OrderMiddleware {
            name,
            log: Arc::clone(&log),
            next,
        })
    }

    fn hello_servant(calls: Arc<AtomicU32>) -> DispatcherRef {
        Arc::new(OperationRouter::new("::Demo::Hello").route(
            "sayHello",
            dispatcher_fn(move |_req: IncomingRequest| {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(OutgoingResponse::ok(&b"hello"[..]))
                }
            }),
        ))
    }

    fn quiet_config(name: &str) -> AdapterConfig {
        AdapterConfig {
            metrics: false,
            warn_dispatch: 0,
            ..AdapterConfig::new(name)
        }
    }

    fn say_hello() -> IncomingRequest {
        IncomingRequest::empty(Current::new(Identity::new("hello"), "sayHello"))
    }

    #[tokio::test]
    async fn middleware_execution_order() {
        let adapter = ObjectAdapter::new(AdapterConfig::new("MyOA"));
        let log = Arc::new(Mutex::new(OrderLog::default()));
        adapter
            .use_middleware(order_middleware("A", &log))
            .unwrap()
            .use_middleware(order_middleware("B", &log))
            .unwrap()
            .use_middleware(order_middleware("C", &log))
            .unwrap();

        let calls = Arc::new(AtomicU32::new(0));
        adapter.add(hello_servant(calls.clone()), Identity::new("hello")).unwrap();
        adapter.activate().unwrap();

        let resp = adapter.dispatch(say_hello()).await.unwrap();
        assert!(resp.is_ok());
        assert_eq!(&resp.payload[..], b"hello");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let log = log.lock();
        assert_eq!(log.in_log, vec!["A", "B", "C"]);
        assert_eq!(log.out_log, vec!["C", "B", "A"]);
    }

    #[test]
    fn use_after_activate_is_rejected() {
        let adapter = ObjectAdapter::new(quiet_config("Frozen"));
        let log = Arc::new(Mutex::new(OrderLog::default()));
        adapter.use_middleware(order_middleware("A", &log)).unwrap();
        adapter.activate().unwrap();
        assert_eq!(adapter.state(), AdapterState::Built);

        let err = adapter.use_middleware(order_middleware("late", &log)).unwrap_err();
        assert!(matches!(err, AdapterError::PipelineFrozen { adapter } if adapter == "Frozen"));
    }

    #[tokio::test]
    async fn first_dispatch_builds_pipeline_implicitly() {
        let adapter = ObjectAdapter::new(quiet_config("Lazy"));
        let log = Arc::new(Mutex::new(OrderLog::default()));
        adapter.use_middleware(order_middleware("A", &log)).unwrap();
        assert_eq!(adapter.state(), AdapterState::Unbuilt);

        adapter.dispatch(say_hello()).await.unwrap();
        assert_eq!(adapter.state(), AdapterState::Built);
        assert_eq!(log.lock().in_log, vec!["A"]);

        assert!(matches!(
            adapter.use_middleware(order_middleware("B", &log)),
            Err(AdapterError::PipelineFrozen { .. })
        ));
    }

    #[test]
    fn activate_is_idempotent_and_reuses_the_chain() {
        let adapter = ObjectAdapter::new(quiet_config("Twice"));
        adapter.activate().unwrap();
        adapter.activate().unwrap();
        assert_eq!(adapter.dispatch_pipeline().unwrap().depth(), 0);
    }

    #[test]
    fn builtins_follow_config() {
        let adapter = ObjectAdapter::new(AdapterConfig {
            max_dispatches: 8,
            dispatch_timeout: Some(Duration::from_secs(1)),
            warn_dispatch: 1,
            metrics: true,
            ..AdapterConfig::new("Full")
        });
        assert_eq!(adapter.dispatch_pipeline().unwrap().depth(), 4);

        let bare = ObjectAdapter::new(quiet_config("Bare"));
        assert_eq!(bare.dispatch_pipeline().unwrap().depth(), 0);
    }

    #[tokio::test]
    async fn oversized_dispatch_limit_builds_and_admits() {
        let adapter = ObjectAdapter::new(AdapterConfig {
            max_dispatches: usize::MAX,
            ..quiet_config("Huge")
        });
        adapter.add(hello_servant(Arc::default()), Identity::new("hello")).unwrap();
        assert_eq!(adapter.dispatch_pipeline().unwrap().depth(), 1);
        assert!(adapter.dispatch(say_hello()).await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn unknown_identity_yields_object_not_exist_reply() {
        let adapter = ObjectAdapter::new(quiet_config("Empty"));
        let resp = adapter.dispatch(say_hello()).await.unwrap();
        assert_eq!(resp.status, ReplyStatus::ObjectNotExist);
    }

    #[tokio::test]
    async fn facet_lookup_through_adapter() {
        let adapter = ObjectAdapter::new(quiet_config("Facets"));
        let calls = Arc::new(AtomicU32::new(0));
        adapter
            .add_facet(hello_servant(calls.clone()), Identity::new("hello"), "A")
            .unwrap();

        let request = IncomingRequest::empty(
            Current::new(Identity::new("hello"), "sayHello").with_facet("A"),
        );
        assert!(adapter.dispatch(request).await.unwrap().is_ok());

        let request = IncomingRequest::empty(
            Current::new(Identity::new("hello"), "sayHello").with_facet("B"),
        );
        let resp = adapter.dispatch(request).await.unwrap();
        assert_eq!(resp.status, ReplyStatus::FacetNotExist);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn servant_failure_becomes_error_reply() {
        let adapter = ObjectAdapter::new(quiet_config("Failing"));
        let log = Arc::new(Mutex::new(OrderLog::default()));
        adapter.use_middleware(order_middleware("A", &log)).unwrap();
        adapter
            .add(
                Arc::new(dispatcher_fn(|_req: IncomingRequest| async move {
                    Err(DispatchError::Unknown("servant crashed".to_string()))
                })),
                Identity::new("hello"),
            )
            .unwrap();

        let resp = adapter.dispatch(say_hello()).await.unwrap();
        assert_eq!(resp.status, ReplyStatus::UnknownException);
        assert_eq!(
            resp.message.as_deref(),
            Some("unknown exception: servant crashed")
        );
        assert_eq!(log.lock().out_log, vec!["A"]);
    }

    #[tokio::test(start_paused = true)]
    async fn configured_timeout_becomes_unknown_local_reply() {
        let adapter = ObjectAdapter::new(AdapterConfig {
            dispatch_timeout: Some(Duration::from_millis(20)),
            ..quiet_config("Slow")
        });
        adapter
            .add(
                Arc::new(dispatcher_fn(|_req: IncomingRequest| async move {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    Ok(OutgoingResponse::empty())
                })),
                Identity::new("hello"),
            )
            .unwrap();

        let resp = adapter.dispatch(say_hello()).await.unwrap();
        assert_eq!(resp.status, ReplyStatus::UnknownLocalException);
        assert!(resp.message.unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn dispatch_after_destroy_fails_fast() {
        let adapter = ObjectAdapter::new(quiet_config("Gone"));
        adapter.activate().unwrap();
        adapter.destroy();
        assert_eq!(adapter.state(), AdapterState::Destroyed);

        let err = adapter.dispatch(say_hello()).await.unwrap_err();
        assert!(matches!(err, AdapterError::Deactivated { adapter } if adapter == "Gone"));
        assert_eq!(adapter.in_flight_count(), 0);
    }

    #[test]
    fn mutations_after_destroy_fail() {
        let adapter = ObjectAdapter::new(quiet_config("Gone"));
        adapter.destroy();
        adapter.destroy();

        let log = Arc::new(Mutex::new(OrderLog::default()));
        assert!(matches!(
            adapter.use_middleware(order_middleware("A", &log)),
            Err(AdapterError::Deactivated { .. })
        ));
        assert!(matches!(
            adapter.add(hello_servant(Arc::default()), Identity::new("hello")),
            Err(AdapterError::Deactivated { .. })
        ));
        assert!(matches!(adapter.activate(), Err(AdapterError::Deactivated { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn destroy_lets_in_flight_dispatch_finish() {
        let adapter = Arc::new(ObjectAdapter::new(quiet_config("Draining")));
        adapter
            .add(
                Arc::new(dispatcher_fn(|_req: IncomingRequest| async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok(OutgoingResponse::ok(&b"done"[..]))
                })),
                Identity::new("hello"),
            )
            .unwrap();
        let mut deactivated = adapter.deactivation_receiver();

        let in_flight = tokio::spawn({
            let adapter = Arc::clone(&adapter);
            async move { adapter.dispatch(say_hello()).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(adapter.in_flight_count(), 1);

        adapter.destroy();
        deactivated.changed().await.unwrap();
        assert!(*deactivated.borrow());
        assert!(adapter.wait_for_deactivate_timeout(Duration::from_secs(2)).await);

        let resp = in_flight.await.unwrap().unwrap();
        assert_eq!(&resp.payload[..], b"done");
    }

    #[test]
    fn servant_registration_passthroughs() {
        let adapter = ObjectAdapter::new(quiet_config("Registry"));
        let servant = hello_servant(Arc::default());
        adapter.add(servant.clone(), Identity::new("hello")).unwrap();
        adapter
            .add_default_servant(hello_servant(Arc::default()), "users")
            .unwrap();

        assert!(adapter.has_servant(&Identity::new("hello")));
        assert!(Arc::ptr_eq(&adapter.find(&Identity::new("hello")).unwrap(), &servant));
        assert!(adapter
            .find(&Identity::with_category("bob", "users"))
            .is_some());
        assert!(adapter.find_facet(&Identity::new("hello"), "x").is_none());
        assert_eq!(adapter.find_all_facets(&Identity::new("hello")).len(), 1);
        assert!(adapter.find_default_servant("users").is_some());

        adapter.remove(&Identity::new("hello")).unwrap();
        assert!(!adapter.has_servant(&Identity::new("hello")));
        adapter.remove_default_servant("users").unwrap();
        assert!(matches!(
            adapter.remove_all_facets(&Identity::new("hello")),
            Err(AdapterError::NotRegistered { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn from_properties_wires_builtins() {
        let props: crate::config::Properties = [
            ("Ice.Warn.Dispatch".to_string(), "0".to_string()),
            ("Limited.MaxDispatches".to_string(), "1".to_string()),
            ("Limited.Metrics".to_string(), "0".to_string()),
        ]
        .into();
        let adapter = Arc::new(ObjectAdapter::new(
            AdapterConfig::from_properties("Limited", &props).unwrap(),
        ));
        adapter
            .add(
                Arc::new(dispatcher_fn(|_req: IncomingRequest| async move {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    Ok(OutgoingResponse::empty())
                })),
                Identity::new("hello"),
            )
            .unwrap();
        assert_eq!(adapter.dispatch_pipeline().unwrap().depth(), 1);

        let first = tokio::spawn({
            let adapter = Arc::clone(&adapter);
            async move { adapter.dispatch(say_hello()).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        let resp = adapter.dispatch(say_hello()).await.unwrap();
        assert_eq!(resp.status, ReplyStatus::UnknownLocalException);
        first.abort();
    }
}
