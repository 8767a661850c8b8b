//! Invocation descriptor shared by every stage of a dispatch.

use serde::{Deserialize, Serialize};

use crate::context::{Context, OperationMode};
use crate::identity::Identity;

/// Everything that describes one invocation apart from its payload.
///
/// A `Current` is produced by the transport layer together with the request
/// and never changes while the request travels through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Current {
    /// Name of the object adapter the request was routed to.
    pub adapter_name: String,
    /// Target object.
    pub identity: Identity,
    /// Target facet. Empty selects the default facet.
    pub facet: String,
    /// Operation name, e.g. `"sayHello"` or `"ice_ping"`.
    pub operation: String,
    pub mode: OperationMode,
    /// Caller supplied metadata.
    pub ctx: Context,
    /// Request id assigned by the connection. `0` marks a oneway request.
    pub request_id: i32,
}

impl Current {
    /// Creates a descriptor for a twoway call to the default facet.
    #[must_use]
    pub fn new(identity: Identity, operation: impl Into<String>) -> Self {
        Self {
            adapter_name: String::new(),
            identity,
            facet: String::new(),
            operation: operation.into(),
            mode: OperationMode::Normal,
            ctx: Context::new(),
            request_id: 1,
        }
    }

    #[must_use]
    pub fn with_facet(mut self, facet: impl Into<String>) -> Self {
        self.facet = facet.into();
        self
    }

    #[must_use]
    pub fn with_adapter_name(mut self, adapter_name: impl Into<String>) -> Self {
        self.adapter_name = adapter_name.into();
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: OperationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Adds one context entry, replacing any previous value for `key`.
    #[must_use]
    pub fn with_context_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.ctx.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: i32) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns `true` if the caller does not expect a reply.
    #[must_use]
    pub fn is_oneway(&self) -> bool {
        self.request_id == 0
    }
}
