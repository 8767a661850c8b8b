//! Operation routing inside one servant: dispatches by `current.operation`.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use icedispatch_core::marshal;
use icedispatch_core::{DispatchError, IncomingRequest, OutgoingResponse};

use crate::dispatch::{DispatchResult, Dispatcher, DispatcherRef};

/// Type id every Ice object implements.
pub const OBJECT_TYPE_ID: &str = "::Ice::Object";

// ---------------------------------------------------------------------------
// OperationRouter
// ---------------------------------------------------------------------------

/// A servant assembled from one dispatcher per operation.
///
/// Each registered operation handler is a [`Dispatcher`] keyed by its
/// operation name. The four operations every Ice object supports are answered
/// from the type ids the router was created with:
///
/// - `ice_ping`: empty reply
/// - `ice_id`: the most-derived type id (encoded string)
/// - `ice_ids`: all type ids in sorted order (encoded string sequence)
/// - `ice_isA`: whether the type id in the payload is implemented (encoded bool)
///
/// Any other unregistered operation is answered with `OperationNotExist`.
pub struct OperationRouter {
    most_derived: String,
    type_ids: BTreeSet<String>,
    operations: HashMap<String, DispatcherRef>,
}

impl OperationRouter {
    /// Create a router for a servant whose most-derived interface is `type_id`.
    #[must_use]
    pub fn new(type_id: impl Into<String>) -> Self {
        let most_derived = type_id.into();
        let type_ids = [most_derived.clone(), OBJECT_TYPE_ID.to_string()].into();
        Self {
            most_derived,
            type_ids,
            operations: HashMap::new(),
        }
    }

    /// Declare an inherited interface, reported by `ice_ids` and `ice_isA`.
    #[must_use]
    pub fn with_base(mut self, type_id: impl Into<String>) -> Self {
        self.type_ids.insert(type_id.into());
        self
    }

    /// Register the handler for `operation`, replacing any previous one.
    #[must_use]
    pub fn route<D: Dispatcher + 'static>(mut self, operation: &str, handler: D) -> Self {
        self.operations
            .insert(operation.to_string(), Arc::new(handler));
        self
    }

    #[must_use]
    pub fn type_id(&self) -> &str {
        &self.most_derived
    }

    #[must_use]
    pub fn is_a(&self, type_id: &str) -> bool {
        self.type_ids.contains(type_id)
    }

    fn builtin(&self, request: &IncomingRequest) -> Option<DispatchResult> {
        let result = match request.operation() {
            "ice_ping" => Ok(OutgoingResponse::empty()),
            "ice_id" => marshal::encode_string(&self.most_derived)
                .map(OutgoingResponse::ok)
                .map_err(DispatchError::from),
            "ice_ids" => {
                let ids: Vec<&str> = self.type_ids.iter().map(String::as_str).collect();
                marshal::encode_string_seq(&ids)
                    .map(OutgoingResponse::ok)
                    .map_err(DispatchError::from)
            }
            "ice_isA" => marshal::decode_string(&request.payload)
                .map(|type_id| OutgoingResponse::ok(marshal::encode_bool(self.is_a(&type_id))))
                .map_err(DispatchError::from),
            _ => return None,
        };
        Some(result)
    }
}

#[async_trait]
impl Dispatcher for OperationRouter {
    async fn dispatch(&self, request: IncomingRequest) -> DispatchResult {
        if let Some(result) = self.builtin(&request) {
            return result;
        }
        match self.operations.get(request.operation()) {
            Some(handler) => handler.dispatch(request).await,
            None => Ok(OutgoingResponse::from_error(
                &DispatchError::operation_not_exist(&request.current),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
