use bytes::Bytes;

use crate::current::Current;
use crate::identity::Identity;
use crate::marshal::MarshalError;
use crate::response::ReplyStatus;

/// Request-level failures raised by a dispatcher or middleware.
///
/// Every variant maps to exactly one [`ReplyStatus`], so the object adapter can
/// turn any failure that escapes the pipeline into a well-formed response.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("object `{identity}` does not exist (facet `{facet}`, operation `{operation}`)")]
    ObjectNotExist {
        identity: Identity,
        facet: String,
        operation: String,
    },
    #[error("facet `{facet}` of object `{identity}` does not exist (operation `{operation}`)")]
    FacetNotExist {
        identity: Identity,
        facet: String,
        operation: String,
    },
    #[error("operation `{operation}` does not exist on object `{identity}` (facet `{facet}`)")]
    OperationNotExist {
        identity: Identity,
        facet: String,
        operation: String,
    },
    /// An exception declared by the operation; `payload` holds its encoded form.
    #[error("user exception `{type_id}`")]
    User { type_id: String, payload: Bytes },
    #[error("dispatch timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("dispatch rejected: too many concurrent dispatches")]
    Overloaded,
    #[error("cannot decode or encode payload: {0}")]
    Marshal(#[from] MarshalError),
    #[error("unknown exception: {0}")]
    Unknown(String),
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl DispatchError {
    #[must_use]
    pub fn object_not_exist(current: &Current) -> Self {
        Self::ObjectNotExist {
            identity: current.identity.clone(),
            facet: current.facet.clone(),
            operation: current.operation.clone(),
        }
    }

    #[must_use]
    pub fn facet_not_exist(current: &Current) -> Self {
        Self::FacetNotExist {
            identity: current.identity.clone(),
            facet: current.facet.clone(),
            operation: current.operation.clone(),
        }
    }

    #[must_use]
    pub fn operation_not_exist(current: &Current) -> Self {
        Self::OperationNotExist {
            identity: current.identity.clone(),
            facet: current.facet.clone(),
            operation: current.operation.clone(),
        }
    }

    /// The reply status a response carrying this failure is sent with.
    #[must_use]
    pub fn reply_status(&self) -> ReplyStatus {
        match self {
            Self::ObjectNotExist { .. } => ReplyStatus::ObjectNotExist,
            Self::FacetNotExist { .. } => ReplyStatus::FacetNotExist,
            Self::OperationNotExist { .. } => ReplyStatus::OperationNotExist,
            Self::User { .. } => ReplyStatus::UserException,
            Self::Timeout { .. } | Self::Overloaded | Self::Marshal(_) => {
                ReplyStatus::UnknownLocalException
            }
            Self::Unknown(_) | Self::Internal(_) => ReplyStatus::UnknownException,
        }
    }
}
