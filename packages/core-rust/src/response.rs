use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::DispatchError;

/// Outcome class of a dispatch, using the Ice reply status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ReplyStatus {
    Ok = 0,
    UserException = 1,
    ObjectNotExist = 2,
    FacetNotExist = 3,
    OperationNotExist = 4,
    UnknownLocalException = 5,
    UnknownUserException = 6,
    UnknownException = 7,
}

impl ReplyStatus {
    /// `ObjectNotExist`, `FacetNotExist` or `OperationNotExist`.
    #[must_use]
    pub fn is_not_exist(self) -> bool {
        matches!(
            self,
            Self::ObjectNotExist | Self::FacetNotExist | Self::OperationNotExist
        )
    }

    /// One of the `Unknown*` statuses.
    #[must_use]
    pub fn is_unknown(self) -> bool {
        matches!(
            self,
            Self::UnknownLocalException | Self::UnknownUserException | Self::UnknownException
        )
    }
}

impl fmt::Display for ReplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "ok",
            Self::UserException => "user exception",
            Self::ObjectNotExist => "object not exist",
            Self::FacetNotExist => "facet not exist",
            Self::OperationNotExist => "operation not exist",
            Self::UnknownLocalException => "unknown local exception",
            Self::UnknownUserException => "unknown user exception",
            Self::UnknownException => "unknown exception",
        };
        f.write_str(name)
    }
}

/// The reply produced by exactly one stage of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingResponse {
    pub status: ReplyStatus,
    /// Encoded return value, or the encoded user exception.
    pub payload: Bytes,
    /// Human readable failure description for non-`Ok`, non-user replies.
    pub message: Option<String>,
}

impl OutgoingResponse {
    /// Successful reply carrying `payload`.
    #[must_use]
    pub fn ok(payload: impl Into<Bytes>) -> Self {
        Self {
            status: ReplyStatus::Ok,
            payload: payload.into(),
            message: None,
        }
    }

    /// Successful reply without return value.
    #[must_use]
    pub fn empty() -> Self {
        Self::ok(Bytes::new())
    }

    /// Converts a request-level failure into the reply sent to the caller.
    #[must_use]
    pub fn from_error(err: &DispatchError) -> Self {
        match err {
            DispatchError::User { payload, .. } => Self {
                status: ReplyStatus::UserException,
                payload: payload.clone(),
                message: None,
            },
            other => Self {
                status: other.reply_status(),
                payload: Bytes::new(),
                message: Some(other.to_string()),
            },
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == ReplyStatus::Ok
    }
}

impl From<DispatchError> for OutgoingResponse {
    fn from(err: DispatchError) -> Self {
        Self::from_error(&err)
    }
}
