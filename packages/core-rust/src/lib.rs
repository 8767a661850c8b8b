//! `icedispatch` core: identities, requests, responses, and dispatch errors.

pub mod context;
pub mod current;
pub mod error;
pub mod identity;
pub mod marshal;
pub mod request;
pub mod response;

pub use context::{Context, OperationMode};
pub use current::Current;
pub use error::DispatchError;
pub use identity::{Identity, IdentityParseError};
pub use request::IncomingRequest;
pub use response::{OutgoingResponse, ReplyStatus};
