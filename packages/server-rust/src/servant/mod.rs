//! Terminal dispatch: resolving servants and routing operations inside them.

pub mod manager;
pub mod router;

pub use manager::ServantManager;
pub use router::{OperationRouter, OBJECT_TYPE_ID};
