//! Object adapters: lifecycle, servant registration, and request dispatch.

pub mod lifecycle;
pub mod object_adapter;

pub use lifecycle::{AdapterState, InFlightGuard, LifecycleController};
pub use object_adapter::ObjectAdapter;
