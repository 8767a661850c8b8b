//! `IceDispatch` Server -- object adapters with a composable middleware dispatch pipeline.

pub mod adapter;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod middleware;
pub mod pipeline;
pub mod servant;
pub mod telemetry;

pub use adapter::{AdapterState, ObjectAdapter};
pub use config::{AdapterConfig, LogConfig, Properties};
pub use dispatch::{dispatcher_fn, DispatchResult, Dispatcher, DispatcherRef};
pub use error::AdapterError;
pub use middleware::{layer_fn, MiddlewareFactory};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use servant::{OperationRouter, ServantManager};
