use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-call metadata sent alongside a request (the Ice "request context").
/// `BTreeMap` keeps iteration and log output deterministic.
pub type Context = BTreeMap<String, String>;

/// Whether an operation may be safely retried by the caller's runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationMode {
    /// Regular operation; at-most-once semantics.
    #[default]
    Normal,
    /// The operation has no additional effect when repeated.
    Idempotent,
}
