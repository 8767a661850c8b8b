use bytes::Bytes;

use crate::current::Current;

/// One incoming invocation as handed to the dispatch pipeline.
///
/// Immutable: stages read it, and a stage that wants to alter the call builds a
/// new request instead of mutating this one. `Clone` is cheap since the
/// payload is reference counted.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    pub current: Current,
    /// Encoded in-parameters. Opaque to the pipeline.
    pub payload: Bytes,
}

impl IncomingRequest {
    #[must_use]
    pub fn new(current: Current, payload: impl Into<Bytes>) -> Self {
        Self {
            current,
            payload: payload.into(),
        }
    }

    /// A request without in-parameters.
    #[must_use]
    pub fn empty(current: Current) -> Self {
        Self::new(current, Bytes::new())
    }

    #[must_use]
    pub fn operation(&self) -> &str {
        &self.current.operation
    }
}
