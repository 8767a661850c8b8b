//! Errors reported to the owner of an object adapter.

use icedispatch_core::Identity;

/// Lifecycle and configuration failures of an object adapter.
///
/// Unlike [`icedispatch_core::DispatchError`], these are never turned into
/// responses: they are programmer or deployment errors reported to whoever
/// owns the adapter.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("cannot install middleware: the dispatch pipeline of adapter `{adapter}` is already built")]
    PipelineFrozen { adapter: String },
    #[error("object adapter `{adapter}` has been deactivated")]
    Deactivated { adapter: String },
    #[error("a servant for `{identity}` (facet `{facet}`) is already registered")]
    AlreadyRegistered { identity: String, facet: String },
    #[error("no servant for `{identity}` (facet `{facet}`) is registered")]
    NotRegistered { identity: String, facet: String },
    #[error("a default servant for category `{category}` is already registered")]
    DefaultServantAlreadyRegistered { category: String },
    #[error("no default servant for category `{category}` is registered")]
    DefaultServantNotRegistered { category: String },
    #[error("illegal identity `{0}`: the name must not be empty")]
    IllegalIdentity(Identity),
    #[error("invalid value `{value}` for property `{key}`")]
    InvalidProperty { key: String, value: String },
}

impl AdapterError {
    pub(crate) fn already_registered(identity: &Identity, facet: &str) -> Self {
        Self::AlreadyRegistered {
            identity: identity.to_string(),
            facet: facet.to_string(),
        }
    }

    pub(crate) fn not_registered(identity: &Identity, facet: &str) -> Self {
        Self::NotRegistered {
            identity: identity.to_string(),
            facet: facet.to_string(),
        }
    }
}
