//! Servant lookup: the terminal dispatcher of every adapter pipeline.

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use icedispatch_core::{DispatchError, Identity, IncomingRequest, OutgoingResponse};
use tracing::debug;

use crate::dispatch::{DispatchResult, Dispatcher, DispatcherRef};
use crate::error::AdapterError;

/// Holds the servants of one object adapter and routes requests to them.
///
/// Lookup order for `(identity, facet)`:
/// 1. a servant registered for exactly that identity and facet;
/// 2. the default servant of the identity's category;
/// 3. the default servant of the empty category.
///
/// A request that resolves to nothing is answered with an `ObjectNotExist`
/// reply, or `FacetNotExist` when other facets of the identity exist. These
/// are replies, not errors: the pipeline above sees a normal response.
#[derive(Default)]
pub struct ServantManager {
    /// identity -> facet -> servant.
    servants: DashMap<Identity, HashMap<String, DispatcherRef>>,
    /// category -> default servant.
    default_servants: DashMap<String, DispatcherRef>,
}

impl ServantManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `servant` for `identity` and `facet`.
    ///
    /// # Errors
    ///
    /// `IllegalIdentity` if the identity name is empty, `AlreadyRegistered` if
    /// the identity already has a servant for this facet.
    pub fn add_servant(
        &self,
        servant: DispatcherRef,
        identity: Identity,
        facet: &str,
    ) -> Result<(), AdapterError> {
        if identity.is_empty() {
            return Err(AdapterError::IllegalIdentity(identity));
        }
        let mut facets = self.servants.entry(identity.clone()).or_default();
        if facets.contains_key(facet) {
            return Err(AdapterError::already_registered(&identity, facet));
        }
        facets.insert(facet.to_string(), servant);
        debug!(%identity, facet, "servant added");
        Ok(())
    }

    /// Registers a default servant for every identity of `category` that has
    /// no servant of its own.
    ///
    /// # Errors
    ///
    /// `DefaultServantAlreadyRegistered` if the category already has one.
    pub fn add_default_servant(
        &self,
        servant: DispatcherRef,
        category: &str,
    ) -> Result<(), AdapterError> {
        match self.default_servants.entry(category.to_string()) {
            Entry::Occupied(_) => Err(AdapterError::DefaultServantAlreadyRegistered {
                category: category.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(servant);
                debug!(category, "default servant added");
                Ok(())
            }
        }
    }

    /// Removes and returns the servant registered for `identity` and `facet`.
    ///
    /// # Errors
    ///
    /// `NotRegistered` if there is no such servant.
    pub fn remove_servant(
        &self,
        identity: &Identity,
        facet: &str,
    ) -> Result<DispatcherRef, AdapterError> {
        let removed = self
            .servants
            .get_mut(identity)
            .and_then(|mut facets| facets.remove(facet))
            .ok_or_else(|| AdapterError::not_registered(identity, facet))?;
        self.servants.remove_if(identity, |_, facets| facets.is_empty());
        debug!(%identity, facet, "servant removed");
        Ok(removed)
    }

    /// Removes every facet registered for `identity`.
    ///
    /// # Errors
    ///
    /// `NotRegistered` if the identity has no servant at all.
    pub fn remove_all_facets(
        &self,
        identity: &Identity,
    ) -> Result<HashMap<String, DispatcherRef>, AdapterError> {
        let (_, facets) = self
            .servants
            .remove(identity)
            .ok_or_else(|| AdapterError::not_registered(identity, ""))?;
        debug!(%identity, count = facets.len(), "all facets removed");
        Ok(facets)
    }

    /// Removes and returns the default servant of `category`.
    ///
    /// # Errors
    ///
    /// `DefaultServantNotRegistered` if the category has none.
    pub fn remove_default_servant(&self, category: &str) -> Result<DispatcherRef, AdapterError> {
        self.default_servants
            .remove(category)
            .map(|(_, servant)| servant)
            .ok_or_else(|| AdapterError::DefaultServantNotRegistered {
                category: category.to_string(),
            })
    }

    /// Resolves the servant a request for `identity` and `facet` would reach.
    #[must_use]
    pub fn find_servant(&self, identity: &Identity, facet: &str) -> Option<DispatcherRef> {
        self.servants
            .get(identity)
            .and_then(|facets| facets.get(facet).cloned())
            .or_else(|| self.find_default_servant(&identity.category))
            .or_else(|| self.find_default_servant(""))
    }

    /// All facets registered for `identity`; empty if there are none.
    #[must_use]
    pub fn find_all_facets(&self, identity: &Identity) -> HashMap<String, DispatcherRef> {
        self.servants
            .get(identity)
            .map(|facets| facets.value().clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn find_default_servant(&self, category: &str) -> Option<DispatcherRef> {
        self.default_servants
            .get(category)
            .map(|entry| entry.value().clone())
    }

    /// Whether any facet is registered for `identity`. Default servants do not count.
    #[must_use]
    pub fn has_servant(&self, identity: &Identity) -> bool {
        self.servants.contains_key(identity)
    }
}

#[async_trait]
impl Dispatcher for ServantManager {
    async fn dispatch(&self, request: IncomingRequest) -> DispatchResult {
        let current = &request.current;
        let servant = if current.identity.is_empty() {
            None
        } else {
            self.find_servant(&current.identity, &current.facet)
        };

        match servant {
            Some(servant) => servant.dispatch(request).await,
            None => {
                let err = if self.has_servant(&current.identity) {
                    DispatchError::facet_not_exist(current)
                } else {
                    DispatchError::object_not_exist(current)
                };
                debug!(error = %err, "unresolved dispatch target");
                Ok(OutgoingResponse::from_error(&err))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
