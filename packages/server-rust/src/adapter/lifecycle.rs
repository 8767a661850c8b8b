//! Where an object adapter is in its life, and how many dispatches it owes.
//!
//! The dispatch path reads the state on every request, so it lives in an
//! `ArcSwap`. Dispatches are counted by guards held for the whole call.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use tokio::sync::watch;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Lifecycle of an object adapter.
///
/// State machine: Unbuilt -> Built -> Destroyed (Unbuilt -> Destroyed is allowed too)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    /// Middleware may still be installed; the dispatch pipeline does not exist yet.
    Unbuilt,
    /// The pipeline is built and frozen; requests are dispatched through it.
    Built,
    /// No new dispatches are accepted. In-flight ones run to completion.
    Destroyed,
}

/// State, in-flight count and deactivation signal of one adapter.
///
/// `destroy` only flips the state; callers that must not return before
/// running servants finish follow it with `wait_for_drain`.
#[derive(Debug)]
pub struct LifecycleController {
    state: ArcSwap<AdapterState>,
    in_flight: Arc<AtomicU64>,
    deactivated: watch::Sender<bool>,
}

impl LifecycleController {
    /// Creates a controller in the `Unbuilt` state.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            state: ArcSwap::from_pointee(AdapterState::Unbuilt),
            in_flight: Arc::new(AtomicU64::new(0)),
            deactivated: tx,
        }
    }

    #[must_use]
    pub fn state(&self) -> AdapterState {
        **self.state.load()
    }

    /// Moves `Unbuilt` to `Built`. Has no effect in any other state.
    pub fn mark_built(&self) {
        self.state.rcu(|current| match **current {
            AdapterState::Unbuilt => Arc::new(AdapterState::Built),
            _ => Arc::clone(current),
        });
    }

    /// Moves to `Destroyed` and notifies deactivation receivers.
    ///
    /// Returns `false` if the controller was already destroyed.
    pub fn destroy(&self) -> bool {
        let previous = self.state.swap(Arc::new(AdapterState::Destroyed));
        if *previous == AdapterState::Destroyed {
            return false;
        }
        // `send_replace` stores the flag even with no receiver subscribed.
        self.deactivated.send_replace(true);
        true
    }

    /// Returns a receiver that observes `true` once the adapter is destroyed.
    #[must_use]
    pub fn deactivation_receiver(&self) -> watch::Receiver<bool> {
        self.deactivated.subscribe()
    }

    /// Counts one dispatch until the returned guard goes away.
    ///
    /// A dispatch future dropped mid-flight still releases its slot.
    #[must_use]
    pub fn in_flight_guard(&self) -> InFlightGuard {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    #[must_use]
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Resolves once the in-flight count reaches zero, or after `timeout`.
    ///
    /// `false` means dispatches were still running when time ran out.
    pub async fn wait_for_drain(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            if self.in_flight_count() == 0 {
                return true;
            }

            if tokio::time::Instant::now() >= deadline {
                return false;
            }

            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
    }
}

impl Default for LifecycleController {
    fn default() -> Self {
        Self::new()
    }
}

/// One running dispatch, as seen by [`LifecycleController::in_flight_count`].
#[derive(Debug)]
pub struct InFlightGuard {
    in_flight: Arc<AtomicU64>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}
