// src/state/store.rs
//! Shared, constructor-injected state container.

use crate::state::{reduce, Action, WalletState};
use log::debug;
use std::sync::{PoisonError, RwLock};
use tokio::sync::broadcast;

/// Buffered actions per subscriber before slow subscribers start lagging.
const EVENT_BUFFER: usize = 64;

/// Owns the [`WalletState`] and applies dispatched [`Action`]s to it.
///
/// Every dispatch is a single read-modify-write under the lock, so concurrent
/// issuance attempts writing different attributes never interfere. Two
/// attempts completing for the *same* attribute leave whichever dispatched
/// last.
#[derive(Debug)]
pub struct Store {
    state: RwLock<WalletState>,
    events: broadcast::Sender<Action>,
}

impl Store {
    /// Creates a store holding the initial state.
    pub fn new() -> Self {
        Self::with_state(WalletState::default())
    }

    /// Creates a store seeded with `state`.
    pub fn with_state(state: WalletState) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            state: RwLock::new(state),
            events,
        }
    }

    /// Applies `action` and notifies subscribers.
    pub fn dispatch(&self, action: Action) {
        {
            let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let current = std::mem::take(&mut *guard);
            *guard = reduce(current, action.clone());
        }
        // no subscribers is fine
        if self.events.send(action).is_err() {
            debug!("dispatched action with no subscribers");
        }
    }

    /// Reads from the current state without cloning it.
    pub fn select<T>(&self, selector: impl FnOnce(&WalletState) -> T) -> T {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        selector(&guard)
    }

    /// Clones the current state.
    pub fn snapshot(&self) -> WalletState {
        self.select(WalletState::clone)
    }

    /// Subscribes to every action dispatched from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Action> {
        self.events.subscribe()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
