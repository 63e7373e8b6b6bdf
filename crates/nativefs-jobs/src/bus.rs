//! Event bus abstraction and the in-process implementation.

use nativefs_types::{EventHandler, TransferEvent};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Token identifying one registration on an [`EventBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionToken(u64);

impl SubscriptionToken {
    /// Wraps a raw token value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw token value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A bus delivering named events to registered handlers.
///
/// The job registry depends only on this capability, so hosts can route
/// events through whatever mechanism their engine uses.
pub trait EventBus: Send + Sync {
    /// Registers `handler` for events published under `name`.
    fn subscribe(&self, name: &str, handler: EventHandler) -> SubscriptionToken;

    /// Removes a registration. Unknown tokens are ignored.
    fn release(&self, token: SubscriptionToken);
}

#[derive(Default)]
struct BusState {
    next_token: u64,
    listeners: HashMap<String, Vec<(SubscriptionToken, EventHandler)>>,
    names: HashMap<SubscriptionToken, String>,
}

/// In-process event bus.
///
/// Handlers run on the publishing thread, in subscription order, outside the
/// internal lock so they may subscribe or release themselves.
#[derive(Default)]
pub struct LocalEventBus {
    state: Mutex<BusState>,
}

impl LocalEventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `event` under its name and returns how many handlers ran.
    pub fn emit(&self, event: &TransferEvent) -> usize {
        let handlers: Vec<EventHandler> = {
            let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state
                .listeners
                .get(&event.name())
                .map(|entries| entries.iter().map(|(_, h)| h.clone()).collect())
                .unwrap_or_default()
        };

        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Returns the number of handlers registered under `name`.
    #[must_use]
    pub fn listener_count(&self, name: &str) -> usize {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.listeners.get(name).map_or(0, Vec::len)
    }

    /// Returns the number of live registrations across all names.
    #[must_use]
    pub fn total_listeners(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.names.len()
    }
}

impl EventBus for LocalEventBus {
    fn subscribe(&self, name: &str, handler: EventHandler) -> SubscriptionToken {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.next_token += 1;
        let token = SubscriptionToken(state.next_token);
        state
            .listeners
            .entry(name.to_string())
            .or_default()
            .push((token, handler));
        state.names.insert(token, name.to_string());
        token
    }

    fn release(&self, token: SubscriptionToken) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(name) = state.names.remove(&token) else {
            return;
        };
        if let Some(entries) = state.listeners.get_mut(&name) {
            entries.retain(|(t, _)| *t != token);
            if entries.is_empty() {
                state.listeners.remove(&name);
            }
        }
    }
}

impl std::fmt::Debug for LocalEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalEventBus")
            .field("listeners", &self.total_listeners())
            .finish()
    }
}
