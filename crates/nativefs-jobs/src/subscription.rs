//! Owned event bus registrations.

use crate::{EventBus, SubscriptionToken};
use nativefs_types::EventHandler;
use std::sync::Arc;

/// A registration on the event bus for one event name.
///
/// The registration is released exactly once: by [`EventSubscription::release`]
/// or, failing that, when the subscription is dropped.
pub struct EventSubscription {
    bus: Arc<dyn EventBus>,
    name: String,
    token: Option<SubscriptionToken>,
}

impl EventSubscription {
    /// Registers `handler` under `name` on `bus`.
    pub fn register(bus: Arc<dyn EventBus>, name: String, handler: EventHandler) -> Self {
        let token = bus.subscribe(&name, handler);
        Self {
            bus,
            name,
            token: Some(token),
        }
    }

    /// Returns the event name this subscription listens to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true until the registration has been released.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.token.is_some()
    }

    /// Releases the registration.
    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if let Some(token) = self.token.take() {
            self.bus.release(token);
        }
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.release_once();
    }
}

impl std::fmt::Debug for EventSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSubscription")
            .field("name", &self.name)
            .field("token", &self.token)
            .finish()
    }
}
