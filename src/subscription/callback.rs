// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for accessory subscriptions.
//!
//! This module provides the core types for managing subscription callbacks:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::capability::CapabilityUpdate;
use crate::connection::ConnectionStatus;

/// Unique identifier for a subscription.
///
/// Returned when creating a subscription and used to unsubscribe later.
/// IDs are unique within an accessory's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type CapabilityCallback = Arc<dyn Fn(&CapabilityUpdate) + Send + Sync>;

type ConnectionCallback = Arc<dyn Fn(ConnectionStatus) + Send + Sync>;

/// Registry of accessory callbacks.
///
/// Uses `parking_lot::RwLock` so callbacks can be registered from any task
/// while the accessory task dispatches. Callbacks run synchronously on the
/// accessory task and should return quickly.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    capability_callbacks: RwLock<HashMap<SubscriptionId, CapabilityCallback>>,
    connection_callbacks: RwLock<HashMap<SubscriptionId, ConnectionCallback>>,
}

impl CallbackRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            capability_callbacks: RwLock::new(HashMap::new()),
            connection_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a callback for capability notifications.
    pub fn on_capability_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&CapabilityUpdate) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.capability_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for connection lifecycle transitions.
    pub fn on_connection_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ConnectionStatus) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.connection_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Unregisters a callback.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.capability_callbacks.write().remove(&id).is_some()
            || self.connection_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.capability_callbacks.write().clear();
        self.connection_callbacks.write().clear();
    }

    /// Dispatches a capability notification.
    pub fn dispatch(&self, update: &CapabilityUpdate) {
        // Clone out so a callback may subscribe or unsubscribe without deadlocking
        let callbacks: Vec<_> = self.capability_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(update);
        }
    }

    /// Dispatches a connection status change.
    pub fn dispatch_connection(&self, status: ConnectionStatus) {
        let callbacks: Vec<_> = self.connection_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(status);
        }
    }

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.capability_callbacks.read().len() + self.connection_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capability;
    use crate::connection::ConnectionState;
    use crate::types::Percent;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn subscription_id_display() {
        let id = SubscriptionId::new(42);
        assert_eq!(id.to_string(), "Sub(42)");
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = CallbackRegistry::new();
        assert!(registry.is_empty());
    }

    #[test]
    fn capability_callback() {
        let registry = CallbackRegistry::new();
        let received = Arc::new(RwLock::new(Vec::new()));
        let received_clone = received.clone();

        let id = registry.on_capability_changed(move |update| {
            received_clone.write().push(*update);
        });

        let update = CapabilityUpdate::new(Capability::FanSpeed, Percent::clamped(70));
        registry.dispatch(&update);
        assert_eq!(*received.read(), vec![update]);

        assert!(registry.unsubscribe(id));
        registry.dispatch(&update);
        assert_eq!(received.read().len(), 1);
    }

    #[test]
    fn connection_callback() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        registry.on_connection_changed(move |status| {
            if status.is_connected() {
                counter_clone.fetch_add(1, Ordering::SeqCst);
            }
        });

        registry.dispatch_connection(ConnectionStatus {
            state: ConnectionState::Connected,
            ..ConnectionStatus::default()
        });
        registry.dispatch_connection(ConnectionStatus::default());

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_nonexistent() {
        let registry = CallbackRegistry::new();
        assert!(!registry.unsubscribe(SubscriptionId::new(999)));
    }

    #[test]
    fn unique_ids_and_clear() {
        let registry = CallbackRegistry::new();

        let id1 = registry.on_capability_changed(|_| {});
        let id2 = registry.on_connection_changed(|_| {});
        assert_ne!(id1, id2);
        assert_eq!(registry.callback_count(), 2);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_debug() {
        let registry = CallbackRegistry::new();
        registry.on_capability_changed(|_| {});

        let debug = format!("{registry:?}");
        assert!(debug.contains("callback_count"));
    }
}
