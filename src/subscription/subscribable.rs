// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that publish accessory events.

use crate::capability::CapabilityUpdate;
use crate::connection::ConnectionStatus;
use crate::subscription::SubscriptionId;

/// Trait for types that support event subscriptions.
///
/// # Examples
///
/// ```no_run
/// use fanlink::accessory::FanAccessory;
/// use fanlink::subscription::Subscribable;
///
/// fn watch(accessory: &FanAccessory) {
///     let sub_id = accessory.on_capability_changed(|update| {
///         println!("{} is now {}", update.capability, update.value);
///     });
///
///     accessory.on_connection_changed(|status| {
///         println!("connection: {}", status.state);
///     });
///
///     accessory.unsubscribe(sub_id);
/// }
/// ```
pub trait Subscribable {
    /// Subscribes to capability notifications.
    ///
    /// Called for every value pushed toward the bridge, including device
    /// reports that did not change the stored value.
    fn on_capability_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&CapabilityUpdate) + Send + Sync + 'static;

    /// Subscribes to connection lifecycle transitions.
    fn on_connection_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ConnectionStatus) + Send + Sync + 'static;

    /// Removes a subscription. Returns `true` if it existed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
