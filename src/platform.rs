// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Platform: one accessory per configured fan, registered with the bridge.
//!
//! The bridge keeps accessories cached between restarts, keyed by a UUID
//! derived from the device id. On launch the platform restores cached
//! accessories instead of adding them again, adds new ones, and removes
//! cached accessories whose device is no longer configured.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::accessory::{AccessoryConfig, FanAccessory, PlatformConfig};
use crate::capability::{Capability, CapabilityValue};
use crate::error::Result;
use crate::protocol::Transport;
use crate::subscription::Subscribable;

/// Manufacturer reported in accessory information.
pub const MANUFACTURER: &str = "CREATE";

/// Model reported in accessory information.
pub const MODEL: &str = "Ceiling Fan";

/// Namespace for accessory UUIDs.
const ACCESSORY_NAMESPACE: Uuid = Uuid::from_u128(0x8f3a_52c1_6d0e_4b7a_9c21_0fe4_77a1_3b5d);

/// Derives the stable accessory UUID of a device.
///
/// # Examples
///
/// ```
/// use fanlink::platform::accessory_uuid;
///
/// assert_eq!(accessory_uuid("bf01"), accessory_uuid("bf01"));
/// assert_ne!(accessory_uuid("bf01"), accessory_uuid("bf02"));
/// ```
#[must_use]
pub fn accessory_uuid(device_id: &str) -> Uuid {
    Uuid::new_v5(&ACCESSORY_NAMESPACE, device_id.as_bytes())
}

/// Identity metadata shown by the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryInfo {
    /// Stable accessory UUID.
    pub uuid: Uuid,
    /// Device id.
    pub device_id: String,
    /// Display name.
    pub name: String,
    /// Manufacturer.
    pub manufacturer: &'static str,
    /// Model.
    pub model: &'static str,
    /// Serial number (the device id).
    pub serial_number: String,
}

impl AccessoryInfo {
    /// Builds the information for a configured device.
    #[must_use]
    pub fn for_config(config: &AccessoryConfig) -> Self {
        Self {
            uuid: accessory_uuid(&config.id),
            device_id: config.id.clone(),
            name: config.display_name().to_string(),
            manufacturer: MANUFACTURER,
            model: MODEL,
            serial_number: config.id.clone(),
        }
    }
}

/// The bridge's registration framework.
///
/// The bridge routes reads and writes of registered capabilities to
/// [`FanAccessory::get`] and [`FanAccessory::set`] (see
/// [`Platform::accessory`]). Methods are called from accessory tasks and
/// must not block.
pub trait Bridge: Send + Sync + 'static {
    /// Adds a new accessory exposing `capabilities`.
    fn register(&self, info: &AccessoryInfo, capabilities: &[Capability]);

    /// Re-attaches an accessory restored from the bridge cache.
    fn restore(&self, info: &AccessoryInfo, capabilities: &[Capability]) {
        let _ = (info, capabilities);
    }

    /// Removes a cached accessory that is no longer configured.
    fn unregister(&self, uuid: Uuid);

    /// Pushes a new capability value.
    fn capability_changed(&self, device_id: &str, capability: Capability, value: CapabilityValue);
}

/// All fan accessories of one bridge platform block.
pub struct Platform<T: Transport, B: Bridge> {
    config: PlatformConfig,
    transport: Arc<T>,
    bridge: Arc<B>,
    cached: HashSet<Uuid>,
    accessories: HashMap<String, FanAccessory>,
    launched: bool,
}

impl<T: Transport, B: Bridge> Platform<T, B> {
    /// Creates a platform.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if any device fails validation.
    pub fn new(config: PlatformConfig, transport: Arc<T>, bridge: Arc<B>) -> Result<Self> {
        config.validate()?;
        tracing::debug!(name = ?config.name, devices = config.devices.len(), "Platform initialized");

        Ok(Self {
            config,
            transport,
            bridge,
            cached: HashSet::new(),
            accessories: HashMap::new(),
            launched: false,
        })
    }

    /// Records an accessory the bridge restored from its cache.
    ///
    /// Call for every cached accessory before [`launch`](Self::launch).
    pub fn configure_cached(&mut self, uuid: Uuid) {
        tracing::info!(%uuid, "Loading accessory from cache");
        self.cached.insert(uuid);
    }

    /// Creates every configured accessory and reconciles the bridge cache.
    ///
    /// Must be called from within a Tokio runtime. Calling it again does
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if an accessory cannot be created.
    pub fn launch(&mut self) -> Result<()> {
        if self.launched {
            return Ok(());
        }
        self.launched = true;

        if self.config.devices.is_empty() {
            tracing::warn!("No fans specified in the configuration");
        }

        let mut configured = HashSet::new();
        for device in &self.config.devices {
            let info = AccessoryInfo::for_config(device);
            let accessory = FanAccessory::spawn(device, Arc::clone(&self.transport))?;

            let bridge = Arc::clone(&self.bridge);
            let device_id = device.id.clone();
            accessory.on_capability_changed(move |update| {
                bridge.capability_changed(&device_id, update.capability, update.value);
            });

            let capabilities = accessory.capabilities().as_slice();
            if self.cached.contains(&info.uuid) {
                tracing::info!(device_id = %info.device_id, name = %info.name, "Restoring existing accessory from cache");
                self.bridge.restore(&info, capabilities);
            } else {
                tracing::info!(device_id = %info.device_id, name = %info.name, "Adding new accessory");
                self.bridge.register(&info, capabilities);
            }

            configured.insert(info.uuid);
            self.accessories.insert(device.id.clone(), accessory);
        }

        for uuid in self.cached.difference(&configured) {
            tracing::info!(%uuid, "Removing stale accessory from cache");
            self.bridge.unregister(*uuid);
        }
        self.cached = configured;

        Ok(())
    }

    /// Returns the accessory of a device.
    #[must_use]
    pub fn accessory(&self, device_id: &str) -> Option<&FanAccessory> {
        self.accessories.get(device_id)
    }

    /// Iterates all accessories.
    pub fn accessories(&self) -> impl Iterator<Item = &FanAccessory> {
        self.accessories.values()
    }

    /// Stops every accessory.
    pub async fn shutdown(&self) {
        for accessory in self.accessories.values() {
            accessory.shutdown().await;
        }
    }
}

impl<T: Transport, B: Bridge> std::fmt::Debug for Platform<T, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform")
            .field("name", &self.config.name)
            .field("accessories", &self.accessories.len())
            .field("launched", &self.launched)
            .finish_non_exhaustive()
    }
}
