// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The fan accessory handle and its task.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot, watch};

use crate::capability::{Capability, CapabilitySet, CapabilityUpdate, CapabilityValue};
use crate::connection::{ConnectionManager, ConnectionStatus};
use crate::error::{Error, Result};
use crate::protocol::{DpMap, Transport};
use crate::state::FanState;
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};
use crate::types::{BandPolicy, ColorTemperature, Percent, RotationDirection};

use super::{AccessoryConfig, TogglePolicy, dispatcher, ingestion};

/// Bound on `set` requests waiting for the accessory task.
const INTENT_CAPACITY: usize = 32;

/// A request from the bridge side to the accessory task.
enum Intent {
    Set {
        capability: Capability,
        value: CapabilityValue,
        ack: oneshot::Sender<Result<()>>,
    },
    Shutdown {
        ack: oneshot::Sender<()>,
    },
}

/// A ceiling fan (and optional light) exposed to the bridge.
///
/// Creating the accessory spawns a task that owns the device connection and
/// is the only writer of the capability state. The handle reads that state
/// without waiting for the task, and forwards `set` requests to it.
///
/// Dropping the handle stops the task and closes the session.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use fanlink::accessory::{AccessoryConfig, FanAccessory};
/// use fanlink::protocol::Transport;
/// use fanlink::types::Percent;
/// use fanlink::Capability;
///
/// async fn example<T: Transport>(transport: Arc<T>) -> fanlink::Result<()> {
///     let config = AccessoryConfig::new("bf01", "local-key").with_light(true);
///     let fan = FanAccessory::spawn(&config, transport)?;
///
///     fan.set_fan_speed(Percent::new(70)?).await?;
///     assert_eq!(fan.get(Capability::FanSpeed)?.as_percent(), Some(Percent::new(70)?));
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FanAccessory {
    device_id: String,
    name: String,
    capabilities: CapabilitySet,
    state: Arc<RwLock<FanState>>,
    intents: mpsc::Sender<Intent>,
    connection: watch::Receiver<ConnectionStatus>,
    callbacks: Arc<CallbackRegistry>,
}

impl FanAccessory {
    /// Validates the configuration, spawns the accessory task and starts
    /// connecting.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid.
    pub fn spawn<T: Transport>(config: &AccessoryConfig, transport: Arc<T>) -> Result<Self> {
        config.validate()?;

        let capabilities = config.capabilities();
        let state = Arc::new(RwLock::new(FanState::new()));
        let callbacks = Arc::new(CallbackRegistry::new());
        let connection = ConnectionManager::new(
            transport,
            config.identity(),
            config.retry_policy(),
            config.error_action(),
        );
        let status = connection.subscribe();
        let (intents_tx, intents_rx) = mpsc::channel(INTENT_CAPACITY);

        let task = AccessoryTask {
            device_id: config.id.clone(),
            capabilities: capabilities.clone(),
            toggle_policy: config.toggle_policy,
            band_policy: config.band_policy,
            state: Arc::clone(&state),
            callbacks: Arc::clone(&callbacks),
            status: status.clone(),
            connection,
            intents: intents_rx,
        };
        tokio::spawn(task.run());

        tracing::info!(
            device_id = %config.id,
            name = %config.display_name(),
            capabilities = ?capabilities.as_slice(),
            "Accessory created"
        );

        Ok(Self {
            device_id: config.id.clone(),
            name: config.display_name().to_string(),
            capabilities,
            state,
            intents: intents_tx,
            connection: status,
            callbacks,
        })
    }

    /// Returns the device id.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the exposed capabilities.
    #[must_use]
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Reads the current value of a capability.
    ///
    /// # Errors
    ///
    /// Returns `Error::CapabilityNotSupported` for undeclared capabilities.
    pub fn get(&self, capability: Capability) -> Result<CapabilityValue> {
        if !self.capabilities.contains(capability) {
            return Err(Error::CapabilityNotSupported(capability));
        }
        Ok(self.state.read().get(capability))
    }

    /// Sets a capability.
    ///
    /// Resolves once the state has been updated optimistically; the device
    /// write happens in the background and its failure is only logged.
    ///
    /// # Errors
    ///
    /// Returns `Error::CapabilityNotSupported` for undeclared capabilities,
    /// `Error::Value` for a value of the wrong kind and
    /// `Error::AccessoryStopped` after shutdown.
    pub async fn set(&self, capability: Capability, value: impl Into<CapabilityValue>) -> Result<()> {
        if !self.capabilities.contains(capability) {
            return Err(Error::CapabilityNotSupported(capability));
        }

        let (ack, done) = oneshot::channel();
        self.intents
            .send(Intent::Set {
                capability,
                value: value.into(),
                ack,
            })
            .await
            .map_err(|_| Error::AccessoryStopped)?;
        done.await.map_err(|_| Error::AccessoryStopped)?
    }

    /// Turns the fan on or off.
    ///
    /// # Errors
    ///
    /// Returns `Error::AccessoryStopped` after shutdown.
    pub async fn set_fan_power(&self, on: bool) -> Result<()> {
        self.set(Capability::FanPower, on).await
    }

    /// Sets the fan speed dial. Zero turns the fan off.
    ///
    /// # Errors
    ///
    /// Returns `Error::AccessoryStopped` after shutdown.
    pub async fn set_fan_speed(&self, speed: Percent) -> Result<()> {
        self.set(Capability::FanSpeed, speed).await
    }

    /// Sets the fan rotation direction.
    ///
    /// # Errors
    ///
    /// Returns `Error::AccessoryStopped` after shutdown.
    pub async fn set_fan_rotation(&self, direction: RotationDirection) -> Result<()> {
        self.set(Capability::FanRotation, direction).await
    }

    /// Turns the light on or off.
    ///
    /// # Errors
    ///
    /// Returns `Error::CapabilityNotSupported` without a light.
    pub async fn set_light_power(&self, on: bool) -> Result<()> {
        self.set(Capability::LightPower, on).await
    }

    /// Sets the light brightness. Zero turns the light off.
    ///
    /// # Errors
    ///
    /// Returns `Error::CapabilityNotSupported` without a light.
    pub async fn set_light_brightness(&self, brightness: Percent) -> Result<()> {
        self.set(Capability::LightBrightness, brightness).await
    }

    /// Sets the light color temperature.
    ///
    /// # Errors
    ///
    /// Returns `Error::CapabilityNotSupported` without color temperature.
    pub async fn set_light_color_temperature(&self, ct: ColorTemperature) -> Result<()> {
        self.set(Capability::LightColorTemperature, ct).await
    }

    /// Returns a snapshot of the whole capability state.
    #[must_use]
    pub fn state(&self) -> FanState {
        self.state.read().clone()
    }

    /// Returns the current connection status.
    #[must_use]
    pub fn connection_status(&self) -> ConnectionStatus {
        *self.connection.borrow()
    }

    /// Creates a watch receiver for connection status changes.
    #[must_use]
    pub fn watch_connection(&self) -> watch::Receiver<ConnectionStatus> {
        self.connection.clone()
    }

    /// Stops the accessory task and closes the session.
    ///
    /// Registered callbacks are dropped. Later `set` calls fail with
    /// `Error::AccessoryStopped`. Calling this more than once is harmless.
    pub async fn shutdown(&self) {
        let (ack, done) = oneshot::channel();
        if self.intents.send(Intent::Shutdown { ack }).await.is_ok() {
            let _ = done.await;
        }
    }
}

impl Subscribable for FanAccessory {
    fn on_capability_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&CapabilityUpdate) + Send + Sync + 'static,
    {
        self.callbacks.on_capability_changed(callback)
    }

    fn on_connection_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ConnectionStatus) + Send + Sync + 'static,
    {
        self.callbacks.on_connection_changed(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }
}

/// Owns the connection and the write side of the state.
struct AccessoryTask<T: Transport> {
    device_id: String,
    capabilities: CapabilitySet,
    toggle_policy: TogglePolicy,
    band_policy: BandPolicy,
    state: Arc<RwLock<FanState>>,
    callbacks: Arc<CallbackRegistry>,
    status: watch::Receiver<ConnectionStatus>,
    connection: ConnectionManager<T>,
    intents: mpsc::Receiver<Intent>,
}

impl<T: Transport> AccessoryTask<T> {
    async fn run(mut self) {
        tracing::debug!(device_id = %self.device_id, "Accessory task started");
        self.connection.connect();

        loop {
            tokio::select! {
                intent = self.intents.recv() => match intent {
                    Some(Intent::Set { capability, value, ack }) => {
                        let _ = ack.send(self.handle_set(capability, value));
                    }
                    Some(Intent::Shutdown { ack }) => {
                        self.stop();
                        let _ = ack.send(());
                        break;
                    }
                    None => {
                        self.stop();
                        break;
                    }
                },
                Some(dps) = self.connection.recv() => self.handle_report(&dps),
                Ok(()) = self.status.changed() => {
                    let status = *self.status.borrow_and_update();
                    self.callbacks.dispatch_connection(status);
                }
            }
        }

        tracing::debug!(device_id = %self.device_id, "Accessory task stopped");
    }

    fn stop(&mut self) {
        self.connection.shutdown();
        // Releases whatever the callbacks captured, e.g. the bridge
        self.callbacks.clear();
    }

    fn handle_set(&mut self, capability: Capability, value: CapabilityValue) -> Result<()> {
        let plan = dispatcher::dispatch(
            &self.capabilities,
            self.toggle_policy,
            &self.state.read(),
            capability,
            value,
        )?;

        tracing::debug!(device_id = %self.device_id, %capability, %value, "Set requested");

        {
            let mut state = self.state.write();
            for change in &plan.changes {
                state.apply(change);
            }
        }

        for write in plan.writes {
            let dp = write.dp;
            if let Err(e) = self.connection.write(write) {
                tracing::warn!(device_id = %self.device_id, %dp, error = %e, "Write dropped");
            }
        }

        for update in &plan.notifications {
            self.callbacks.dispatch(update);
        }
        Ok(())
    }

    fn handle_report(&mut self, dps: &DpMap) {
        let report = ingestion::ingest(
            &self.device_id,
            &self.capabilities,
            self.band_policy,
            &self.state.read(),
            dps,
        );

        {
            let mut state = self.state.write();
            for change in &report.changes {
                state.apply(change);
            }
        }

        for update in &report.notifications {
            self.callbacks.dispatch(update);
        }
    }
}
