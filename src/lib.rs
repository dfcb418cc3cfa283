// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `fanlink` - Keeps networked ceiling fans in sync with a home-automation bridge.
//!
//! The device represents its state as a flat map of numbered data points;
//! the bridge thinks in capabilities (fan on, speed 70%, light brightness).
//! This library sits between the two: it keeps one reconnecting session
//! per device, turns bridge commands into data point writes, and turns
//! device reports into capability notifications.
//!
//! # Supported Features
//!
//! - **Fan control**: Power, 6-step speed behind a 0-100% dial, rotation direction
//! - **Light control**: Power, brightness, color temperature presets
//! - **Toggle switches**: Momentary buttons mapped onto power with a configurable policy
//! - **Connection lifecycle**: Single in-flight connect, fixed-delay retry, immediate reconnect
//! - **Platform**: Stable accessory UUIDs, bridge cache reconciliation
//!
//! The wire protocol itself (discovery, encryption, framing) is provided by
//! a [`protocol::Transport`] implementation.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use fanlink::accessory::{AccessoryConfig, FanAccessory};
//! use fanlink::protocol::Transport;
//! use fanlink::subscription::Subscribable;
//! use fanlink::types::Percent;
//!
//! async fn run<T: Transport>(transport: Arc<T>) -> fanlink::Result<()> {
//!     let config = AccessoryConfig::new("bf01", "local-key").with_light(true);
//!     let fan = FanAccessory::spawn(&config, transport)?;
//!
//!     fan.on_capability_changed(|update| {
//!         println!("{} is now {}", update.capability, update.value);
//!     });
//!
//!     fan.set_fan_speed(Percent::new(70)?).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Platform
//!
//! ```no_run
//! use std::sync::Arc;
//! use fanlink::accessory::PlatformConfig;
//! use fanlink::platform::{Bridge, Platform};
//! use fanlink::protocol::Transport;
//!
//! async fn run<T: Transport, B: Bridge>(transport: Arc<T>, bridge: Arc<B>, json: &str) -> fanlink::Result<()> {
//!     let config = PlatformConfig::from_json(json)?;
//!     let mut platform = Platform::new(config, transport, bridge)?;
//!     platform.launch()?;
//!     Ok(())
//! }
//! ```

pub mod accessory;
mod capability;
pub mod codec;
pub mod connection;
pub mod error;
pub mod platform;
pub mod protocol;
pub mod state;
pub mod subscription;
pub mod types;

pub use accessory::{AccessoryConfig, FanAccessory, PlatformConfig, TogglePolicy};
pub use capability::{Capability, CapabilitySet, CapabilityUpdate, CapabilityValue};
pub use connection::{ConnectionState, ConnectionStatus, ErrorAction, RetryPolicy};
pub use error::{ConfigError, DecodeError, Error, Result, TransportError, ValueError};
pub use platform::{AccessoryInfo, Bridge, Platform};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::{BandPolicy, ColorTemperature, Percent, RotationDirection, SpeedStep};
