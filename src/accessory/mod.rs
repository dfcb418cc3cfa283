// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan accessories: configuration, command dispatch and event ingestion.
//!
//! # Overview
//!
//! A [`FanAccessory`] is a handle to a per-device task. The task multiplexes
//! two inputs strictly in arrival order:
//!
//! - **Bridge intents**: `set` requests are planned by [`dispatch`] into
//!   optimistic state changes, data point writes and notifications
//! - **Device reports**: partial data point maps are decoded by [`ingest`]
//!   into state changes and notifications
//!
//! Reads (`get`) never wait for the task.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use fanlink::accessory::{AccessoryConfig, FanAccessory};
//! use fanlink::protocol::Transport;
//! use fanlink::subscription::Subscribable;
//!
//! async fn example<T: Transport>(transport: Arc<T>) -> fanlink::Result<()> {
//!     let config = AccessoryConfig::new("bf01", "local-key")
//!         .with_light(true)
//!         .with_toggle(true);
//!     let fan = FanAccessory::spawn(&config, transport)?;
//!
//!     fan.on_capability_changed(|update| {
//!         println!("{} -> {}", update.capability, update.value);
//!     });
//!
//!     fan.set_fan_power(true).await?;
//!     fan.shutdown().await;
//!     Ok(())
//! }
//! ```

mod config;
mod dispatcher;
mod fan;
mod ingestion;
mod toggle;

pub use config::{AccessoryConfig, PlatformConfig};
pub use dispatcher::{Dispatch, dispatch};
pub use fan::FanAccessory;
pub use ingestion::{Ingest, ingest};
pub use toggle::TogglePolicy;
