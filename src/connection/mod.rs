// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection lifecycle for a single device.
//!
//! # Overview
//!
//! The [`ConnectionManager`] keeps one transport session alive:
//!
//! - **Single attempt in flight**: repeated `connect` calls while connecting,
//!   connected or waiting for a retry start nothing new
//! - **Fixed-delay retry**: a failed attempt schedules one retry after the
//!   [`RetryPolicy`] delay
//! - **Immediate reconnect**: a dropped session reconnects right away; a
//!   session error does the same unless [`ErrorAction::LogOnly`] is set
//! - **Ordered writes**: each session has a writer task that sends data point
//!   writes in order; writes while disconnected are dropped
//! - **Status watch**: every transition is published as a
//!   [`ConnectionStatus`] on a `tokio::sync::watch` channel
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use fanlink::connection::{ConnectionManager, ErrorAction, RetryPolicy};
//! use fanlink::protocol::{DeviceIdentity, Transport};
//!
//! async fn run<T: Transport>(transport: Arc<T>) {
//!     let identity = DeviceIdentity::new("bf01", "local-key");
//!     let mut manager =
//!         ConnectionManager::new(transport, identity, RetryPolicy::default(), ErrorAction::Reconnect);
//!
//!     manager.connect();
//!     while let Some(dps) = manager.recv().await {
//!         println!("device reported {} data points", dps.len());
//!     }
//! }
//! ```

mod manager;
mod policy;
mod state;

pub use manager::ConnectionManager;
pub use policy::{DEFAULT_RETRY_DELAY, ErrorAction, RetryPolicy};
pub use state::{ConnectionState, ConnectionStatus};
