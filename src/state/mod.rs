// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capability state store.
//!
//! [`FanState`] holds the last-known value of every capability of one
//! accessory; [`StateChange`] is the single way to mutate it.
//!
//! # Examples
//!
//! ```
//! use fanlink::state::{FanState, StateChange};
//! use fanlink::types::Percent;
//!
//! let mut state = FanState::new();
//! state.apply(&StateChange::FanSpeed(Percent::new(70).unwrap()));
//! assert_eq!(state.fan_speed().value(), 70);
//! ```

mod fan_state;
mod state_change;

pub use fan_state::FanState;
pub use state_change::StateChange;
