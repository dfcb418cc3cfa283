// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device protocol model and transport abstraction.
//!
//! The device represents its state as a flat map of small integer data
//! points ([`DpId`]) to primitive values ([`DpValue`]). Transports deliver
//! partial maps ([`DpMap`]) as events and accept single writes
//! ([`DpWrite`]).
//!
//! | DP | Meaning | Raw domain |
//! |----|---------|------------|
//! | 20 | light power | bool |
//! | 22 | light brightness | integer 0-1000 |
//! | 23 | light color temperature | integer 0-1000 |
//! | 60 | fan power | bool |
//! | 62 | fan speed step | integer 1-6 |
//! | 63 | fan rotation | `"forward"` / `"reverse"` |

mod dp;
mod transport;

pub use dp::{DpId, DpMap, DpValue, DpWrite};
pub use transport::{DeviceIdentity, EstablishedSession, Session, SessionEvent, Transport};
