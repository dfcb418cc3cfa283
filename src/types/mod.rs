// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for fan and light control.
//!
//! Each type validates its range at construction time and owns the
//! conversion between the bridge representation and the device encoding.
//!
//! # Types
//!
//! - [`Percent`] - Bridge dial value (0-100%)
//! - [`SpeedStep`] - Motor speed step (1-6), with the percent band mapping
//! - [`RotationDirection`] - Forward / reverse
//! - [`WireBrightness`] - Device brightness in tenths of a percent (0-1000)
//! - [`ColorTemperature`] - Mireds (140-500), with the device preset mapping

mod brightness;
mod color;
mod percent;
mod rotation;
mod speed;

pub use brightness::WireBrightness;
pub use color::ColorTemperature;
pub use percent::Percent;
pub use rotation::RotationDirection;
pub use speed::{BandPolicy, SpeedStep};
