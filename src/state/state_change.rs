// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! A [`StateChange`] overwrites exactly one field of a
//! [`FanState`](super::FanState). Both the command dispatcher (optimistic
//! writes) and event ingestion (device reports) express their effect as
//! state changes, so the store has a single mutation path.

use crate::capability::{Capability, CapabilityValue};
use crate::types::{ColorTemperature, Percent, RotationDirection};

/// A write to one field of the capability state.
///
/// # Examples
///
/// ```
/// use fanlink::state::{FanState, StateChange};
///
/// let mut state = FanState::default();
/// assert!(state.apply(&StateChange::FanPower(true)));
/// assert!(!state.apply(&StateChange::FanPower(true)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StateChange {
    /// Fan power.
    FanPower(bool),
    /// Fan rotation direction.
    FanRotation(RotationDirection),
    /// Fan speed dial.
    FanSpeed(Percent),
    /// Light power.
    LightPower(bool),
    /// Light brightness.
    LightBrightness(Percent),
    /// Light color temperature.
    LightColorTemperature(ColorTemperature),
}

impl StateChange {
    /// Returns the primary capability this change is visible through.
    #[must_use]
    pub const fn capability(&self) -> Capability {
        match self {
            Self::FanPower(_) => Capability::FanPower,
            Self::FanRotation(_) => Capability::FanRotation,
            Self::FanSpeed(_) => Capability::FanSpeed,
            Self::LightPower(_) => Capability::LightPower,
            Self::LightBrightness(_) => Capability::LightBrightness,
            Self::LightColorTemperature(_) => Capability::LightColorTemperature,
        }
    }

    /// Returns the new value as a bridge value.
    #[must_use]
    pub const fn value(&self) -> CapabilityValue {
        match self {
            Self::FanPower(b) | Self::LightPower(b) => CapabilityValue::Bool(*b),
            Self::FanRotation(r) => CapabilityValue::Rotation(*r),
            Self::FanSpeed(p) | Self::LightBrightness(p) => CapabilityValue::Percent(*p),
            Self::LightColorTemperature(ct) => CapabilityValue::ColorTemperature(*ct),
        }
    }

    /// Returns `true` for fan and light power changes.
    #[must_use]
    pub const fn is_power(&self) -> bool {
        matches!(self, Self::FanPower(_) | Self::LightPower(_))
    }

    /// Returns `true` if this change touches the light component.
    #[must_use]
    pub const fn is_light(&self) -> bool {
        matches!(
            self,
            Self::LightPower(_) | Self::LightBrightness(_) | Self::LightColorTemperature(_)
        )
    }
}
