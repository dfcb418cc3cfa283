// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Last-known capability values of one accessory.

use crate::capability::{Capability, CapabilityValue};
use crate::types::{ColorTemperature, Percent, RotationDirection};

use super::StateChange;

/// Default fan speed dial position.
const DEFAULT_FAN_SPEED: Percent = Percent::clamped(20);

/// Default light brightness.
const DEFAULT_LIGHT_BRIGHTNESS: Percent = Percent::clamped(60);

/// Capability state of a fan accessory.
///
/// Every field holds whichever is more recent: the last value commanded by
/// the bridge or the last value reported by the device. Unlike a generic
/// device cache, every field always has a value; the defaults stand in until
/// the device reports.
///
/// # Examples
///
/// ```
/// use fanlink::state::FanState;
/// use fanlink::types::{Percent, RotationDirection};
///
/// let state = FanState::default();
/// assert!(!state.fan_power());
/// assert_eq!(state.fan_speed(), Percent::new(20).unwrap());
/// assert_eq!(state.light_brightness(), Percent::new(60).unwrap());
/// assert_eq!(state.fan_rotation(), RotationDirection::Forward);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FanState {
    fan_power: bool,
    fan_rotation: RotationDirection,
    fan_speed: Percent,
    light_power: bool,
    light_brightness: Percent,
    light_color_temperature: ColorTemperature,
}

impl Default for FanState {
    fn default() -> Self {
        Self {
            fan_power: false,
            fan_rotation: RotationDirection::Forward,
            fan_speed: DEFAULT_FAN_SPEED,
            light_power: false,
            light_brightness: DEFAULT_LIGHT_BRIGHTNESS,
            light_color_temperature: ColorTemperature::default(),
        }
    }
}

impl FanState {
    /// Creates a state with the documented defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fan on/off.
    #[must_use]
    pub fn fan_power(&self) -> bool {
        self.fan_power
    }

    /// Fan rotation direction.
    #[must_use]
    pub fn fan_rotation(&self) -> RotationDirection {
        self.fan_rotation
    }

    /// Fan speed dial.
    #[must_use]
    pub fn fan_speed(&self) -> Percent {
        self.fan_speed
    }

    /// Light on/off.
    #[must_use]
    pub fn light_power(&self) -> bool {
        self.light_power
    }

    /// Light brightness.
    #[must_use]
    pub fn light_brightness(&self) -> Percent {
        self.light_brightness
    }

    /// Light color temperature.
    #[must_use]
    pub fn light_color_temperature(&self) -> ColorTemperature {
        self.light_color_temperature
    }

    /// Reads a capability. Toggle switches mirror the power they drive.
    #[must_use]
    pub fn get(&self, capability: Capability) -> CapabilityValue {
        match capability {
            Capability::FanPower | Capability::FanToggle => self.fan_power.into(),
            Capability::FanRotation => self.fan_rotation.into(),
            Capability::FanSpeed => self.fan_speed.into(),
            Capability::LightPower | Capability::LightToggle => self.light_power.into(),
            Capability::LightBrightness => self.light_brightness.into(),
            Capability::LightColorTemperature => self.light_color_temperature.into(),
        }
    }

    /// Applies a change.
    ///
    /// Returns `true` if the stored value actually changed.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match *change {
            StateChange::FanPower(v) => replace(&mut self.fan_power, v),
            StateChange::FanRotation(v) => replace(&mut self.fan_rotation, v),
            StateChange::FanSpeed(v) => replace(&mut self.fan_speed, v),
            StateChange::LightPower(v) => replace(&mut self.light_power, v),
            StateChange::LightBrightness(v) => replace(&mut self.light_brightness, v),
            StateChange::LightColorTemperature(v) => {
                replace(&mut self.light_color_temperature, v)
            }
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}
