// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge-facing capabilities and the per-accessory capability set.
//!
//! A [`Capability`] is an abstract attribute the bridge can read and write,
//! independent of its wire encoding. Which capabilities an accessory exposes
//! is decided once, at construction, from its configuration
//! ([`CapabilitySet::from_flags`]); undeclared capabilities are never
//! registered with the bridge and are rejected by `get`/`set`.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;
use crate::types::{ColorTemperature, Percent, RotationDirection};

/// An attribute exposed to the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// Fan on/off.
    FanPower,
    /// Fan rotation direction.
    FanRotation,
    /// Fan speed dial (percent).
    FanSpeed,
    /// Momentary switch that pulses the fan's power.
    FanToggle,
    /// Light on/off.
    LightPower,
    /// Light brightness (percent).
    LightBrightness,
    /// Light color temperature (mireds).
    LightColorTemperature,
    /// Momentary switch that pulses the light's power.
    LightToggle,
}

impl Capability {
    /// Every capability, in registration order.
    pub const ALL: [Self; 8] = [
        Self::FanPower,
        Self::FanRotation,
        Self::FanSpeed,
        Self::FanToggle,
        Self::LightPower,
        Self::LightBrightness,
        Self::LightColorTemperature,
        Self::LightToggle,
    ];

    /// Returns the stable name used for handler registration.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FanPower => "fan_power",
            Self::FanRotation => "fan_rotation",
            Self::FanSpeed => "fan_speed",
            Self::FanToggle => "fan_toggle",
            Self::LightPower => "light_power",
            Self::LightBrightness => "light_brightness",
            Self::LightColorTemperature => "light_color_temperature",
            Self::LightToggle => "light_toggle",
        }
    }

    /// Returns `true` for momentary toggle switches.
    #[must_use]
    pub const fn is_toggle(&self) -> bool {
        matches!(self, Self::FanToggle | Self::LightToggle)
    }

    /// Returns `true` for capabilities of the light component.
    #[must_use]
    pub const fn is_light(&self) -> bool {
        matches!(
            self,
            Self::LightPower
                | Self::LightBrightness
                | Self::LightColorTemperature
                | Self::LightToggle
        )
    }

    /// Returns the toggle switch paired with a power capability, and vice versa.
    #[must_use]
    pub const fn paired_switch(&self) -> Option<Self> {
        match self {
            Self::FanPower => Some(Self::FanToggle),
            Self::FanToggle => Some(Self::FanPower),
            Self::LightPower => Some(Self::LightToggle),
            Self::LightToggle => Some(Self::LightPower),
            _ => None,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Capability {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| ValueError::UnknownCapability(s.to_string()))
    }
}

/// A capability value as seen by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityValue {
    /// On/off switches.
    Bool(bool),
    /// Speed and brightness dials.
    Percent(Percent),
    /// Fan rotation.
    Rotation(RotationDirection),
    /// Light color temperature.
    ColorTemperature(ColorTemperature),
}

impl CapabilityValue {
    /// Returns the boolean, if this is a switch value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the percentage, if this is a dial value.
    #[must_use]
    pub const fn as_percent(&self) -> Option<Percent> {
        match self {
            Self::Percent(p) => Some(*p),
            _ => None,
        }
    }
}

impl fmt::Display for CapabilityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Percent(p) => write!(f, "{p}"),
            Self::Rotation(r) => write!(f, "{r}"),
            Self::ColorTemperature(ct) => write!(f, "{ct}"),
        }
    }
}

impl From<bool> for CapabilityValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Percent> for CapabilityValue {
    fn from(value: Percent) -> Self {
        Self::Percent(value)
    }
}

impl From<RotationDirection> for CapabilityValue {
    fn from(value: RotationDirection) -> Self {
        Self::Rotation(value)
    }
}

impl From<ColorTemperature> for CapabilityValue {
    fn from(value: ColorTemperature) -> Self {
        Self::ColorTemperature(value)
    }
}

/// A capability paired with its new value, as pushed to the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityUpdate {
    /// The capability that changed.
    pub capability: Capability,
    /// Its current value.
    pub value: CapabilityValue,
}

impl CapabilityUpdate {
    /// Creates an update.
    #[must_use]
    pub fn new(capability: Capability, value: impl Into<CapabilityValue>) -> Self {
        Self {
            capability,
            value: value.into(),
        }
    }
}

/// The capabilities an accessory exposes.
///
/// # Examples
///
/// ```
/// use fanlink::{Capability, CapabilitySet};
///
/// let set = CapabilitySet::from_flags(true, false, false);
/// assert!(set.contains(Capability::FanSpeed));
/// assert!(set.contains(Capability::LightBrightness));
/// assert!(!set.contains(Capability::FanToggle));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySet(Vec<Capability>);

impl CapabilitySet {
    /// Builds the set from the configuration flags.
    ///
    /// The fan is always present. The light adds power and brightness; color
    /// temperature additionally requires a light. Toggle switches are added
    /// for each present power capability.
    #[must_use]
    pub fn from_flags(has_light: bool, with_toggle: bool, has_color_temperature: bool) -> Self {
        let set = Capability::ALL
            .into_iter()
            .filter(|c| match c {
                Capability::FanPower | Capability::FanRotation | Capability::FanSpeed => true,
                Capability::FanToggle => with_toggle,
                Capability::LightPower | Capability::LightBrightness => has_light,
                Capability::LightColorTemperature => has_light && has_color_temperature,
                Capability::LightToggle => has_light && with_toggle,
            })
            .collect();
        Self(set)
    }

    /// Returns `true` if the capability is exposed.
    #[must_use]
    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    /// Returns `true` if any light capability is exposed.
    #[must_use]
    pub fn has_light(&self) -> bool {
        self.0.iter().any(Capability::is_light)
    }

    /// Returns the exposed capabilities in registration order.
    #[must_use]
    pub fn as_slice(&self) -> &[Capability] {
        &self.0
    }

    /// Iterates the exposed capabilities.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }
}
