// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light color temperature.
//!
//! The bridge works in mireds (140-500). The fan's light only has three
//! white presets, reported on a 0-1000 scale as 0 (cold), 500 (neutral)
//! and 1000 (warm).

use std::fmt;

use crate::error::ValueError;

/// Device scale value for the cold preset.
const DEVICE_COLD: u16 = 0;
/// Device scale value for the neutral preset.
const DEVICE_NEUTRAL: u16 = 500;
/// Device scale value for the warm preset.
const DEVICE_WARM: u16 = 1000;

/// Color temperature in mireds (140-500).
///
/// # Examples
///
/// ```
/// use fanlink::types::ColorTemperature;
///
/// let ct = ColorTemperature::new(250).unwrap();
/// assert_eq!(ct.to_device(), 500);
/// assert_eq!(ColorTemperature::from_device(1000), ColorTemperature::WARM);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u16", into = "u16")]
pub struct ColorTemperature(u16);

impl ColorTemperature {
    /// Minimum mireds accepted by the bridge.
    pub const MIN: u16 = 140;

    /// Maximum mireds accepted by the bridge.
    pub const MAX: u16 = 500;

    /// Coldest preset.
    pub const COLD: Self = Self(140);

    /// Neutral preset.
    pub const NEUTRAL: Self = Self(320);

    /// Warmest preset.
    pub const WARM: Self = Self(500);

    /// Creates a color temperature.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if mireds are outside [140, 500].
    pub fn new(mireds: u16) -> Result<Self, ValueError> {
        if !(Self::MIN..=Self::MAX).contains(&mireds) {
            return Err(ValueError::OutOfRange {
                min: i64::from(Self::MIN),
                max: i64::from(Self::MAX),
                actual: i64::from(mireds),
            });
        }
        Ok(Self(mireds))
    }

    /// Returns the value in mireds.
    #[must_use]
    pub const fn mireds(&self) -> u16 {
        self.0
    }

    /// Snaps to the nearest device preset on the 0-1000 scale.
    #[must_use]
    pub const fn to_device(&self) -> u16 {
        match self.0 {
            140..230 => DEVICE_COLD,
            230..430 => DEVICE_NEUTRAL,
            430..=500 => DEVICE_WARM,
            _ => DEVICE_COLD,
        }
    }

    /// Maps a device preset back to mireds. Unknown values fall back to cold.
    #[must_use]
    pub const fn from_device(raw: u16) -> Self {
        match raw {
            DEVICE_NEUTRAL => Self::NEUTRAL,
            DEVICE_WARM => Self::WARM,
            _ => Self::COLD,
        }
    }
}

impl Default for ColorTemperature {
    fn default() -> Self {
        Self::COLD
    }
}

impl fmt::Display for ColorTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mired", self.0)
    }
}

impl TryFrom<u16> for ColorTemperature {
    type Error = ValueError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ColorTemperature> for u16 {
    fn from(value: ColorTemperature) -> Self {
        value.0
    }
}
