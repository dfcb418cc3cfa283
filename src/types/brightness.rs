// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device-side brightness encoding.

use std::fmt;

use crate::error::ValueError;

use super::Percent;

/// Light brightness as the device encodes it: tenths of a percent (0-1000).
///
/// # Examples
///
/// ```
/// use fanlink::types::{Percent, WireBrightness};
///
/// let wire = WireBrightness::from_percent(Percent::new(60).unwrap());
/// assert_eq!(wire.value(), 600);
/// assert_eq!(WireBrightness::new(455).unwrap().to_percent().value(), 45);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WireBrightness(u16);

impl WireBrightness {
    /// Maximum raw value.
    pub const MAX: u16 = 1000;

    /// Creates a raw brightness value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 1000.
    pub fn new(value: u16) -> Result<Self, ValueError> {
        if value > Self::MAX {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: i64::from(Self::MAX),
                actual: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Encodes a bridge percentage (`percent * 10`).
    #[must_use]
    pub fn from_percent(percent: Percent) -> Self {
        Self(u16::from(percent.value()) * 10)
    }

    /// Decodes to a bridge percentage (`raw / 10`, truncating).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_percent(&self) -> Percent {
        // Safe: raw / 10 is at most 100
        Percent::clamped((self.0 / 10) as u8)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for WireBrightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
