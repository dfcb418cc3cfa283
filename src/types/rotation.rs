// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan rotation direction.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Rotation direction of the fan blades.
///
/// The bridge shows this as clockwise / counter-clockwise; the device
/// reports `"forward"` / `"reverse"`.
///
/// # Examples
///
/// ```
/// use fanlink::types::RotationDirection;
///
/// assert_eq!(RotationDirection::Forward.as_wire(), "forward");
/// assert_eq!("reverse".parse::<RotationDirection>().unwrap(), RotationDirection::Reverse);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RotationDirection {
    /// Forward (clockwise on the bridge).
    #[default]
    Forward,
    /// Reverse (counter-clockwise on the bridge).
    Reverse,
}

impl RotationDirection {
    /// Returns the device wire string.
    #[must_use]
    pub const fn as_wire(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Reverse => "reverse",
        }
    }

    /// Returns the bridge characteristic value (0 = clockwise, 1 = counter-clockwise).
    #[must_use]
    pub const fn as_bridge_value(&self) -> u8 {
        match self {
            Self::Forward => 0,
            Self::Reverse => 1,
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn reversed(&self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

impl fmt::Display for RotationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for RotationDirection {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(Self::Forward),
            "reverse" => Ok(Self::Reverse),
            _ => Err(ValueError::InvalidRotation(s.to_string())),
        }
    }
}

impl TryFrom<u8> for RotationDirection {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Forward),
            1 => Ok(Self::Reverse),
            other => Err(ValueError::OutOfRange {
                min: 0,
                max: 1,
                actual: i64::from(other),
            }),
        }
    }
}
