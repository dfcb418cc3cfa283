// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Data point identifiers, raw values and maps.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ConfigError, DecodeError};

/// Index of a device data point.
///
/// # Examples
///
/// ```
/// use fanlink::protocol::DpId;
///
/// assert_eq!(DpId::FAN_SPEED.value(), 62);
/// assert_eq!(DpId::new(62), DpId::FAN_SPEED);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct DpId(u8);

impl DpId {
    /// Light on/off (bool).
    pub const LIGHT_POWER: Self = Self(20);
    /// Light brightness in tenths of a percent (integer 0-1000).
    pub const LIGHT_BRIGHTNESS: Self = Self(22);
    /// Light color temperature (integer 0-1000).
    pub const LIGHT_COLOR_TEMPERATURE: Self = Self(23);
    /// Fan on/off (bool).
    pub const FAN_POWER: Self = Self(60);
    /// Fan speed step (integer 1-6).
    pub const FAN_SPEED: Self = Self(62);
    /// Fan rotation (`"forward"` / `"reverse"`).
    pub const FAN_ROTATION: Self = Self(63);

    /// Creates a data point id.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for DpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A raw, type-erased data point value.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum DpValue {
    /// Boolean switch value.
    Bool(bool),
    /// Integer value (steps, scaled percentages).
    Integer(i64),
    /// Enumerated string value.
    String(String),
}

impl DpValue {
    /// Returns the JSON type name used in decode errors.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::String(_) => "string",
        }
    }

    /// Extracts a boolean.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::WrongType` for any other kind.
    pub fn as_bool(&self, dp: DpId) -> Result<bool, DecodeError> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(other.wrong_type(dp, "bool")),
        }
    }

    /// Extracts an integer.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::WrongType` for any other kind.
    pub fn as_integer(&self, dp: DpId) -> Result<i64, DecodeError> {
        match self {
            Self::Integer(i) => Ok(*i),
            other => Err(other.wrong_type(dp, "integer")),
        }
    }

    /// Extracts a string.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::WrongType` for any other kind.
    pub fn as_str(&self, dp: DpId) -> Result<&str, DecodeError> {
        match self {
            Self::String(s) => Ok(s),
            other => Err(other.wrong_type(dp, "string")),
        }
    }

    fn wrong_type(&self, dp: DpId, expected: &'static str) -> DecodeError {
        DecodeError::WrongType {
            dp,
            expected,
            actual: self.to_string(),
        }
    }
}

impl fmt::Display for DpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for DpValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for DpValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for DpValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// A set of data point values, as carried by one device event.
///
/// Events are deltas: a key that is absent means "unchanged", never "unset".
///
/// # Examples
///
/// ```
/// use fanlink::protocol::{DpId, DpMap, DpValue};
///
/// let map = DpMap::from_json(r#"{"60": true, "62": 3}"#).unwrap();
/// assert_eq!(map.get(DpId::FAN_POWER), Some(&DpValue::Bool(true)));
/// assert!(map.get(DpId::FAN_ROTATION).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DpMap(BTreeMap<DpId, DpValue>);

impl DpMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a device `dps` JSON object (keys are stringified indices).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` if the payload is not an object of
    /// bool/integer/string values keyed by small integers.
    pub fn from_json(payload: &str) -> Result<Self, ConfigError> {
        let raw: BTreeMap<u8, DpValue> = serde_json::from_str(payload)?;
        Ok(Self(raw.into_iter().map(|(k, v)| (DpId(k), v)).collect()))
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, dp: DpId, value: impl Into<DpValue>) -> Self {
        self.insert(dp, value);
        self
    }

    /// Inserts or replaces a value.
    pub fn insert(&mut self, dp: DpId, value: impl Into<DpValue>) {
        self.0.insert(dp, value.into());
    }

    /// Returns the value for a data point, if present.
    #[must_use]
    pub fn get(&self, dp: DpId) -> Option<&DpValue> {
        self.0.get(&dp)
    }

    /// Returns `true` if the data point is present.
    #[must_use]
    pub fn contains(&self, dp: DpId) -> bool {
        self.0.contains_key(&dp)
    }

    /// Iterates entries in ascending data point order.
    pub fn iter(&self) -> impl Iterator<Item = (DpId, &DpValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(DpId, DpValue)> for DpMap {
    fn from_iter<I: IntoIterator<Item = (DpId, DpValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A single outbound data point write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DpWrite {
    /// Target data point.
    pub dp: DpId,
    /// Encoded value.
    pub value: DpValue,
}

impl DpWrite {
    /// Creates a write.
    #[must_use]
    pub fn new(dp: DpId, value: impl Into<DpValue>) -> Self {
        Self {
            dp,
            value: value.into(),
        }
    }
}

impl fmt::Display for DpWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DP {} = {}", self.dp, self.value)
    }
}
