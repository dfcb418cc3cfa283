// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `fanlink` library.
//!
//! Bridge-facing operations return [`Error`]. Transport and decoding
//! failures have their own types because the engine mostly logs and
//! recovers from them instead of returning them: a failed connect is
//! retried, a failed write is dropped, a malformed data point is skipped.

use thiserror::Error;

use crate::capability::Capability;
use crate::protocol::DpId;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A capability value failed validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A data point value could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The accessory configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The capability is not declared for this accessory.
    #[error("capability {0} is not exposed by this accessory")]
    CapabilityNotSupported(Capability),

    /// The accessory task has stopped and no longer accepts commands.
    #[error("accessory task has stopped")]
    AccessoryStopped,
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// An unknown rotation direction string.
    #[error("invalid rotation direction: {0}")]
    InvalidRotation(String),

    /// An unknown capability name.
    #[error("unknown capability: {0}")]
    UnknownCapability(String),

    /// The value kind does not match the capability.
    #[error("capability {capability} expects {expected}")]
    WrongKind {
        /// The capability being set.
        capability: Capability,
        /// Description of the expected value kind.
        expected: &'static str,
    },
}

/// Errors reported by the transport layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Discovery or session establishment failed.
    #[error("device unavailable: {0}")]
    Unavailable(String),

    /// The device could not be found on the network.
    #[error("device not found: {0}")]
    NotFound(String),

    /// The session dropped.
    #[error("session disconnected")]
    Disconnected,

    /// A data point write failed or timed out.
    #[error("write of DP {dp} failed: {message}")]
    WriteFailed {
        /// The data point being written.
        dp: DpId,
        /// Transport-specific description.
        message: String,
    },
}

impl TransportError {
    /// Returns `true` if the device could not be located at all.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// A data point carried a value this library cannot interpret.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The raw value has the wrong JSON type.
    #[error("DP {dp}: expected {expected}, got {actual}")]
    WrongType {
        /// The offending data point.
        dp: DpId,
        /// Expected raw type.
        expected: &'static str,
        /// Rendered raw value.
        actual: String,
    },

    /// The raw value has the right type but is out of range.
    #[error("DP {dp}: {source}")]
    OutOfRange {
        /// The offending data point.
        dp: DpId,
        /// The underlying validation failure.
        source: ValueError,
    },
}

/// Errors found while validating accessory configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required field is empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The same device id appears twice.
    #[error("duplicate device id: {0}")]
    DuplicateDevice(String),

    /// JSON parsing failed.
    #[error("invalid JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
