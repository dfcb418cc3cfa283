// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory and platform configuration.
//!
//! The shape follows the bridge's JSON platform block:
//!
//! ```json
//! {
//!   "platform": "CreateCeilingFan",
//!   "name": "Ceiling fans",
//!   "devices": [
//!     { "id": "bf01", "key": "local-key", "name": "Bedroom", "hasLight": true }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::capability::CapabilitySet;
use crate::connection::{ErrorAction, RetryPolicy};
use crate::error::ConfigError;
use crate::protocol::DeviceIdentity;
use crate::types::BandPolicy;

use super::TogglePolicy;

/// Configuration of one fan accessory.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use fanlink::accessory::AccessoryConfig;
///
/// let config = AccessoryConfig::new("bf01", "local-key")
///     .with_name("Bedroom")
///     .with_light(true)
///     .with_discovery_retry_delay(Duration::from_secs(600));
///
/// assert_eq!(config.display_name(), "Bedroom");
/// assert!(config.capabilities().has_light());
/// ```
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryConfig {
    /// Device id, also the seed of the accessory UUID.
    pub id: String,
    /// Local encryption key.
    pub key: String,
    /// Known network address; skips broadcast discovery when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Protocol version reported by the device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The fan has a light.
    #[serde(default)]
    pub has_light: bool,
    /// Expose momentary toggle switches.
    #[serde(default)]
    pub with_toggle: bool,
    /// The light supports color temperature.
    #[serde(default)]
    pub has_color_temperature: bool,
    /// Seconds between connect attempts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_delay_secs: Option<u64>,
    /// Seconds between attempts after discovery found nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery_retry_delay_secs: Option<u64>,
    /// How toggle presses map onto power.
    #[serde(default)]
    pub toggle_policy: TogglePolicy,
    /// Reconnect when the session reports an error.
    #[serde(default = "default_reconnect_on_error")]
    pub reconnect_on_error: bool,
    /// How reported speed steps map onto the dial.
    #[serde(default)]
    pub band_policy: BandPolicy,
}

fn default_reconnect_on_error() -> bool {
    true
}

impl AccessoryConfig {
    /// Creates a fan-only configuration with default policies.
    #[must_use]
    pub fn new(id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            ip: None,
            version: None,
            name: None,
            has_light: false,
            with_toggle: false,
            has_color_temperature: false,
            retry_delay_secs: None,
            discovery_retry_delay_secs: None,
            toggle_policy: TogglePolicy::default(),
            reconnect_on_error: default_reconnect_on_error(),
            band_policy: BandPolicy::default(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets a known network address.
    #[must_use]
    pub fn with_address(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    /// Sets the protocol version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Declares the light component.
    #[must_use]
    pub fn with_light(mut self, has_light: bool) -> Self {
        self.has_light = has_light;
        self
    }

    /// Declares toggle switches.
    #[must_use]
    pub fn with_toggle(mut self, with_toggle: bool) -> Self {
        self.with_toggle = with_toggle;
        self
    }

    /// Declares light color temperature.
    #[must_use]
    pub fn with_color_temperature(mut self, has_color_temperature: bool) -> Self {
        self.has_color_temperature = has_color_temperature;
        self
    }

    /// Sets the delay between connect attempts.
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay_secs = Some(delay.as_secs());
        self
    }

    /// Sets the delay used after discovery found nothing.
    #[must_use]
    pub fn with_discovery_retry_delay(mut self, delay: Duration) -> Self {
        self.discovery_retry_delay_secs = Some(delay.as_secs());
        self
    }

    /// Sets the toggle policy.
    #[must_use]
    pub fn with_toggle_policy(mut self, policy: TogglePolicy) -> Self {
        self.toggle_policy = policy;
        self
    }

    /// Sets whether session errors trigger a reconnect.
    #[must_use]
    pub fn with_reconnect_on_error(mut self, reconnect: bool) -> Self {
        self.reconnect_on_error = reconnect;
        self
    }

    /// Sets the speed band policy.
    #[must_use]
    pub fn with_band_policy(mut self, policy: BandPolicy) -> Self {
        self.band_policy = policy;
        self
    }

    /// Returns the name, falling back to the device id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Builds the device identity handed to the transport.
    #[must_use]
    pub fn identity(&self) -> DeviceIdentity {
        let mut identity = DeviceIdentity::new(&self.id, &self.key);
        if let Some(ip) = &self.ip {
            identity = identity.with_address(ip);
        }
        if let Some(version) = &self.version {
            identity = identity.with_version(version);
        }
        identity
    }

    /// Evaluates the optional-component flags.
    #[must_use]
    pub fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::from_flags(self.has_light, self.with_toggle, self.has_color_temperature)
    }

    /// Builds the retry policy.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        let mut policy = RetryPolicy::new();
        if let Some(secs) = self.retry_delay_secs {
            policy = policy.with_delay(Duration::from_secs(secs));
        }
        if let Some(secs) = self.discovery_retry_delay_secs {
            policy = policy.with_not_found_delay(Duration::from_secs(secs));
        }
        policy
    }

    /// Maps `reconnect_on_error` onto an [`ErrorAction`].
    #[must_use]
    pub fn error_action(&self) -> ErrorAction {
        ErrorAction::from_reconnect_flag(self.reconnect_on_error)
    }

    /// Checks required fields.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if the id or key is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::MissingField("id"));
        }
        if self.key.trim().is_empty() {
            return Err(ConfigError::MissingField("key"));
        }
        Ok(())
    }
}

/// The bridge's platform block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformConfig {
    /// Platform display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Configured fans.
    #[serde(default)]
    pub devices: Vec<AccessoryConfig>,
}

impl PlatformConfig {
    /// Parses and validates a platform block.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the JSON is malformed or a device fails
    /// validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use fanlink::accessory::PlatformConfig;
    ///
    /// let config = PlatformConfig::from_json(
    ///     r#"{"platform": "CreateCeilingFan", "devices": [{"id": "bf01", "key": "k"}]}"#,
    /// ).unwrap();
    /// assert_eq!(config.devices.len(), 1);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every device and rejects duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for device in &self.devices {
            device.validate()?;
            if !seen.insert(device.id.as_str()) {
                return Err(ConfigError::DuplicateDevice(device.id.clone()));
            }
        }
        Ok(())
    }
}
