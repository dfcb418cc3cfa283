// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Retry and error-handling policies for the connection lifecycle.

use std::time::Duration;

use crate::error::TransportError;

/// Default delay before retrying a failed connect.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Configuration for reconnect backoff.
///
/// The delay is fixed: every failed attempt waits the same amount of time
/// before the next one. Devices that cannot be located at all may use a
/// separate, usually longer, delay.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use fanlink::connection::RetryPolicy;
///
/// // Default policy: retry every minute
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.delay(), Duration::from_secs(60));
///
/// // Back off for ten minutes when discovery finds nothing
/// let policy = RetryPolicy::new()
///     .with_not_found_delay(Duration::from_secs(600));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    delay: Duration,
    not_found_delay: Option<Duration>,
}

impl RetryPolicy {
    /// Creates a retry policy with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the delay between attempts.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets a separate delay used after discovery found no device.
    #[must_use]
    pub fn with_not_found_delay(mut self, delay: Duration) -> Self {
        self.not_found_delay = Some(delay);
        self
    }

    /// Returns the delay between attempts.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns the delay used after discovery found no device, if set.
    #[must_use]
    pub fn not_found_delay(&self) -> Option<Duration> {
        self.not_found_delay
    }

    /// Returns how long to wait after an attempt failed with `error`.
    #[must_use]
    pub fn delay_after(&self, error: &TransportError) -> Duration {
        match self.not_found_delay {
            Some(delay) if error.is_not_found() => delay,
            _ => self.delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: DEFAULT_RETRY_DELAY,
            not_found_delay: None,
        }
    }
}

/// What a session error report does to the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorAction {
    /// Drop the session and reconnect immediately.
    #[default]
    Reconnect,
    /// Log the error and keep the session.
    LogOnly,
}

impl ErrorAction {
    /// Maps the `reconnectOnError` configuration flag.
    #[must_use]
    pub const fn from_reconnect_flag(reconnect: bool) -> Self {
        if reconnect { Self::Reconnect } else { Self::LogOnly }
    }
}
