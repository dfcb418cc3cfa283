// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection state reported by the lifecycle manager.

use std::fmt;

/// Session state of one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    /// No session. A retry may be scheduled.
    #[default]
    Disconnected,
    /// Discovery or session establishment is in flight.
    Connecting,
    /// A session is open and accepting writes.
    Connected,
}

impl ConnectionState {
    /// Returns true if a session is open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Returns the lowercase name used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the connection lifecycle, published on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectionStatus {
    /// Current session state.
    pub state: ConnectionState,
    /// A backoff timer is pending; `connect` calls are ignored until it fires.
    pub retry_scheduled: bool,
    /// Consecutive failed attempts since the last successful session.
    pub failed_attempts: u32,
}

impl ConnectionStatus {
    /// Returns true if a session is open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Returns true if `connect` would start a new attempt.
    #[must_use]
    pub fn accepts_connect(&self) -> bool {
        self.state == ConnectionState::Disconnected && !self.retry_scheduled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_disconnected() {
        let status = ConnectionStatus::default();
        assert_eq!(status.state, ConnectionState::Disconnected);
        assert!(!status.is_connected());
        assert!(status.accepts_connect());
    }

    #[test]
    fn connect_guard() {
        let connecting = ConnectionStatus {
            state: ConnectionState::Connecting,
            ..ConnectionStatus::default()
        };
        assert!(!connecting.accepts_connect());

        let waiting = ConnectionStatus {
            retry_scheduled: true,
            ..ConnectionStatus::default()
        };
        assert!(!waiting.accepts_connect());
    }

    #[test]
    fn display() {
        assert_eq!(ConnectionState::Connected.to_string(), "connected");
    }
}
