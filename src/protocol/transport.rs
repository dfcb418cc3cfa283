// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport seam: discovery, sessions and session events.
//!
//! The engine never touches sockets, encryption or framing. A transport
//! implementation (a local-key LAN client, a simulator, a test double)
//! provides discovery and session establishment; an established session
//! accepts data point writes and reports events through an `mpsc` channel.

use std::fmt;
use std::future::Future;

use tokio::sync::mpsc;

use crate::error::TransportError;

use super::{DpMap, DpWrite};

/// Immutable identity of a physical device.
///
/// # Examples
///
/// ```
/// use fanlink::protocol::DeviceIdentity;
///
/// let identity = DeviceIdentity::new("bf1234", "local-key")
///     .with_address("192.168.1.40")
///     .with_version("3.3");
/// assert_eq!(identity.address(), Some("192.168.1.40"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    id: String,
    key: String,
    address: Option<String>,
    version: Option<String>,
}

impl DeviceIdentity {
    /// Creates an identity from the device id and its local key.
    #[must_use]
    pub fn new(id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            address: None,
            version: None,
        }
    }

    /// Sets a known network address, letting transports skip broadcast discovery.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the protocol version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Returns the device id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the local key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the configured address, if any.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Returns the configured protocol version, if any.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl fmt::Debug for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceIdentity")
            .field("id", &self.id)
            .field("key", &"<redacted>")
            .field("address", &self.address)
            .field("version", &self.version)
            .finish()
    }
}

/// Asynchronous notification from an open session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session dropped.
    Disconnected,
    /// The transport reported an error; the session may or may not survive it.
    Error(String),
    /// The device reported data point changes.
    Data(DpMap),
}

/// A freshly opened session and the receiving end of its event stream.
///
/// Events are delivered in the order the transport observed them. Closing
/// the sender side is treated the same as [`SessionEvent::Disconnected`].
#[derive(Debug)]
pub struct EstablishedSession<S> {
    /// The session handle used for writes.
    pub session: S,
    /// Event stream for this session only.
    pub events: mpsc::Receiver<SessionEvent>,
}

impl<S> EstablishedSession<S> {
    /// Pairs a session with its event receiver.
    pub fn new(session: S, events: mpsc::Receiver<SessionEvent>) -> Self {
        Self { session, events }
    }
}

/// Discovery and session establishment for one family of devices.
///
/// Implementations must be cheap to share: one transport instance is used by
/// every accessory of a platform, each accessory holding an `Arc` to it.
pub trait Transport: Send + Sync + 'static {
    /// Session type produced by [`open_session`](Self::open_session).
    type Session: Session;

    /// Locates the device on the network and returns its address.
    ///
    /// When the identity already carries an address, implementations may
    /// return it without probing.
    fn discover(
        &self,
        identity: &DeviceIdentity,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;

    /// Performs the handshake and returns an open session.
    fn open_session(
        &self,
        address: &str,
        identity: &DeviceIdentity,
    ) -> impl Future<Output = Result<EstablishedSession<Self::Session>, TransportError>> + Send;
}

/// An open, authenticated session with one device.
pub trait Session: Send + Sync + 'static {
    /// Writes one data point. Resolves once the transport has sent it (or
    /// received an acknowledgement, if the transport waits for one).
    fn send(&self, write: &DpWrite) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Closes the session. Must be safe to call on an already dropped session.
    fn close(&self) -> impl Future<Output = ()> + Send;
}
