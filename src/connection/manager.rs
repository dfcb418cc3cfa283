// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection lifecycle manager.
//!
//! Owns at most one transport session per device. Discovery, session
//! establishment, the backoff timer, the session's event stream and its
//! writes all run in spawned tasks that report back through a single
//! internal channel; the manager itself is only mutated by its owner, so the
//! state machine needs no locking.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use crate::error::TransportError;
use crate::protocol::{
    DeviceIdentity, DpMap, DpWrite, EstablishedSession, Session, SessionEvent, Transport,
};

use super::{ConnectionState, ConnectionStatus, ErrorAction, RetryPolicy};

/// Something a spawned lifecycle task reports back to the manager.
enum LifecycleEvent<S> {
    /// Discovery plus session establishment completed.
    AttemptFinished(Result<EstablishedSession<S>, TransportError>),
    /// The backoff timer fired.
    RetryDue,
    /// The session with the given generation produced an event.
    Session { generation: u64, event: SessionEvent },
}

/// The currently open session.
struct ActiveSession {
    generation: u64,
    writes: mpsc::UnboundedSender<DpWrite>,
}

/// Keeps one device session alive.
///
/// The manager runs the `Disconnected → Connecting → Connected` state
/// machine with a fixed-delay retry after failed attempts. At most one
/// attempt is in flight at any time: [`connect`](Self::connect) is ignored
/// while connecting, while connected and while a retry is pending.
///
/// The owner drives the manager by awaiting [`recv`](Self::recv), which
/// processes lifecycle events internally and yields only device data.
/// `recv` is cancel safe and can be used as a `tokio::select!` branch.
///
/// All methods that start background work must be called from within a
/// Tokio runtime.
pub struct ConnectionManager<T: Transport> {
    transport: Arc<T>,
    identity: Arc<DeviceIdentity>,
    retry: RetryPolicy,
    error_action: ErrorAction,
    status: ConnectionStatus,
    active: Option<ActiveSession>,
    next_generation: u64,
    closed: bool,
    events_tx: mpsc::UnboundedSender<LifecycleEvent<T::Session>>,
    events_rx: mpsc::UnboundedReceiver<LifecycleEvent<T::Session>>,
    status_tx: watch::Sender<ConnectionStatus>,
}

impl<T: Transport> ConnectionManager<T> {
    /// Creates a disconnected manager. No work starts until
    /// [`connect`](Self::connect).
    #[must_use]
    pub fn new(
        transport: Arc<T>,
        identity: DeviceIdentity,
        retry: RetryPolicy,
        error_action: ErrorAction,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (status_tx, _) = watch::channel(ConnectionStatus::default());

        Self {
            transport,
            identity: Arc::new(identity),
            retry,
            error_action,
            status: ConnectionStatus::default(),
            active: None,
            next_generation: 0,
            closed: false,
            events_tx,
            events_rx,
            status_tx,
        }
    }

    /// Returns the device identity.
    #[must_use]
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Returns the current lifecycle snapshot.
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Returns the current session state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.status.state
    }

    /// Creates a watch receiver for lifecycle transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_tx.subscribe()
    }

    /// Starts a connect attempt unless one is already in flight, a session
    /// is open, or a retry is pending.
    pub fn connect(&mut self) {
        let device_id = self.identity.id();

        if self.closed || !self.status.accepts_connect() {
            tracing::debug!(
                %device_id,
                state = %self.status.state,
                retry_scheduled = self.status.retry_scheduled,
                "Connect ignored"
            );
            return;
        }

        tracing::info!(
            %device_id,
            attempt = self.status.failed_attempts + 1,
            "Connecting to device"
        );
        self.status.state = ConnectionState::Connecting;
        self.publish();

        let transport = Arc::clone(&self.transport);
        let identity = Arc::clone(&self.identity);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = async {
                let address = transport.discover(&identity).await?;
                tracing::debug!(device_id = %identity.id(), %address, "Device discovered");
                transport.open_session(&address, &identity).await
            }
            .await;
            // The manager is gone after shutdown; nobody else will close this session
            if let Err(mpsc::error::SendError(LifecycleEvent::AttemptFinished(Ok(established)))) =
                events.send(LifecycleEvent::AttemptFinished(result))
            {
                tracing::debug!(device_id = %identity.id(), "Closing session opened after shutdown");
                established.session.close().await;
            }
        });
    }

    /// Waits for the next data report from the device.
    ///
    /// Connection events (attempt results, retry timers, disconnects and
    /// session errors) are handled internally while waiting.
    pub async fn recv(&mut self) -> Option<DpMap> {
        loop {
            let event = self.events_rx.recv().await?;
            if let Some(dps) = self.handle(event) {
                return Some(dps);
            }
        }
    }

    /// Hands a write to the open session.
    ///
    /// Writes are sent in call order by a per-session writer task; send
    /// failures are logged there. Nothing is queued while disconnected.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Disconnected` if no session is open.
    pub fn write(&self, write: DpWrite) -> Result<(), TransportError> {
        match &self.active {
            Some(active) if self.status.is_connected() => active
                .writes
                .send(write)
                .map_err(|_| TransportError::Disconnected),
            _ => Err(TransportError::Disconnected),
        }
    }

    /// Closes the session and stops reconnecting.
    pub fn shutdown(&mut self) {
        tracing::debug!(device_id = %self.identity.id(), "Shutting down connection");
        self.closed = true;
        self.active = None;
        self.status = ConnectionStatus {
            failed_attempts: self.status.failed_attempts,
            ..ConnectionStatus::default()
        };
        self.publish();
    }

    fn handle(&mut self, event: LifecycleEvent<T::Session>) -> Option<DpMap> {
        match event {
            LifecycleEvent::AttemptFinished(Ok(established)) => {
                self.on_established(established);
                None
            }
            LifecycleEvent::AttemptFinished(Err(e)) => {
                self.on_attempt_failed(&e);
                None
            }
            LifecycleEvent::RetryDue => {
                self.status.retry_scheduled = false;
                self.publish();
                self.connect();
                None
            }
            LifecycleEvent::Session { generation, event } => {
                if self
                    .active
                    .as_ref()
                    .is_none_or(|active| active.generation != generation)
                {
                    tracing::debug!(device_id = %self.identity.id(), generation, "Ignoring stale session event");
                    return None;
                }
                self.on_session_event(event)
            }
        }
    }

    fn on_established(&mut self, established: EstablishedSession<T::Session>) {
        let device_id = self.identity.id().to_string();
        let EstablishedSession { session, events } = established;

        if self.closed {
            tokio::spawn(async move { session.close().await });
            return;
        }

        let generation = self.next_generation;
        self.next_generation += 1;

        let (writes_tx, writes_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(device_id.clone(), session, writes_rx));
        tokio::spawn(forward_events(generation, events, self.events_tx.clone()));

        self.active = Some(ActiveSession {
            generation,
            writes: writes_tx,
        });
        self.status = ConnectionStatus {
            state: ConnectionState::Connected,
            retry_scheduled: false,
            failed_attempts: 0,
        };
        self.publish();

        tracing::info!(%device_id, "Connected to device");
    }

    fn on_attempt_failed(&mut self, error: &TransportError) {
        self.status.state = ConnectionState::Disconnected;
        self.status.failed_attempts = self.status.failed_attempts.saturating_add(1);

        if self.closed {
            self.publish();
            return;
        }

        let delay = self.retry.delay_after(error);
        tracing::warn!(
            device_id = %self.identity.id(),
            error = %error,
            failed_attempts = self.status.failed_attempts,
            retry_in_secs = delay.as_secs(),
            "Connection attempt failed"
        );
        self.schedule_retry(delay);
    }

    fn on_session_event(&mut self, event: SessionEvent) -> Option<DpMap> {
        let device_id = self.identity.id();

        match event {
            SessionEvent::Data(dps) => {
                tracing::debug!(%device_id, count = dps.len(), "Received data points");
                return Some(dps);
            }
            SessionEvent::Disconnected => {
                tracing::info!(%device_id, "Device disconnected");
                self.drop_session();
                self.connect();
            }
            SessionEvent::Error(details) => {
                tracing::warn!(%device_id, error = %details, action = ?self.error_action, "Session error");
                if self.error_action == ErrorAction::Reconnect {
                    self.drop_session();
                    self.connect();
                }
            }
        }
        None
    }

    fn drop_session(&mut self) {
        // Dropping the writer sender lets the writer drain and close the session
        self.active = None;
        self.status.state = ConnectionState::Disconnected;
        self.publish();
    }

    fn schedule_retry(&mut self, delay: Duration) {
        self.status.retry_scheduled = true;
        self.publish();

        let events = self.events_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(LifecycleEvent::RetryDue);
        });
    }

    fn publish(&self) {
        let status = self.status;
        self.status_tx.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
    }
}

impl<T: Transport> fmt::Debug for ConnectionManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("device_id", &self.identity.id())
            .field("status", &self.status)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

/// Sends writes in order until the manager drops the sender, then closes
/// the session.
async fn run_writer<S: Session>(
    device_id: String,
    session: S,
    mut writes: mpsc::UnboundedReceiver<DpWrite>,
) {
    while let Some(write) = writes.recv().await {
        tracing::debug!(%device_id, %write, "Writing data point");
        if let Err(e) = session.send(&write).await {
            tracing::warn!(%device_id, error = %e, "Data point write failed");
        }
    }
    session.close().await;
    tracing::debug!(%device_id, "Session writer stopped");
}

/// Tags session events with their generation. A closed event stream is
/// reported as a disconnect.
async fn forward_events<S: Send + 'static>(
    generation: u64,
    mut events: mpsc::Receiver<SessionEvent>,
    tx: mpsc::UnboundedSender<LifecycleEvent<S>>,
) {
    while let Some(event) = events.recv().await {
        if tx
            .send(LifecycleEvent::Session { generation, event })
            .is_err()
        {
            return;
        }
    }
    let _ = tx.send(LifecycleEvent::Session {
        generation,
        event: SessionEvent::Disconnected,
    });
}
