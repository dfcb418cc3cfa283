// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory transport and bridge used by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

use fanlink::platform::{AccessoryInfo, Bridge};
use fanlink::protocol::{
    DeviceIdentity, DpMap, DpWrite, EstablishedSession, Session, SessionEvent, Transport,
};
use fanlink::{Capability, CapabilityValue, TransportError};

/// Transport double that counts calls, fails on demand and records writes.
#[derive(Default)]
pub struct FakeTransport {
    discover_calls: AtomicUsize,
    open_calls: AtomicUsize,
    failures: AtomicUsize,
    not_found: AtomicBool,
    open_delay: Duration,
    closes: Arc<AtomicUsize>,
    writes: Arc<Mutex<Vec<DpWrite>>>,
    event_tx: Mutex<Option<mpsc::Sender<SessionEvent>>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fails the next `times` discoveries with `Unavailable`.
    pub fn failing(times: usize) -> Arc<Self> {
        let transport = Self::default();
        transport.failures.store(times, Ordering::SeqCst);
        Arc::new(transport)
    }

    /// Fails the next `times` discoveries with `NotFound`.
    pub fn not_found(times: usize) -> Arc<Self> {
        let transport = Self::default();
        transport.failures.store(times, Ordering::SeqCst);
        transport.not_found.store(true, Ordering::SeqCst);
        Arc::new(transport)
    }

    /// Takes `delay` to open every session.
    pub fn slow_open(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            open_delay: delay,
            ..Self::default()
        })
    }

    pub fn discover_calls(&self) -> usize {
        self.discover_calls.load(Ordering::SeqCst)
    }

    pub fn open_calls(&self) -> usize {
        self.open_calls.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> Vec<DpWrite> {
        self.writes.lock().clone()
    }

    /// Pushes an event into the most recent session.
    pub async fn emit(&self, event: SessionEvent) {
        let tx = self.event_tx.lock().clone().expect("no session opened");
        tx.send(event).await.expect("session event receiver dropped");
    }

    /// Pushes a data report into the most recent session.
    pub async fn report(&self, dps: DpMap) {
        self.emit(SessionEvent::Data(dps)).await;
    }

    /// Closes the event stream of the most recent session.
    pub fn close_stream(&self) {
        self.event_tx.lock().take();
    }
}

pub struct FakeSession {
    writes: Arc<Mutex<Vec<DpWrite>>>,
    closes: Arc<AtomicUsize>,
}

impl Session for FakeSession {
    async fn send(&self, write: &DpWrite) -> Result<(), TransportError> {
        self.writes.lock().push(write.clone());
        Ok(())
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

impl Transport for FakeTransport {
    type Session = FakeSession;

    async fn discover(&self, identity: &DeviceIdentity) -> Result<String, TransportError> {
        self.discover_calls.fetch_add(1, Ordering::SeqCst);

        let fail = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if !fail {
            return Ok(identity.address().unwrap_or("192.168.1.40").to_string());
        }

        if self.not_found.load(Ordering::SeqCst) {
            Err(TransportError::NotFound(identity.id().to_string()))
        } else {
            Err(TransportError::Unavailable("connection refused".to_string()))
        }
    }

    async fn open_session(
        &self,
        _address: &str,
        _identity: &DeviceIdentity,
    ) -> Result<EstablishedSession<FakeSession>, TransportError> {
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        if !self.open_delay.is_zero() {
            tokio::time::sleep(self.open_delay).await;
        }

        let (tx, rx) = mpsc::channel(16);
        *self.event_tx.lock() = Some(tx);
        Ok(EstablishedSession::new(
            FakeSession {
                writes: Arc::clone(&self.writes),
                closes: Arc::clone(&self.closes),
            },
            rx,
        ))
    }
}

/// Bridge double that records every call.
#[derive(Default)]
pub struct RecordingBridge {
    pub registered: Mutex<Vec<(AccessoryInfo, Vec<Capability>)>>,
    pub restored: Mutex<Vec<(AccessoryInfo, Vec<Capability>)>>,
    pub unregistered: Mutex<Vec<Uuid>>,
    pub changes: Mutex<Vec<(String, Capability, CapabilityValue)>>,
}

impl Bridge for RecordingBridge {
    fn register(&self, info: &AccessoryInfo, capabilities: &[Capability]) {
        self.registered
            .lock()
            .push((info.clone(), capabilities.to_vec()));
    }

    fn restore(&self, info: &AccessoryInfo, capabilities: &[Capability]) {
        self.restored
            .lock()
            .push((info.clone(), capabilities.to_vec()));
    }

    fn unregister(&self, uuid: Uuid) {
        self.unregistered.lock().push(uuid);
    }

    fn capability_changed(&self, device_id: &str, capability: Capability, value: CapabilityValue) {
        self.changes
            .lock()
            .push((device_id.to_string(), capability, value));
    }
}

/// Lets spawned tasks run until they are idle.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}
