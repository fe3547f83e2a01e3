//! Owner of the single live connection.
//!
//! At most one connection exists at a time. Every connection gets a fresh
//! generation number; events from any generation other than the live one are
//! dropped, which is what keeps a torn-down connection from touching state.

use std::sync::Arc;

use tokio::sync::watch;
use url::Url;

use super::connection::{ConnectionEvent, ConnectionStatus, EventSink, WsConnection};
use super::transport::Connector;
use crate::session::Identity;

pub struct TransportManager {
    connector: Arc<dyn Connector>,
    on_event: EventSink,
    active: Option<WsConnection>,
    next_generation: u64,
    status: watch::Sender<ConnectionStatus>,
}

impl TransportManager {
    pub fn new(connector: Arc<dyn Connector>, on_event: EventSink) -> Self {
        let (status, _) = watch::channel(ConnectionStatus::Disconnected);
        Self {
            connector,
            on_event,
            active: None,
            next_generation: 0,
            status,
        }
    }

    /// Start a connection for `identity` unless one is already open or opening.
    ///
    /// Returns whether a new connection was started.
    pub fn open(&mut self, identity: &Identity, url: Url) -> bool {
        if let Some(active) = &self.active {
            crate::log_debug!(
                "open ignored: generation {} for '{}' is still live",
                active.generation,
                active.identity
            );
            return false;
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        crate::log_info!("Opening connection {} for '{}'", generation, identity);

        self.status.send_replace(ConnectionStatus::Connecting);
        self.active = Some(WsConnection::open(
            self.connector.clone(),
            url,
            generation,
            identity.as_str().to_string(),
            self.on_event.clone(),
        ));
        true
    }

    /// Tear down the live connection, if any. Safe to call repeatedly.
    pub fn close(&mut self) {
        if let Some(active) = self.active.take() {
            crate::log_info!("Closing connection {}", active.generation);
            active.close();
        }
        self.status.send_replace(ConnectionStatus::Disconnected);
    }

    /// Feed an event from a connection task through the generation filter.
    ///
    /// Returns the frame text when a live frame should be dispatched.
    pub fn accept(&mut self, event: ConnectionEvent) -> Option<String> {
        let live = self.active.as_ref().map(|a| a.generation);
        if live != Some(event.generation()) {
            crate::log_debug!(
                "dropping event from stale connection {} (live: {:?})",
                event.generation(),
                live
            );
            return None;
        }

        match event {
            ConnectionEvent::Opened { .. } => {
                self.status.send_replace(ConnectionStatus::Connected);
                None
            }
            ConnectionEvent::Frame { text, .. } => Some(text),
            ConnectionEvent::Closed { generation, reason } => {
                crate::log_warn!("Connection {} closed: {}", generation, reason);
                self.active = None;
                self.status.send_replace(ConnectionStatus::Disconnected);
                None
            }
        }
    }

    /// Write one encoded frame. Only a `Connected` transport accepts writes.
    pub fn send_text(&self, text: String) -> bool {
        if !self.is_connected() {
            return false;
        }
        let Some(active) = &self.active else {
            return false;
        };
        match active.handle().send_text(text) {
            Ok(()) => true,
            Err(e) => {
                crate::log_warn!("send on connection {} failed: {}", active.generation, e);
                false
            }
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.status().is_connected()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }
}

impl Drop for TransportManager {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.close();
        }
    }
}
