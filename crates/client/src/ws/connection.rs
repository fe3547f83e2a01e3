//! One live connection: a background task pumping frames between the
//! transport and the client.

use std::sync::Arc;

use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::oneshot;
use url::Url;

use super::transport::{Connector, FramePair, TransportError};

/// Connection state as exposed to consumers.
///
/// Errors never get a status of their own; they collapse to `Disconnected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }
}

/// What a connection task reports back. Every event carries the generation of
/// the connection that produced it, so late events from a superseded
/// connection can be told apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Opened { generation: u64 },
    Frame { generation: u64, text: String },
    Closed { generation: u64, reason: String },
}

impl ConnectionEvent {
    pub fn generation(&self) -> u64 {
        match self {
            ConnectionEvent::Opened { generation }
            | ConnectionEvent::Frame { generation, .. }
            | ConnectionEvent::Closed { generation, .. } => *generation,
        }
    }
}

/// Callback receiving connection events, in order.
pub type EventSink = Arc<dyn Fn(ConnectionEvent) + Send + Sync>;

/// Handle for writing text frames to a connection.
#[derive(Clone)]
pub struct WsHandle {
    sender: UnboundedSender<String>,
}

impl WsHandle {
    pub fn send_text(&self, text: String) -> Result<(), TransportError> {
        self.sender
            .unbounded_send(text)
            .map_err(|_| TransportError::Closed)
    }
}

/// A connection owned by the transport manager.
pub struct WsConnection {
    pub generation: u64,
    pub identity: String,
    sender: UnboundedSender<String>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl WsConnection {
    /// Spawn the connection task. Must be called inside a tokio runtime.
    pub fn open(
        connector: Arc<dyn Connector>,
        url: Url,
        generation: u64,
        identity: String,
        on_event: EventSink,
    ) -> Self {
        let (sender, receiver) = unbounded();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(run_connection(
            connector,
            url,
            generation,
            receiver,
            shutdown_rx,
            on_event,
        ));

        Self {
            generation,
            identity,
            sender,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn handle(&self) -> WsHandle {
        WsHandle {
            sender: self.sender.clone(),
        }
    }

    /// Ask the task to close the transport. Does not wait for it.
    pub fn close(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

async fn run_connection(
    connector: Arc<dyn Connector>,
    url: Url,
    generation: u64,
    mut outbound: UnboundedReceiver<String>,
    mut shutdown: oneshot::Receiver<()>,
    on_event: EventSink,
) {
    let pair = tokio::select! {
        result = connector.connect(&url) => match result {
            Ok(pair) => pair,
            Err(e) => {
                crate::log_error!("WebSocket error for {}: {}", url, e);
                on_event(ConnectionEvent::Closed { generation, reason: e.to_string() });
                return;
            }
        },
        _ = &mut shutdown => {
            on_event(ConnectionEvent::Closed {
                generation,
                reason: "closed before open".to_string(),
            });
            return;
        }
    };

    crate::log_info!("WebSocket connected to {} (generation {})", url, generation);
    on_event(ConnectionEvent::Opened { generation });

    let FramePair {
        mut sink,
        mut stream,
    } = pair;

    let reason = loop {
        tokio::select! {
            _ = &mut shutdown => {
                if let Err(e) = sink.close().await {
                    crate::log_debug!("close handshake failed: {}", e);
                }
                break "closed by client".to_string();
            }
            frame = stream.next() => match frame {
                Some(Ok(text)) => on_event(ConnectionEvent::Frame { generation, text }),
                Some(Err(e)) => {
                    crate::log_error!("WebSocket read error: {}", e);
                    break e.to_string();
                }
                None => break "closed by server".to_string(),
            },
            out = outbound.next() => match out {
                Some(text) => {
                    if let Err(e) = sink.send(text).await {
                        crate::log_error!("Send failed: {}", e);
                        break e.to_string();
                    }
                }
                None => {
                    let _ = sink.close().await;
                    break "sender dropped".to_string();
                }
            },
        }
    };

    crate::log_info!("WebSocket to {} closed: {}", url, reason);
    on_event(ConnectionEvent::Closed { generation, reason });
}
