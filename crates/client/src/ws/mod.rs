//! WebSocket layer: the transport seam, the per-connection task and the
//! manager that keeps at most one of them alive.
//!
//! ```text
//!   TransportManager ── open/close ──▶ WsConnection (task)
//!          ▲                                 │
//!          └──── accept(ConnectionEvent) ◀───┘  via the client's event queue
//! ```

mod connection;
mod manager;
mod transport;

pub use connection::{ConnectionEvent, ConnectionStatus, EventSink, WsConnection, WsHandle};
pub use manager::TransportManager;
pub use transport::{
    Connector, FramePair, FrameSink, FrameStream, TransportError, WebSocketConnector,
};
