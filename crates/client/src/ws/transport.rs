//! Transport abstraction: something that yields a text sink and a text stream.
//!
//! [`WebSocketConnector`] is the real implementation on top of
//! tokio-tungstenite. Tests plug in an in-memory [`Connector`] instead.

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::{future, Sink, SinkExt, Stream, StreamExt};
use thiserror::Error;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, Message},
};
use url::Url;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("websocket: {0}")]
    WebSocket(#[from] WsError),
    #[error("transport closed")]
    Closed,
}

pub type FrameSink = Pin<Box<dyn Sink<String, Error = TransportError> + Send>>;
pub type FrameStream = Pin<Box<dyn Stream<Item = Result<String, TransportError>> + Send>>;

/// The two halves of one open connection.
pub struct FramePair {
    pub sink: FrameSink,
    pub stream: FrameStream,
}

#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Open a connection. Resolving `Ok` is the transport's open acknowledgement.
    async fn connect(&self, url: &Url) -> Result<FramePair, TransportError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

#[async_trait]
impl Connector for WebSocketConnector {
    async fn connect(&self, url: &Url) -> Result<FramePair, TransportError> {
        let (ws_stream, _response) = connect_async(url.as_str()).await?;
        let (write, read) = ws_stream.split();

        let sink = write
            .with(|text: String| future::ready(Ok::<_, WsError>(Message::text(text))))
            .sink_map_err(TransportError::from);

        // Only text frames carry protocol data. Pings are answered by
        // tungstenite itself; a close frame ends the stream.
        let stream = read
            .take_while(|msg| future::ready(!matches!(msg, Ok(Message::Close(_)))))
            .filter_map(|msg| {
                future::ready(match msg {
                    Ok(Message::Text(text)) => Some(Ok(text.as_str().to_owned())),
                    Ok(_) => None,
                    Err(e) => Some(Err(TransportError::from(e))),
                })
            });

        Ok(FramePair {
            sink: Box::pin(sink),
            stream: Box::pin(stream),
        })
    }
}
