use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use snafu::{IntoError, ResultExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Message, protocol::frame::coding::CloseCode},
};
use tracing::{debug, instrument};

use crate::error::{
    Error, Result,
    ais_message_error::InvalidUtf8Snafu,
    error::{ConnectSnafu, TransportSnafu},
};

/// Opens connections to the message stream.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    type Connection: Connection;

    async fn connect(&self) -> Result<Self::Connection>;
}

/// A single open connection. Every method must be cancel safe as the client races them
/// against its timers.
#[async_trait]
pub trait Connection: Send + 'static {
    async fn send_text(&mut self, text: String) -> Result<()>;
    async fn recv(&mut self) -> TransportEvent;
    async fn close(&mut self);
}

#[derive(Debug)]
pub enum TransportEvent {
    Message(String),
    /// `normal` is only set for a close with the normal closure code.
    Closed { normal: bool },
    Failed(Error),
}

/// Connects to the stream over a WebSocket, either directly or through the relay.
#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    url: String,
}

pub struct WebSocketConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WebSocketTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    type Connection = WebSocketConnection;

    #[instrument(skip_all, fields(url = %self.url))]
    async fn connect(&self) -> Result<WebSocketConnection> {
        let (stream, response) = connect_async(self.url.as_str())
            .await
            .context(ConnectSnafu {
                url: self.url.clone(),
            })?;
        debug!(status = %response.status(), "websocket handshake completed");
        Ok(WebSocketConnection { stream })
    }
}

#[async_trait]
impl Connection for WebSocketConnection {
    async fn send_text(&mut self, text: String) -> Result<()> {
        self.stream
            .send(Message::Text(text))
            .await
            .context(TransportSnafu)
    }

    async fn recv(&mut self) -> TransportEvent {
        loop {
            match self.stream.next().await {
                None => return TransportEvent::Closed { normal: false },
                Some(Err(e)) => return TransportEvent::Failed(TransportSnafu.into_error(e)),
                Some(Ok(message)) => match message {
                    Message::Text(text) => return TransportEvent::Message(text),
                    Message::Binary(bytes) => {
                        match String::from_utf8(bytes).context(InvalidUtf8Snafu) {
                            Ok(text) => return TransportEvent::Message(text),
                            Err(e) => debug!("dropped binary frame: {e:?}"),
                        }
                    }
                    Message::Close(frame) => {
                        let normal = frame.as_ref().is_some_and(|f| f.code == CloseCode::Normal);
                        debug!(?frame, "received close frame");
                        return TransportEvent::Closed { normal };
                    }
                    Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
                },
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            debug!("failed to close websocket cleanly: {e:?}");
        }
    }
}
