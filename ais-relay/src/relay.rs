use std::{collections::VecDeque, net::SocketAddr};

use futures::{Sink, SinkExt, Stream, StreamExt};
use snafu::{IntoError, ResultExt};
use tokio::{
    net::{TcpListener, TcpStream},
    task::JoinSet,
};
use tokio_tungstenite::{
    accept_async, connect_async,
    tungstenite::{
        self, Message,
        protocol::{CloseFrame, frame::coding::CloseCode},
    },
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::{
        Result,
        error::{
            BindSnafu, ConnectSnafu, HandshakeSnafu, ListenerSnafu, PendingOverflowSnafu,
            TransportSnafu,
        },
    },
    settings::Settings,
};

/// Messages a client may send before its upstream connection is open.
pub const MAX_PENDING_MESSAGES: usize = 256;

/// Forwards every accepted WebSocket connection to its own upstream connection.
pub struct Relay {
    listener: TcpListener,
    upstream_url: String,
}

enum Shutdown {
    Cancelled,
    Downstream(Option<CloseFrame<'static>>),
    Upstream(Option<CloseFrame<'static>>),
}

impl Relay {
    pub async fn bind(settings: &Settings) -> Result<Relay> {
        let listener = TcpListener::bind(settings.listen_address)
            .await
            .context(BindSnafu {
                address: settings.listen_address,
            })?;

        Ok(Relay {
            listener,
            upstream_url: settings.upstream_url.clone(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().context(ListenerSnafu)
    }

    /// Accepts connections until cancelled, then waits for open connections to close.
    #[instrument(skip_all)]
    pub async fn run(self, cancel: CancellationToken) {
        let mut connections = JoinSet::new();

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
                accepted = self.listener.accept() => match accepted.context(ListenerSnafu) {
                    Ok((stream, peer)) => {
                        info!(%peer, "accepted downstream connection");
                        connections.spawn(serve(
                            stream,
                            peer,
                            self.upstream_url.clone(),
                            cancel.child_token(),
                        ));
                    }
                    Err(e) => warn!("{e:?}"),
                },
            }
        }

        info!(open = connections.len(), "relay shutting down");
        while connections.join_next().await.is_some() {}
    }
}

async fn serve(stream: TcpStream, peer: SocketAddr, upstream_url: String, cancel: CancellationToken) {
    match relay_connection(stream, &upstream_url, cancel).await {
        Ok(()) => info!(%peer, "relay connection closed"),
        Err(e) => warn!(%peer, "relay connection failed: {e:?}"),
    }
}

fn is_data(message: &Message) -> bool {
    matches!(message, Message::Text(_) | Message::Binary(_))
}

async fn next_frame<S>(stream: &mut S) -> Option<std::result::Result<Message, tungstenite::Error>>
where
    S: Stream<Item = std::result::Result<Message, tungstenite::Error>> + Unpin,
{
    loop {
        match stream.next().await {
            Some(Ok(m)) if !is_data(&m) && !matches!(m, Message::Close(_)) => continue,
            other => return other,
        }
    }
}

async fn close_sink<S>(sink: &mut S, side: &'static str)
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    if let Err(e) = sink.close().await {
        debug!(side, "failed to close websocket cleanly: {e:?}");
    }
}

async fn send_close<S>(sink: &mut S, frame: Option<CloseFrame<'static>>, side: &'static str)
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    if let Err(e) = sink.send(Message::Close(frame)).await {
        debug!(side, "failed to forward close frame: {e:?}");
    }
}

async fn relay_connection(
    stream: TcpStream,
    upstream_url: &str,
    cancel: CancellationToken,
) -> Result<()> {
    let downstream = accept_async(stream).await.context(HandshakeSnafu)?;
    let (mut down_tx, mut down_rx) = downstream.split();

    let mut pending = VecDeque::new();
    let connect = connect_async(upstream_url);
    tokio::pin!(connect);

    let upstream = loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                close_sink(&mut down_tx, "downstream").await;
                return Ok(());
            }
            connected = &mut connect => match connected {
                Ok((upstream, _)) => break upstream,
                Err(e) => {
                    close_sink(&mut down_tx, "downstream").await;
                    return Err(ConnectSnafu { url: upstream_url }.into_error(e));
                }
            },
            message = next_frame(&mut down_rx) => match message {
                Some(Ok(Message::Close(_))) | None => {
                    debug!("downstream closed before upstream was open");
                    return Ok(());
                }
                Some(Ok(_)) if pending.len() >= MAX_PENDING_MESSAGES => {
                    let frame = CloseFrame {
                        code: CloseCode::Policy,
                        reason: "too many messages before upstream was ready".into(),
                    };
                    send_close(&mut down_tx, Some(frame), "downstream").await;
                    close_sink(&mut down_tx, "downstream").await;
                    return PendingOverflowSnafu {
                        limit: MAX_PENDING_MESSAGES,
                    }
                    .fail();
                }
                Some(Ok(m)) => pending.push_back(m),
                Some(Err(e)) => return Err(TransportSnafu.into_error(e)),
            },
        }
    };

    let (mut up_tx, mut up_rx) = upstream.split();

    debug!(buffered = pending.len(), "upstream open, flushing buffered messages");
    for message in pending.drain(..) {
        up_tx.feed(message).await.context(TransportSnafu)?;
    }
    up_tx.flush().await.context(TransportSnafu)?;

    let shutdown = loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break Ok(Shutdown::Cancelled),
            message = next_frame(&mut down_rx) => match message {
                Some(Ok(Message::Close(frame))) => break Ok(Shutdown::Downstream(frame)),
                None => break Ok(Shutdown::Downstream(None)),
                Some(Ok(m)) => {
                    if let Err(e) = up_tx.send(m).await {
                        break Err(TransportSnafu.into_error(e));
                    }
                }
                Some(Err(e)) => break Err(TransportSnafu.into_error(e)),
            },
            message = next_frame(&mut up_rx) => match message {
                Some(Ok(Message::Close(frame))) => break Ok(Shutdown::Upstream(frame)),
                None => break Ok(Shutdown::Upstream(None)),
                Some(Ok(m)) => {
                    if let Err(e) = down_tx.send(m).await {
                        break Err(TransportSnafu.into_error(e));
                    }
                }
                Some(Err(e)) => break Err(TransportSnafu.into_error(e)),
            },
        }
    };

    // The close frame of one side is passed on to the other so close codes survive the relay.
    let result = match shutdown {
        Ok(Shutdown::Downstream(frame)) => {
            debug!(?frame, "downstream closed");
            send_close(&mut up_tx, frame, "upstream").await;
            Ok(())
        }
        Ok(Shutdown::Upstream(frame)) => {
            debug!(?frame, "upstream closed");
            send_close(&mut down_tx, frame, "downstream").await;
            Ok(())
        }
        Ok(Shutdown::Cancelled) => Ok(()),
        Err(e) => Err(e),
    };

    close_sink(&mut up_tx, "upstream").await;
    close_sink(&mut down_tx, "downstream").await;

    result
}
