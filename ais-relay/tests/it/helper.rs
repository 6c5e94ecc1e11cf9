use std::{
    net::SocketAddr,
    sync::LazyLock,
    time::Duration,
};

use ais_relay::{Relay, Settings};
use futures::{Future, StreamExt};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, accept_async, connect_async,
    tungstenite::{self, Message},
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use vessel_core::{Environment, LogLevel};

pub const TIMEOUT: Duration = Duration::from_secs(5);

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;
pub type UpstreamConnection = WebSocketStream<TcpStream>;

static TRACING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .init();
});

pub struct TestHelper {
    pub relay_addr: SocketAddr,
    pub cancel: CancellationToken,
    upstream: mpsc::UnboundedReceiver<UpstreamConnection>,
    handshake_gate: watch::Sender<bool>,
    relay: Option<JoinHandle<()>>,
    server: JoinHandle<()>,
}

pub async fn test<T, Fut>(test_closure: T)
where
    T: FnOnce(TestHelper) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    run_test(true, test_closure).await
}

/// Points the relay at a port nobody listens on.
pub async fn test_unreachable_upstream<T, Fut>(test_closure: T)
where
    T: FnOnce(TestHelper) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    run_test(false, test_closure).await
}

async fn run_test<T, Fut>(reachable: bool, test_closure: T)
where
    T: FnOnce(TestHelper) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    LazyLock::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let upstream_addr = listener.local_addr().unwrap();

    let (handshake_gate, gate) = watch::channel(true);
    let (connections_tx, upstream) = mpsc::unbounded_channel();

    let server = if reachable {
        tokio::spawn(serve_upstream(listener, gate, connections_tx))
    } else {
        drop(listener);
        tokio::spawn(async {})
    };

    let settings = Settings {
        environment: Environment::Test,
        log_level: LogLevel::Debug,
        listen_address: "127.0.0.1:0".parse().unwrap(),
        upstream_url: format!("ws://{upstream_addr}"),
    };
    let relay = Relay::bind(&settings).await.unwrap();
    let relay_addr = relay.local_addr().unwrap();

    let cancel = CancellationToken::new();
    let relay = tokio::spawn(relay.run(cancel.clone()));

    test_closure(TestHelper {
        relay_addr,
        cancel,
        upstream,
        handshake_gate,
        relay: Some(relay),
        server,
    })
    .await;
}

/// Completes the upstream handshake of every accepted socket once the gate is open.
async fn serve_upstream(
    listener: TcpListener,
    gate: watch::Receiver<bool>,
    connections: mpsc::UnboundedSender<UpstreamConnection>,
) {
    while let Ok((stream, _)) = listener.accept().await {
        let mut gate = gate.clone();
        let connections = connections.clone();
        tokio::spawn(async move {
            if gate.wait_for(|open| *open).await.is_err() {
                return;
            }
            if let Ok(ws) = accept_async(stream).await {
                let _ = connections.send(ws);
            }
        });
    }
}

impl TestHelper {
    pub async fn connect(&self) -> Client {
        let (client, _) = connect_async(format!("ws://{}", self.relay_addr))
            .await
            .unwrap();
        client
    }

    /// Stalls upstream handshakes until [TestHelper::open_upstream] is called.
    pub fn hold_upstream(&self) {
        self.handshake_gate.send_replace(false);
    }

    pub fn open_upstream(&self) {
        self.handshake_gate.send_replace(true);
    }

    pub async fn next_upstream(&mut self) -> UpstreamConnection {
        tokio::time::timeout(TIMEOUT, self.upstream.recv())
            .await
            .unwrap()
            .unwrap()
    }

    /// Waits for the relay to return after cancellation.
    pub async fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(relay) = self.relay.take() {
            tokio::time::timeout(TIMEOUT, relay).await.unwrap().unwrap();
        }
    }
}

impl Drop for TestHelper {
    fn drop(&mut self) {
        self.server.abort();
        if let Some(relay) = &self.relay {
            relay.abort();
        }
    }
}

/// Next frame other than ping and pong, `None` once the stream has ended.
pub async fn next_message<S>(stream: &mut S) -> Option<Result<Message, tungstenite::Error>>
where
    S: futures::Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    tokio::time::timeout(TIMEOUT, async {
        loop {
            match stream.next().await {
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                other => return other,
            }
        }
    })
    .await
    .unwrap()
}

pub async fn next_text<S>(stream: &mut S) -> String
where
    S: futures::Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    match next_message(stream).await {
        Some(Ok(Message::Text(text))) => text,
        other => panic!("expected a text message, got {other:?}"),
    }
}
