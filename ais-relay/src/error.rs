use std::net::SocketAddr;

use snafu::{Location, Snafu};
use tokio_tungstenite::tungstenite;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to load settings"))]
    Config {
        #[snafu(implicit)]
        location: Location,
        source: config::ConfigError,
    },
    #[snafu(display("Failed to bind to '{address}'"))]
    Bind {
        #[snafu(implicit)]
        location: Location,
        address: SocketAddr,
        source: std::io::Error,
    },
    #[snafu(display("TCP listener failed"))]
    Listener {
        #[snafu(implicit)]
        location: Location,
        source: std::io::Error,
    },
    #[snafu(display("WebSocket handshake with downstream client failed"))]
    Handshake {
        #[snafu(implicit)]
        location: Location,
        source: tungstenite::Error,
    },
    #[snafu(display("Client sent more than {limit} messages before the upstream was open"))]
    PendingOverflow {
        #[snafu(implicit)]
        location: Location,
        limit: usize,
    },
    #[snafu(display("Failed to connect to upstream '{url}'"))]
    Connect {
        #[snafu(implicit)]
        location: Location,
        url: String,
        source: tungstenite::Error,
    },
    #[snafu(display("WebSocket transport error"))]
    Transport {
        #[snafu(implicit)]
        location: Location,
        source: tungstenite::Error,
    },
}
