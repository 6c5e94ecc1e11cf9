use snafu::{Location, Snafu};
use tokio_tungstenite::tungstenite;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to connect to '{url}'"))]
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
    #[snafu(display("Failed to serialize subscription request"))]
    Json {
        #[snafu(implicit)]
        location: Location,
        source: serde_json::Error,
    },
}

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum AisMessageError {
    #[snafu(display("Failed to parse ais message"))]
    ParseMessage {
        #[snafu(implicit)]
        location: Location,
        source: serde_json::Error,
    },
    #[snafu(display("Ais message has no mmsi"))]
    MissingMmsi {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Ais message has an invalid mmsi"))]
    InvalidMmsi {
        #[snafu(implicit)]
        location: Location,
        source: vessel_core::Error,
    },
    #[snafu(display("Binary frame is not valid utf-8"))]
    InvalidUtf8 {
        #[snafu(implicit)]
        location: Location,
        source: std::string::FromUtf8Error,
    },
}
