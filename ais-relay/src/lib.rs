#![deny(rust_2018_idioms)]

//! WebSocket relay that lets browser clients reach the AIS stream through a
//! same-origin endpoint. Every downstream connection gets its own upstream
//! connection, messages are forwarded verbatim in both directions.

pub mod error;
pub mod relay;
pub mod settings;

pub use relay::Relay;
pub use settings::Settings;
