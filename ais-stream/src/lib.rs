#![deny(rust_2018_idioms)]

//! Client for the aisstream.io WebSocket feed. Connects, subscribes to the global
//! bounding box, reconciles the incoming position and static reports into per-vessel
//! fragments and publishes them on a fixed cadence, reconnecting with exponential backoff.

pub mod backoff;
pub mod client;
pub mod error;
pub mod models;
pub mod reconciler;
pub mod transport;
