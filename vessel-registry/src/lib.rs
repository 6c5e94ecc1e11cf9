#![deny(rust_2018_idioms)]

//! Live registry of vessels seen on the AIS feed. Runs either the live stream client or
//! the fleet simulator and periodically reports what the published map contains.

pub mod controller;
pub mod error;
pub mod settings;
pub mod startup;
pub mod summary;
