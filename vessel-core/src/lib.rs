#![deny(rust_2018_idioms)]

//! Shared vessel model for the registry: identities, the published vessel record, the
//! sparse per-vessel fragment accumulated between publish ticks, and the snapshot
//! publisher every feed publishes through.

mod domain;
mod error;
mod feed;
mod settings;
mod snapshot;

pub use domain::*;
pub use error::*;
pub use feed::*;
pub use settings::*;
pub use snapshot::*;
