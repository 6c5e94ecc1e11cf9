#![deny(rust_2018_idioms)]

//! Synthetic vessel traffic along the major shipping lanes, published through the same
//! snapshot channel as the live feed.

pub mod generate;
pub mod kinematics;
pub mod lanes;
pub mod simulator;

pub use simulator::{SimulationSettings, Simulator};
