use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

pub const LEISURE_VESSEL_SHIP_TYPES: [i32; 2] = [36, 37];
pub const MILITARY_SHIP_TYPES: [i32; 2] = [35, 55];
pub const FISHING_SHIP_TYPE: i32 = 30;

/// Coarse classification of the AIS ship type code.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ShipCategory {
    Cargo,
    Tanker,
    Passenger,
    Fishing,
    Military,
    Tug,
    Sailing,
    #[strum(serialize = "highspeed")]
    HighSpeed,
    Other,
}

impl ShipCategory {
    pub fn from_ship_type(ship_type: i32) -> ShipCategory {
        match ship_type {
            70..=79 => ShipCategory::Cargo,
            80..=89 => ShipCategory::Tanker,
            60..=69 => ShipCategory::Passenger,
            FISHING_SHIP_TYPE => ShipCategory::Fishing,
            v if MILITARY_SHIP_TYPES.contains(&v) => ShipCategory::Military,
            50..=53 => ShipCategory::Tug,
            v if LEISURE_VESSEL_SHIP_TYPES.contains(&v) => ShipCategory::Sailing,
            40..=49 => ShipCategory::HighSpeed,
            _ => ShipCategory::Other,
        }
    }
}
