use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Mmsi, NavigationStatus, ShipCategory, UNKNOWN_HEADING};

/// Antenna offsets reported by static messages, in meters.
/// `bow + stern` is the length and `port + starboard` the beam of the vessel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    pub bow: i32,
    pub stern: i32,
    pub port: i32,
    pub starboard: i32,
}

/// The published state of a single vessel.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vessel {
    pub mmsi: Mmsi,
    pub name: String,
    pub ship_type: i32,
    pub call_sign: String,
    pub imo_number: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub speed_over_ground: f64,
    pub course_over_ground: f64,
    pub true_heading: i32,
    pub navigation_status: NavigationStatus,
    pub destination: String,
    pub eta: String,
    pub draught: f64,
    pub dimensions: Dimensions,
    pub last_update: DateTime<Utc>,
}

/// Fields of a vessel learned since the last publish tick.
/// Absent fields fall back to the previously published value when folded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VesselFragment {
    pub name: Option<String>,
    pub ship_type: Option<i32>,
    pub call_sign: Option<String>,
    pub imo_number: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub speed_over_ground: Option<f64>,
    pub course_over_ground: Option<f64>,
    pub true_heading: Option<i32>,
    pub navigation_status: Option<NavigationStatus>,
    pub destination: Option<String>,
    pub eta: Option<String>,
    pub draught: Option<f64>,
    pub dimensions: Option<Dimensions>,
    pub last_update: Option<DateTime<Utc>>,
}

/// Last known wins: the fragment value if present, else the previously published value,
/// else the default.
pub fn resolve_field<T>(fragment: Option<T>, previous: Option<T>, default: T) -> T {
    fragment.or(previous).unwrap_or(default)
}

impl Dimensions {
    pub fn is_unknown(&self) -> bool {
        *self == Dimensions::default()
    }

    pub fn length(&self) -> Option<i32> {
        (!self.is_unknown()).then_some(self.bow + self.stern)
    }

    pub fn beam(&self) -> Option<i32> {
        (!self.is_unknown()).then_some(self.port + self.starboard)
    }
}

impl Vessel {
    /// Folds a fragment into the previously published record of the same vessel.
    /// Every field's precedence and default is declared here and nowhere else.
    pub fn fold(
        mmsi: Mmsi,
        fragment: VesselFragment,
        previous: Option<&Vessel>,
        now: DateTime<Utc>,
    ) -> Vessel {
        let VesselFragment {
            name,
            ship_type,
            call_sign,
            imo_number,
            latitude,
            longitude,
            speed_over_ground,
            course_over_ground,
            true_heading,
            navigation_status,
            destination,
            eta,
            draught,
            dimensions,
            last_update,
        } = fragment;

        Vessel {
            mmsi,
            name: resolve_field(name, previous.map(|v| v.name.clone()), String::new()),
            ship_type: resolve_field(ship_type, previous.map(|v| v.ship_type), 0),
            call_sign: resolve_field(call_sign, previous.map(|v| v.call_sign.clone()), String::new()),
            imo_number: resolve_field(imo_number, previous.map(|v| v.imo_number), 0),
            latitude: resolve_field(latitude, previous.map(|v| v.latitude), 0.0),
            longitude: resolve_field(longitude, previous.map(|v| v.longitude), 0.0),
            speed_over_ground: resolve_field(
                speed_over_ground,
                previous.map(|v| v.speed_over_ground),
                0.0,
            ),
            course_over_ground: resolve_field(
                course_over_ground,
                previous.map(|v| v.course_over_ground),
                0.0,
            ),
            true_heading: resolve_field(
                true_heading,
                previous.map(|v| v.true_heading),
                UNKNOWN_HEADING,
            ),
            navigation_status: resolve_field(
                navigation_status,
                previous.map(|v| v.navigation_status),
                NavigationStatus::NotDefined,
            ),
            destination: resolve_field(
                destination,
                previous.map(|v| v.destination.clone()),
                String::new(),
            ),
            eta: resolve_field(eta, previous.map(|v| v.eta.clone()), String::new()),
            draught: resolve_field(draught, previous.map(|v| v.draught), 0.0),
            dimensions: resolve_field(
                dimensions,
                previous.map(|v| v.dimensions),
                Dimensions::default(),
            ),
            // A fragment always carries the time of the message that produced it,
            // so the previous record's timestamp is never carried forward.
            last_update: resolve_field(last_update, None, now),
        }
    }

    /// `(0, 0)` marks a vessel without any known position, such records are never published.
    pub fn has_fix(&self) -> bool {
        self.latitude != 0.0 || self.longitude != 0.0
    }

    pub fn category(&self) -> ShipCategory {
        ShipCategory::from_ship_type(self.ship_type)
    }

    pub fn length(&self) -> Option<i32> {
        self.dimensions.length()
    }

    pub fn beam(&self) -> Option<i32> {
        self.dimensions.beam()
    }

    pub fn country_mid(&self) -> i32 {
        self.mmsi.mid()
    }
}

#[cfg(any(test, feature = "test"))]
mod test {
    use super::*;

    impl Vessel {
        pub fn test_default(mmsi: Mmsi) -> Vessel {
            Vessel {
                mmsi,
                name: "NORDIC SPIRIT".to_string(),
                ship_type: 80,
                call_sign: "LK4521".to_string(),
                imo_number: 9_412_345,
                latitude: 60.39,
                longitude: 5.32,
                speed_over_ground: 11.2,
                course_over_ground: 184.5,
                true_heading: 185,
                navigation_status: NavigationStatus::UnderWayUsingEngine,
                destination: "ROTTERDAM".to_string(),
                eta: "03/07 14:05".to_string(),
                draught: 9.8,
                dimensions: Dimensions {
                    bow: 150,
                    stern: 33,
                    port: 16,
                    starboard: 16,
                },
                last_update: Utc::now(),
            }
        }
    }
}
