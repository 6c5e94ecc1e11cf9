use std::fmt::Display;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use strum::{AsRefStr, EnumString};

use crate::{Error, error::error::InvalidMmsiSnafu};

/// Latitude reported by transponders that have no position fix.
pub const UNAVAILABLE_LATITUDE: f64 = 91.0;
/// Longitude reported by transponders that have no position fix.
pub const UNAVAILABLE_LONGITUDE: f64 = 181.0;
/// True heading reported when the heading is not available.
pub const UNKNOWN_HEADING: i32 = 511;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct Mmsi(i32);

#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    FromPrimitive,
    Eq,
    Serialize_repr,
    Deserialize_repr,
    strum::Display,
    AsRefStr,
    EnumString,
)]
#[repr(i32)]
pub enum NavigationStatus {
    UnderWayUsingEngine = 0,
    AtAnchor = 1,
    NotUnderCommand = 2,
    RestrictedManoeuverability = 3,
    ConstrainedByDraught = 4,
    Moored = 5,
    Aground = 6,
    EngagedInFishing = 7,
    UnderWaySailing = 8,
    Reserved9 = 9,
    Reserved10 = 10,
    Reserved11 = 11,
    Reserved12 = 12,
    Reserved13 = 13,
    AisSartIsActive = 14,
    #[default]
    NotDefined = 15,
}

impl Mmsi {
    pub fn into_inner(self) -> i32 {
        self.0
    }

    /// The maritime identification digits, which identify the flag state of the vessel.
    pub fn mid(&self) -> i32 {
        self.0 / 1_000_000
    }
}

impl TryFrom<i64> for Mmsi {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match i32::try_from(value) {
            Ok(v) if v > 0 => Ok(Self(v)),
            _ => InvalidMmsiSnafu { value }.fail(),
        }
    }
}

impl From<Mmsi> for i32 {
    fn from(value: Mmsi) -> Self {
        value.0
    }
}

impl Display for Mmsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl NavigationStatus {
    /// Unknown and out of range codes map to [NavigationStatus::NotDefined].
    pub fn from_code(code: i32) -> Self {
        Self::from_i32(code).unwrap_or_default()
    }
}

/// Returns false for the "not available" sentinels of the AIS protocol and for `(0, 0)`,
/// which is never treated as a real position.
pub fn is_valid_fix(latitude: f64, longitude: f64) -> bool {
    if latitude == UNAVAILABLE_LATITUDE || longitude == UNAVAILABLE_LONGITUDE {
        return false;
    }
    !(latitude == 0.0 && longitude == 0.0)
}

/// Formats the month/day/hour/minute fields of a static report as `MM/DD HH:MM`.
/// A month of zero means no ETA was given and yields an empty string.
pub fn format_eta(month: u32, day: u32, hour: u32, minute: u32) -> String {
    if month == 0 {
        return String::new();
    }
    format!("{month:02}/{day:02} {hour:02}:{minute:02}")
}

#[cfg(any(test, feature = "test"))]
mod test {
    use super::*;

    impl Mmsi {
        pub fn test_new(mmsi: i32) -> Self {
            Self(mmsi)
        }
    }
}
