use chrono::{DateTime, Utc};
use rand::{
    Rng,
    seq::{IndexedRandom, IteratorRandom},
};
use tracing::debug;
use vessel_core::{
    Dimensions, Mmsi, NavigationStatus, ShipCategory, Vessel, VesselMap, format_eta,
};

use crate::{
    kinematics::{RESTING_SPEED, heading_from_course, wrap_longitude},
    lanes::{SHIPPING_LANES, ShippingLane},
};

/// Ship type codes drawn for synthetic vessels with their weight out of 100.
pub static SHIP_TYPE_WEIGHTS: [(i32, u32); 8] = [
    (70, 40),
    (80, 25),
    (60, 5),
    (30, 10),
    (52, 3),
    (36, 5),
    (40, 2),
    (0, 10),
];

/// Maritime identification digits used for synthetic MMSIs.
pub static MIDS: [i64; 19] = [
    211, 219, 226, 244, 247, 257, 265, 271, 308, 338, 351, 366, 412, 431, 440, 477, 538, 563,
    636,
];

pub static NAME_SUFFIXES: [&str; 31] = [
    "FORTUNE",
    "GLORY",
    "SPIRIT",
    "STAR",
    "VOYAGER",
    "PIONEER",
    "AURORA",
    "DIAMOND",
    "HORIZON",
    "TITAN",
    "MERIDIAN",
    "PHOENIX",
    "VENTURE",
    "HARMONY",
    "LIBERTY",
    "TRIUMPH",
    "MAJESTY",
    "EXPLORER",
    "NAVIGATOR",
    "SENTINEL",
    "GUARDIAN",
    "ENDEAVOUR",
    "RESOLVE",
    "PROGRESS",
    "BREEZE",
    "WAVE",
    "CORAL",
    "OCEAN",
    "PEARL",
    "EAGLE",
    "FALCON",
];

pub static DESTINATIONS: [&str; 29] = [
    "SINGAPORE",
    "SHANGHAI",
    "ROTTERDAM",
    "ANTWERP",
    "HAMBURG",
    "HONG KONG",
    "BUSAN",
    "TOKYO",
    "LOS ANGELES",
    "LONG BEACH",
    "NEW YORK",
    "DUBAI",
    "PIRAEUS",
    "VALENCIA",
    "FELIXSTOWE",
    "ALGECIRAS",
    "TANJUNG PELEPAS",
    "PORT KLANG",
    "COLOMBO",
    "MUMBAI",
    "JEDDAH",
    "SUEZ CANAL",
    "PANAMA",
    "SANTOS",
    "DURBAN",
    "CAPE TOWN",
    "SYDNEY",
    "MELBOURNE",
    "YOKOHAMA",
];

pub const MIN_VESSELS_PER_LANE: usize = 8;
pub const MAX_VESSELS_PER_LANE: usize = 27;
/// Largest deviation of the initial course from the lane bearing, in degrees.
pub const MAX_COURSE_DEVIATION: f64 = 15.0;

pub fn name_prefixes(category: ShipCategory) -> &'static [&'static str] {
    match category {
        ShipCategory::Cargo => &[
            "MSC", "MAERSK", "CMA CGM", "COSCO", "EVER", "ONE", "HAPAG", "OOCL", "ZIM",
            "YANG MING",
        ],
        ShipCategory::Tanker => &[
            "NORDIC", "STENA", "CRUDE", "PACIFIC", "ATLANTIC", "BW", "TORM", "EURONAV", "HAFNIA",
            "SCORPIO",
        ],
        ShipCategory::Passenger => &[
            "CELEBRITY",
            "ROYAL",
            "CARNIVAL",
            "COSTA",
            "MSC",
            "DISNEY",
            "NORWEGIAN",
            "PRINCESS",
        ],
        ShipCategory::Fishing => &["FV", "TRAWLER", "SEINER", "LONGLINER"],
        ShipCategory::Tug => &["VB", "SVITZER", "BOLUDA", "SMIT", "FAIRPLAY"],
        ShipCategory::Sailing => &["SV", "SY", "KETCH", "SCHOONER"],
        ShipCategory::HighSpeed => &["HSC", "CAT", "FASTCAT", "CONDOR", "FRED OLSEN"],
        ShipCategory::Military | ShipCategory::Other => &["VESSEL", "BOAT", "CRAFT"],
    }
}

/// Speed range in knots for a category.
pub fn speed_range(category: ShipCategory) -> (i32, i32) {
    match category {
        ShipCategory::Passenger => (15, 23),
        ShipCategory::Fishing => (2, 8),
        ShipCategory::HighSpeed => (20, 35),
        _ => (8, 18),
    }
}

pub fn random_ship_type<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    let total: u32 = SHIP_TYPE_WEIGHTS.iter().map(|(_, w)| w).sum();
    let mut draw = rng.random_range(0..total);
    for (ship_type, weight) in SHIP_TYPE_WEIGHTS {
        if draw < weight {
            return ship_type;
        }
        draw -= weight;
    }
    0
}

pub fn random_name<R: Rng + ?Sized>(rng: &mut R, category: ShipCategory) -> String {
    let prefix = name_prefixes(category).choose(rng).unwrap_or(&"VESSEL");
    let suffix = NAME_SUFFIXES.choose(rng).unwrap_or(&"STAR");
    format!("{prefix} {suffix}")
}

pub fn random_mmsi<R: Rng + ?Sized>(rng: &mut R) -> Option<Mmsi> {
    let mid = MIDS.choose(rng)?;
    Mmsi::try_from(mid * 1_000_000 + rng.random_range(100_000..=999_999)).ok()
}

pub fn random_call_sign<R: Rng + ?Sized>(rng: &mut R) -> String {
    let a = rng.random_range(b'A'..=b'Z') as char;
    let b = rng.random_range(b'A'..=b'Z') as char;
    format!("{a}{b}{}", rng.random_range(1000..=9999))
}

pub fn random_eta<R: Rng + ?Sized>(rng: &mut R) -> String {
    format_eta(
        rng.random_range(1..=12),
        rng.random_range(1..=28),
        rng.random_range(0..=23),
        rng.random_range(0..=59),
    )
}

/// Spawns a vessel at a random point of a random segment of the lane.
pub fn spawn_vessel<R: Rng + ?Sized>(
    rng: &mut R,
    lane: &ShippingLane,
    now: DateTime<Utc>,
) -> Option<Vessel> {
    let (from, to) = lane.segments().choose(rng)?;

    let point = from.interpolate(&to, rng.random::<f64>());
    let latitude = point.latitude + (rng.random::<f64>() - 0.5) * point.spread;
    let longitude = wrap_longitude(point.longitude + (rng.random::<f64>() - 0.5) * point.spread);

    let ship_type = random_ship_type(rng);
    let category = ShipCategory::from_ship_type(ship_type);
    let mmsi = random_mmsi(rng)?;

    let (min_speed, max_speed) = speed_range(category);
    let speed_over_ground = rng.random_range(min_speed..=max_speed) as f64;

    let deviation = rng.random_range(-MAX_COURSE_DEVIATION..=MAX_COURSE_DEVIATION);
    let course_over_ground = (from.bearing_to(&to) + deviation).rem_euclid(360.0);

    let navigation_status = if speed_over_ground > RESTING_SPEED {
        NavigationStatus::UnderWayUsingEngine
    } else if rng.random_bool(0.5) {
        NavigationStatus::AtAnchor
    } else {
        NavigationStatus::Moored
    };

    let draught = ((rng.random::<f64>() * 15.0 + 2.0) * 10.0).round() / 10.0;

    Some(Vessel {
        mmsi,
        name: random_name(rng, category),
        ship_type,
        call_sign: random_call_sign(rng),
        imo_number: rng.random_range(9_000_000..=9_999_999),
        latitude,
        longitude,
        speed_over_ground,
        course_over_ground,
        true_heading: heading_from_course(course_over_ground),
        navigation_status,
        destination: DESTINATIONS.choose(rng).unwrap_or(&"").to_string(),
        eta: random_eta(rng),
        draught,
        dimensions: Dimensions {
            bow: rng.random_range(50..=200),
            stern: rng.random_range(20..=100),
            port: rng.random_range(10..=30),
            starboard: rng.random_range(10..=30),
        },
        last_update: now,
    })
}

/// Generates a fresh fleet along every shipping lane.
pub fn generate_fleet<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> VesselMap {
    let mut fleet = VesselMap::new();

    for lane in &SHIPPING_LANES {
        let count = rng.random_range(MIN_VESSELS_PER_LANE..=MAX_VESSELS_PER_LANE);
        for _ in 0..count {
            if let Some(vessel) = spawn_vessel(rng, lane, now) {
                fleet.insert(vessel.mmsi, vessel);
            }
        }
        debug!(lane = lane.name, count, "spawned lane traffic");
    }

    fleet
}
