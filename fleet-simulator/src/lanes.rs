/// A point along a shipping lane. Vessels spawned near it are scattered within `spread`
/// degrees of the lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub latitude: f64,
    pub longitude: f64,
    pub spread: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct ShippingLane {
    pub name: &'static str,
    pub waypoints: &'static [Waypoint],
}

const fn wp(latitude: f64, longitude: f64, spread: f64) -> Waypoint {
    Waypoint {
        latitude,
        longitude,
        spread,
    }
}

pub static SHIPPING_LANES: [ShippingLane; 22] = [
    ShippingLane {
        name: "English Channel",
        waypoints: &[wp(50.5, -2.0, 0.3), wp(51.0, 1.5, 0.3)],
    },
    ShippingLane {
        name: "North Sea",
        waypoints: &[wp(52.5, 3.0, 0.5), wp(56.0, 5.0, 0.5), wp(58.0, 6.0, 0.5)],
    },
    ShippingLane {
        name: "Mediterranean",
        waypoints: &[
            wp(36.0, -5.0, 0.5),
            wp(37.0, 5.0, 0.5),
            wp(35.0, 15.0, 0.5),
            wp(34.0, 25.0, 0.5),
            wp(33.0, 32.0, 0.3),
        ],
    },
    ShippingLane {
        name: "Suez - Red Sea - Gulf of Aden",
        waypoints: &[
            wp(30.0, 32.5, 0.2),
            wp(27.0, 34.0, 0.2),
            wp(22.0, 38.0, 0.3),
            wp(14.0, 43.0, 0.3),
            wp(12.0, 45.0, 0.3),
        ],
    },
    ShippingLane {
        name: "Persian Gulf",
        waypoints: &[wp(26.5, 50.0, 0.3), wp(25.0, 53.0, 0.3), wp(24.0, 56.0, 0.3)],
    },
    ShippingLane {
        name: "Indian Ocean",
        waypoints: &[
            wp(10.0, 55.0, 1.0),
            wp(5.0, 70.0, 1.0),
            wp(2.0, 80.0, 1.0),
            wp(0.0, 90.0, 1.0),
        ],
    },
    ShippingLane {
        name: "Strait of Malacca",
        waypoints: &[wp(3.0, 100.0, 0.3), wp(1.5, 103.0, 0.2), wp(1.2, 104.0, 0.2)],
    },
    ShippingLane {
        name: "South China Sea",
        waypoints: &[
            wp(2.0, 106.0, 0.5),
            wp(8.0, 110.0, 0.5),
            wp(15.0, 112.0, 0.5),
            wp(20.0, 114.0, 0.5),
        ],
    },
    ShippingLane {
        name: "East China Sea",
        waypoints: &[
            wp(25.0, 120.0, 0.5),
            wp(30.0, 122.0, 0.5),
            wp(33.0, 130.0, 0.5),
            wp(35.0, 135.0, 0.5),
            wp(35.0, 140.0, 0.5),
        ],
    },
    ShippingLane {
        name: "Korea Strait",
        waypoints: &[wp(34.0, 128.0, 0.3), wp(35.0, 129.5, 0.3), wp(36.0, 130.0, 0.3)],
    },
    ShippingLane {
        name: "North Pacific",
        waypoints: &[
            wp(35.0, 145.0, 1.0),
            wp(40.0, 160.0, 1.0),
            wp(42.0, 175.0, 1.0),
            wp(45.0, -170.0, 1.0),
            wp(47.0, -155.0, 1.0),
            wp(48.0, -140.0, 1.0),
            wp(48.0, -128.0, 0.5),
        ],
    },
    ShippingLane {
        name: "US West Coast",
        waypoints: &[
            wp(48.0, -125.0, 0.3),
            wp(45.0, -124.5, 0.3),
            wp(38.0, -123.0, 0.3),
            wp(34.0, -118.5, 0.3),
        ],
    },
    ShippingLane {
        name: "Panama approach",
        waypoints: &[
            wp(32.0, -117.0, 0.5),
            wp(25.0, -110.0, 0.5),
            wp(15.0, -100.0, 0.5),
            wp(9.0, -80.0, 0.3),
        ],
    },
    ShippingLane {
        name: "Gulf of Mexico",
        waypoints: &[wp(25.0, -90.0, 0.5), wp(28.0, -88.0, 0.5), wp(29.0, -85.0, 0.3)],
    },
    ShippingLane {
        name: "US East Coast",
        waypoints: &[
            wp(25.0, -80.0, 0.3),
            wp(30.0, -79.0, 0.3),
            wp(35.0, -75.0, 0.3),
            wp(40.0, -73.0, 0.3),
            wp(42.0, -70.0, 0.3),
        ],
    },
    ShippingLane {
        name: "North Atlantic",
        waypoints: &[
            wp(42.0, -65.0, 1.0),
            wp(45.0, -50.0, 1.0),
            wp(48.0, -30.0, 1.0),
            wp(50.0, -10.0, 1.0),
        ],
    },
    ShippingLane {
        name: "Caribbean",
        waypoints: &[
            wp(10.0, -62.0, 0.5),
            wp(12.0, -68.0, 0.5),
            wp(15.0, -75.0, 0.5),
            wp(18.0, -78.0, 0.5),
        ],
    },
    ShippingLane {
        name: "West Africa",
        waypoints: &[
            wp(5.0, -2.0, 0.5),
            wp(2.0, 5.0, 0.5),
            wp(-5.0, 10.0, 0.5),
            wp(-15.0, 12.0, 0.5),
        ],
    },
    ShippingLane {
        name: "Cape of Good Hope",
        waypoints: &[
            wp(-25.0, 15.0, 0.5),
            wp(-34.0, 18.0, 0.3),
            wp(-35.0, 20.0, 0.3),
            wp(-30.0, 32.0, 0.5),
        ],
    },
    ShippingLane {
        name: "Baltic",
        waypoints: &[
            wp(55.0, 12.0, 0.3),
            wp(56.0, 14.0, 0.3),
            wp(58.0, 18.0, 0.3),
            wp(59.5, 22.0, 0.3),
        ],
    },
    ShippingLane {
        name: "South Atlantic",
        waypoints: &[
            wp(-35.0, -55.0, 1.0),
            wp(-25.0, -40.0, 1.0),
            wp(-15.0, -30.0, 1.0),
            wp(-5.0, -15.0, 1.0),
        ],
    },
    ShippingLane {
        name: "Australia",
        waypoints: &[
            wp(-34.0, 151.0, 0.3),
            wp(-38.0, 145.0, 0.3),
            wp(-35.0, 137.0, 0.5),
            wp(-32.0, 115.0, 0.3),
        ],
    },
];

use crate::kinematics::wrap_longitude;

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Longitude difference taking the short way around, lanes may cross the antimeridian.
fn longitude_delta(from: f64, to: f64) -> f64 {
    let delta = to - from;
    if delta > 180.0 {
        delta - 360.0
    } else if delta < -180.0 {
        delta + 360.0
    } else {
        delta
    }
}

impl ShippingLane {
    pub fn segments(&self) -> impl Iterator<Item = (Waypoint, Waypoint)> + '_ {
        self.waypoints.windows(2).map(|w| (w[0], w[1]))
    }
}

impl Waypoint {
    /// Linear interpolation towards `other`, spread included.
    pub fn interpolate(&self, other: &Waypoint, t: f64) -> Waypoint {
        Waypoint {
            latitude: lerp(self.latitude, other.latitude, t),
            longitude: wrap_longitude(
                self.longitude + longitude_delta(self.longitude, other.longitude) * t,
            ),
            spread: lerp(self.spread, other.spread, t),
        }
    }

    /// Compass bearing towards `other` on a flat projection, in degrees `[0, 360)`.
    pub fn bearing_to(&self, other: &Waypoint) -> f64 {
        let dlat = other.latitude - self.latitude;
        let dlon = longitude_delta(self.longitude, other.longitude);
        dlon.atan2(dlat).to_degrees().rem_euclid(360.0)
    }
}
