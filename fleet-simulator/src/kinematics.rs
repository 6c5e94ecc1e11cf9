use chrono::{DateTime, Utc};
use rand::Rng;
use vessel_core::Vessel;

/// Knots converted to degrees of latitude per second, treating one degree as 111 km.
pub const KNOTS_TO_DEGREES_PER_SECOND: f64 = 1.852 / 111_000.0;
/// Vessels at or below this speed are considered at rest.
pub const RESTING_SPEED: f64 = 0.5;
/// Largest random course change applied per tick, in degrees.
pub const MAX_COURSE_JITTER: f64 = 1.0;
/// Vessels are turned around before they reach the poles, where the longitude
/// correction degenerates.
pub const MAX_LATITUDE: f64 = 85.0;

pub fn wrap_longitude(longitude: f64) -> f64 {
    if longitude > 180.0 {
        longitude - 360.0
    } else if longitude < -180.0 {
        longitude + 360.0
    } else {
        longitude
    }
}

pub fn is_moving(vessel: &Vessel) -> bool {
    vessel.speed_over_ground > RESTING_SPEED
}

/// Advances the vessel `dt_secs` along its course with a flat earth approximation.
/// Vessels at rest keep their position but get a fresh timestamp.
pub fn advance<R: Rng + ?Sized>(vessel: &mut Vessel, dt_secs: f64, rng: &mut R, now: DateTime<Utc>) {
    vessel.last_update = now;

    if !is_moving(vessel) {
        return;
    }

    let step = vessel.speed_over_ground * KNOTS_TO_DEGREES_PER_SECOND * dt_secs;
    let course = vessel.course_over_ground.to_radians();

    let mut latitude = vessel.latitude + course.cos() * step;
    let longitude = vessel.longitude + course.sin() * step / vessel.latitude.to_radians().cos();

    let mut course_over_ground = vessel.course_over_ground;
    if latitude.abs() > MAX_LATITUDE {
        latitude = latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        course_over_ground = 180.0 - course_over_ground;
    }

    let jitter = rng.random_range(-MAX_COURSE_JITTER..=MAX_COURSE_JITTER);
    course_over_ground = (course_over_ground + jitter).rem_euclid(360.0);

    vessel.latitude = latitude;
    vessel.longitude = wrap_longitude(longitude);
    vessel.course_over_ground = course_over_ground;
    vessel.true_heading = heading_from_course(course_over_ground);
}

/// Rounded course in whole degrees `[0, 360)`.
pub fn heading_from_course(course: f64) -> i32 {
    (course.round() as i32).rem_euclid(360)
}
