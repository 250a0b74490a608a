//! Sidereal time calculation.
//!
//! Greenwich Mean Sidereal Time (GMST) gives the rotational reference angle
//! used to convert inertial satellite positions to body-fixed coordinates.

use chrono::{DateTime, Utc};

pub const SECONDS_PER_DAY: f64 = 86400.0;
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36525.0;

const GMST_BASE_DEG: f64 = 280.46061837;
const GMST_ROTATION_PER_DAY: f64 = 360.98564736629;
const GMST_CORRECTION: f64 = 0.000387933;

// 2000-01-01T12:00:00Z
const J2000_EPOCH_MILLIS: i64 = 946_728_000_000;

/// GMST in radians, normalized to [0, 2π).
pub fn greenwich_mean_sidereal_time(timestamp: DateTime<Utc>) -> f64 {
    let days_since_j2000 =
        (timestamp.timestamp_millis() - J2000_EPOCH_MILLIS) as f64 / (1000.0 * SECONDS_PER_DAY);
    let centuries = days_since_j2000 / DAYS_PER_JULIAN_CENTURY;
    let gmst_degrees = GMST_BASE_DEG
        + GMST_ROTATION_PER_DAY * days_since_j2000
        + GMST_CORRECTION * centuries * centuries
        - centuries * centuries * centuries / 38710000.0;
    gmst_degrees.rem_euclid(360.0).to_radians()
}
