//! Spherical/Cartesian coordinate conversions.
//!
//! Geodetic positions use degrees at the interface and express altitude as a
//! fraction of the reference-body radius, so the conversions are independent
//! of render-space scale. Render space is y-up: x = r·cos(lat)·cos(lon),
//! y = r·sin(lat), z = r·cos(lat)·sin(lon).

use nalgebra::Vector3;
use std::f64::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeodeticPoint {
    pub lat_deg: f64,
    pub lon_deg: f64,
    /// Altitude above the surface as a fraction of the reference radius.
    pub altitude_ratio: f64,
}

impl GeodeticPoint {
    pub fn new(lat_deg: f64, lon_deg: f64, altitude_ratio: f64) -> Self {
        Self { lat_deg, lon_deg, altitude_ratio }
    }

    /// Propagation output failing this check is dropped, never rendered.
    pub fn is_finite(&self) -> bool {
        self.lat_deg.is_finite() && self.lon_deg.is_finite() && self.altitude_ratio.is_finite()
    }
}

pub fn to_cartesian(p: &GeodeticPoint, reference_radius: f64) -> Vector3<f64> {
    let lat = p.lat_deg.to_radians();
    let lon = p.lon_deg.to_radians();
    let r = reference_radius * (1.0 + p.altitude_ratio);
    Vector3::new(
        r * lat.cos() * lon.cos(),
        r * lat.sin(),
        r * lat.cos() * lon.sin(),
    )
}

pub fn from_cartesian(v: &Vector3<f64>, reference_radius: f64) -> GeodeticPoint {
    let r = v.norm();
    if r < 1e-12 {
        // Origin has no defined direction; report the body center.
        return GeodeticPoint::new(0.0, 0.0, -1.0);
    }
    GeodeticPoint {
        lat_deg: (v.y / r).asin().to_degrees(),
        lon_deg: v.z.atan2(v.x).to_degrees(),
        altitude_ratio: r / reference_radius - 1.0,
    }
}

/// Converts an inertial (TEME) position in km to body-fixed geodetic
/// coordinates given Greenwich sidereal time. The inertial frame is z-polar,
/// unlike render space.
pub fn eci_to_geodetic(position_km: &Vector3<f64>, gmst: f64, body_radius_km: f64) -> GeodeticPoint {
    let r = position_km.norm();
    if r < 1e-9 {
        return GeodeticPoint::new(0.0, 0.0, -1.0);
    }
    let lat = (position_km.z / r).asin();
    let mut lon = position_km.y.atan2(position_km.x) - gmst;
    lon = (lon + PI).rem_euclid(2.0 * PI) - PI;
    GeodeticPoint {
        lat_deg: lat.to_degrees(),
        lon_deg: lon.to_degrees(),
        altitude_ratio: r / body_radius_km - 1.0,
    }
}
