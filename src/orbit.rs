//! Orbit sampling for animated globe objects.
//!
//! Two orbit styles are supported, collapsing the per-variant math that used
//! to be duplicated across the shuttle widgets: an inertial circular orbit
//! with a figure-eight vertical bob expressed directly in render space, and a
//! fixed-altitude inclined ground track expressed in geodetic coordinates.
//! Both are pure step functions: the caller owns the state and advances it
//! once per tick.

use nalgebra::{Matrix3, Vector3};
use std::f64::consts::TAU;

use crate::geodetic::{to_cartesian, GeodeticPoint};

/// Angle below which a tangent vector is considered degenerate.
const TANGENT_EPSILON: f64 = 1e-12;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitState {
    /// Orbit phase in radians, kept in [0, 2π).
    pub angle: f64,
    /// Orbit radius in render-space units.
    pub radius: f64,
    /// Peak vertical displacement of the figure-eight bob.
    pub vertical_amplitude: f64,
    /// Radians advanced per tick.
    pub angular_speed: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct OrbitSample {
    pub position: Vector3<f64>,
    /// Unit tangent of the position curve; the declared +X fallback when the
    /// curve degenerates to a point.
    pub heading: Vector3<f64>,
}

impl OrbitState {
    pub fn new(radius: f64, vertical_amplitude: f64, angular_speed: f64) -> Self {
        Self { angle: 0.0, radius, vertical_amplitude, angular_speed }
    }

    /// Position and heading at the current phase.
    ///
    /// Position: x = r·cosθ, z = r·sinθ, y = A·sin 2θ. Heading is the
    /// analytic derivative with respect to θ, normalized, so orientation is
    /// independent of tick duration and does not jitter at low speeds.
    pub fn sample(&self) -> OrbitSample {
        let (sin_a, cos_a) = self.angle.sin_cos();
        let position = Vector3::new(
            self.radius * cos_a,
            self.vertical_amplitude * (2.0 * self.angle).sin(),
            self.radius * sin_a,
        );
        let tangent = Vector3::new(
            -self.radius * sin_a,
            2.0 * self.vertical_amplitude * (2.0 * self.angle).cos(),
            self.radius * cos_a,
        );
        let norm = tangent.norm();
        let heading = if norm < TANGENT_EPSILON {
            Vector3::x()
        } else {
            tangent / norm
        };
        OrbitSample { position, heading }
    }
}

/// Advances the orbit by a whole number of ticks and samples the result.
/// `ticks = 0` returns the input state unchanged.
pub fn advance(state: OrbitState, ticks: u32) -> (OrbitState, OrbitSample) {
    if ticks == 0 {
        return (state, state.sample());
    }
    let next = OrbitState {
        angle: (state.angle + ticks as f64 * state.angular_speed).rem_euclid(TAU),
        ..state
    };
    let sample = next.sample();
    (next, sample)
}

/// Orthonormal (tangent, binormal, normal) orientation frame for a model
/// travelling along the orbit, with the globe's up axis as the reference
/// normal. Falls back to the identity-adjacent frame when the heading is
/// parallel to up.
pub fn heading_basis(heading: &Vector3<f64>) -> Matrix3<f64> {
    let up = Vector3::y();
    let mut binormal = up.cross(heading);
    if binormal.norm() < TANGENT_EPSILON {
        binormal = Vector3::z();
    } else {
        binormal.normalize_mut();
    }
    let normal = heading.cross(&binormal);
    Matrix3::from_columns(&[*heading, binormal, normal])
}

/// Fixed-altitude inclined ground track: lat = r·sin(angle), lon = angle,
/// both in degrees. This is the orbit the cone/GLB shuttle variants flew.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundTrackOrbit {
    /// Peak latitude reached, in degrees.
    pub track_radius_deg: f64,
    pub speed_deg_per_tick: f64,
    pub altitude_ratio: f64,
}

impl GroundTrackOrbit {
    pub fn advance(&self, angle_deg: f64, ticks: u32) -> f64 {
        if ticks == 0 {
            return angle_deg;
        }
        (angle_deg + ticks as f64 * self.speed_deg_per_tick).rem_euclid(360.0)
    }

    pub fn point_at(&self, angle_deg: f64) -> GeodeticPoint {
        GeodeticPoint {
            lat_deg: self.track_radius_deg * angle_deg.to_radians().sin(),
            lon_deg: wrap_lon(angle_deg),
            altitude_ratio: self.altitude_ratio,
        }
    }

    /// Render-space heading from a one-degree look-ahead along the track.
    pub fn heading_at(&self, angle_deg: f64, globe_radius: f64) -> Vector3<f64> {
        let here = to_cartesian(&self.point_at(angle_deg), globe_radius);
        let ahead = to_cartesian(&self.point_at(angle_deg + 1.0), globe_radius);
        let tangent = ahead - here;
        let norm = tangent.norm();
        if norm < TANGENT_EPSILON {
            Vector3::x()
        } else {
            tangent / norm
        }
    }
}

fn wrap_lon(deg: f64) -> f64 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}
