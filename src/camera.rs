//! Camera framing and orbit-control tuning.
//!
//! The camera has two modes: in Free mode the host's orbit controls own the
//! viewpoint and this module only supplies tuning values; in Follow mode
//! `frame` is invoked every tick to produce an absolute trailing pose. No
//! smoothing is applied here; interpolation is the caller's concern.

use nalgebra::Vector3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vector3<f64>,
    pub look_at: Vector3<f64>,
}

/// Trailing third-person pose: the camera sits at a fixed world-space offset
/// from the target and looks at `look_at`.
pub fn frame(target: Vector3<f64>, look_at: Vector3<f64>, offset: Vector3<f64>) -> CameraPose {
    CameraPose { position: target + offset, look_at }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CameraMode {
    #[default]
    Free,
    Follow,
}

impl CameraMode {
    pub fn toggle(&mut self) {
        *self = match self {
            CameraMode::Free => CameraMode::Follow,
            CameraMode::Follow => CameraMode::Free,
        };
    }

    pub fn is_follow(&self) -> bool {
        matches!(self, CameraMode::Follow)
    }
}

/// Orbit-control parameters for the host camera, with rotate/zoom speeds
/// that scale down as the camera approaches the surface.
#[derive(Clone, Copy, Debug)]
pub struct OrbitControlTuning {
    pub min_distance: f64,
    pub max_distance: f64,
    pub damping_factor: f64,
    pub base_rotate_speed: f64,
    pub base_zoom_speed: f64,
}

impl OrbitControlTuning {
    pub fn for_globe(globe_radius: f64) -> Self {
        Self {
            min_distance: globe_radius * 1.1,
            max_distance: 1000.0,
            damping_factor: 0.1,
            base_rotate_speed: 0.4,
            base_zoom_speed: 0.3,
        }
    }

    /// Rotate speed proportional to the distance to the surface.
    pub fn rotate_speed(&self, camera_distance: f64, globe_radius: f64) -> f64 {
        let ratio = ((camera_distance - globe_radius) / globe_radius).max(0.0);
        ratio * self.base_rotate_speed
    }

    /// Zoom speed proportional to the square root of the surface distance,
    /// so zooming slows smoothly near the globe.
    pub fn zoom_speed(&self, camera_distance: f64, globe_radius: f64) -> f64 {
        let ratio = ((camera_distance - globe_radius) / globe_radius).max(0.0);
        ratio.sqrt() * self.base_zoom_speed
    }

    pub fn clamp_distance(&self, camera_distance: f64) -> f64 {
        camera_distance.clamp(self.min_distance, self.max_distance)
    }
}
