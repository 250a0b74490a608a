//! Shuttle orbit presets and configuration.
//!
//! The shuttle widgets historically shipped with divergent copies of the
//! same orbit animation; the parameter sets observed in each are captured
//! here as presets, with the inertial figure-eight orbiter as the default.
//! Nothing is mandated: hosts tweak the config fields directly.

use nalgebra::Vector3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OrbitStyle {
    /// Render-space circular orbit with a figure-eight vertical bob; radius
    /// and amplitude are multiples of the globe radius, speed in radians
    /// per tick.
    Inertial {
        radius_ratio: f64,
        amplitude_ratio: f64,
        angular_speed: f64,
    },
    /// Fixed-altitude inclined ground track; track radius is the peak
    /// latitude, speed in degrees per tick.
    GroundTrack {
        track_radius_deg: f64,
        speed_deg_per_tick: f64,
        altitude_ratio: f64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShuttleConfig {
    pub style: OrbitStyle,
    /// World-space camera offset applied in follow mode.
    pub camera_offset: Vector3<f64>,
}

impl Default for ShuttleConfig {
    fn default() -> Self {
        ShuttlePreset::Orbiter.config()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ShuttlePreset {
    /// Low, slow cone model riding a 30 degree ground track.
    Cone,
    /// Higher and faster GLB shuttle model on a 40 degree track.
    GlbModel,
    /// Inertial orbiter with the figure-eight vertical bob.
    Orbiter,
}

impl ShuttlePreset {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cone => "Cone",
            Self::GlbModel => "GLB Shuttle",
            Self::Orbiter => "Orbiter",
        }
    }

    pub fn config(&self) -> ShuttleConfig {
        let style = match self {
            Self::Cone => OrbitStyle::GroundTrack {
                track_radius_deg: 30.0,
                speed_deg_per_tick: 0.5,
                altitude_ratio: 0.2,
            },
            Self::GlbModel => OrbitStyle::GroundTrack {
                track_radius_deg: 40.0,
                speed_deg_per_tick: 1.0,
                altitude_ratio: 0.5,
            },
            Self::Orbiter => OrbitStyle::Inertial {
                radius_ratio: 1.5,
                amplitude_ratio: 0.5,
                angular_speed: 0.005,
            },
        };
        ShuttleConfig {
            style,
            camera_offset: Vector3::new(0.0, 10.0, -30.0),
        }
    }

    pub const ALL: [ShuttlePreset; 3] = [Self::Cone, Self::GlbModel, Self::Orbiter];
}
