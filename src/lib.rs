//! Simulation core for interactive 3D-globe visualization widgets.
//!
//! Provides the geometry and dataset plumbing behind a family of globe
//! front ends: geodetic/Cartesian conversions, orbit sampling for animated
//! shuttle models, trailing-camera framing, TLE satellite catalogs
//! propagated per frame, and airline-route/synthetic arc overlays. Rendering
//! stays with the host: every scene here is a pure-ish step function that
//! returns coordinates and poses for the host to apply once per frame.

pub mod arcs;
pub mod camera;
pub mod config;
pub mod fetch;
pub mod geodetic;
pub mod host;
pub mod orbit;
pub mod routes;
pub mod time;
pub mod tle;

pub use camera::{frame, CameraMode, CameraPose, OrbitControlTuning};
pub use config::{OrbitStyle, ShuttleConfig, ShuttlePreset};
pub use fetch::{fetch_or_cache, fetch_text, DatasetState, FetchError};
pub use geodetic::{from_cartesian, to_cartesian, GeodeticPoint};
pub use host::{
    CallbackRegistry, FrameHandle, FrameScheduler, GlobeHost, SatelliteScene, ShuttleFrame,
    ShuttleScene,
};
pub use orbit::{advance, GroundTrackOrbit, OrbitSample, OrbitState};
pub use tle::{
    catalog_positions, parse_catalog, CatalogSource, Propagator, SatellitePoint, SatelliteRecord,
    Sgp4Propagator,
};
