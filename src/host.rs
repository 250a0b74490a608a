//! Render-host collaborator seam and per-tick scene drivers.
//!
//! The host rendering framework owns the draw loop; this module owns the
//! state that must change between frames. Each scene exposes an explicit
//! `advance` step function mutated only by the single per-tick call, and the
//! host applies the returned coordinates and poses. `FrameHandle`
//! deregisters its callback on drop so a torn-down scene never leaves a
//! dangling per-frame callback behind.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use nalgebra::{Matrix3, Vector3};

use crate::camera::{frame, CameraMode, CameraPose};
use crate::config::{OrbitStyle, ShuttleConfig};
use crate::fetch::DatasetState;
use crate::geodetic::GeodeticPoint;
use crate::orbit::{self, GroundTrackOrbit, OrbitState};
use crate::tle::{catalog_positions, parse_catalog, Propagator, SatellitePoint, SatelliteRecord, Sgp4Propagator};

/// Narrow imperative seam into the host renderer. The simulation never draws;
/// it only asks for coordinate conversions and pushes viewpoints.
pub trait GlobeHost {
    fn globe_radius(&self) -> f64;
    fn coords(&self, lat_deg: f64, lon_deg: f64, altitude_ratio: f64) -> Vector3<f64>;
    fn point_of_view(&mut self, view: GeodeticPoint);
}

/// Host-side per-frame callback registry. The callback receives the number
/// of ticks elapsed since it last ran.
pub trait FrameScheduler {
    fn register(&self, callback: Box<dyn FnMut(u32)>) -> u64;
    fn cancel(&self, id: u64);
}

/// RAII registration: dropping the handle cancels the callback.
pub struct FrameHandle {
    scheduler: Rc<dyn FrameScheduler>,
    id: u64,
}

impl FrameHandle {
    pub fn new(scheduler: Rc<dyn FrameScheduler>, callback: Box<dyn FnMut(u32)>) -> Self {
        let id = scheduler.register(callback);
        Self { scheduler, id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for FrameHandle {
    fn drop(&mut self) {
        self.scheduler.cancel(self.id);
    }
}

/// Everything the host needs to draw the shuttle for one frame.
#[derive(Clone, Copy, Debug)]
pub struct ShuttleFrame {
    pub position: Vector3<f64>,
    pub heading: Vector3<f64>,
    /// (tangent, binormal, normal) model orientation basis.
    pub orientation: Matrix3<f64>,
    /// Present only in follow mode.
    pub camera: Option<CameraPose>,
}

pub struct ShuttleScene {
    pub config: ShuttleConfig,
    pub camera_mode: CameraMode,
    orbit: OrbitState,
    track_angle_deg: f64,
}

impl ShuttleScene {
    pub fn new(config: ShuttleConfig, host: &dyn GlobeHost) -> Self {
        let globe_radius = host.globe_radius();
        let orbit = match config.style {
            OrbitStyle::Inertial { radius_ratio, amplitude_ratio, angular_speed } => OrbitState::new(
                globe_radius * radius_ratio,
                globe_radius * amplitude_ratio,
                angular_speed,
            ),
            OrbitStyle::GroundTrack { .. } => OrbitState::new(0.0, 0.0, 0.0),
        };
        Self {
            config,
            camera_mode: CameraMode::Free,
            orbit,
            track_angle_deg: 0.0,
        }
    }

    /// Advances the orbit and returns the frame's position, orientation, and
    /// (in follow mode) camera pose. Ground-track positions go through the
    /// host's coordinate conversion; the camera trails at the configured
    /// offset and looks at the globe center.
    pub fn advance(&mut self, host: &dyn GlobeHost, ticks: u32) -> ShuttleFrame {
        let (position, heading) = match self.config.style {
            OrbitStyle::Inertial { .. } => {
                let (next, sample) = orbit::advance(self.orbit, ticks);
                self.orbit = next;
                (sample.position, sample.heading)
            }
            OrbitStyle::GroundTrack { track_radius_deg, speed_deg_per_tick, altitude_ratio } => {
                let track = GroundTrackOrbit { track_radius_deg, speed_deg_per_tick, altitude_ratio };
                self.track_angle_deg = track.advance(self.track_angle_deg, ticks);
                let point = track.point_at(self.track_angle_deg);
                (
                    host.coords(point.lat_deg, point.lon_deg, point.altitude_ratio),
                    track.heading_at(self.track_angle_deg, host.globe_radius()),
                )
            }
        };
        let camera = self
            .camera_mode
            .is_follow()
            .then(|| frame(position, Vector3::zeros(), self.config.camera_offset));
        ShuttleFrame {
            position,
            heading,
            orientation: orbit::heading_basis(&heading),
            camera,
        }
    }
}

/// Default simulated seconds per display frame (the widgets run the catalog
/// at 3 s per frame, 60 frames per wall second).
pub const DEFAULT_TIME_STEP_SECONDS: i64 = 3;

pub struct SatelliteScene<P = Sgp4Propagator> {
    pub catalog: DatasetState<Vec<SatelliteRecord<P>>>,
    pub sim_time: DateTime<Utc>,
    /// Simulated time advanced per tick.
    pub time_step: chrono::Duration,
}

impl SatelliteScene {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            catalog: DatasetState::NotLoaded,
            sim_time: start,
            time_step: chrono::Duration::seconds(DEFAULT_TIME_STEP_SECONDS),
        }
    }

    /// Parses a fetched catalog blob, running the load-time liveness filter
    /// at the scene's current simulated time.
    pub fn load_catalog(&mut self, raw: &str) {
        let records = parse_catalog(raw, self.sim_time);
        self.catalog = if records.is_empty() {
            DatasetState::Failed("no valid TLE records".to_string())
        } else {
            DatasetState::Loaded(records)
        };
    }
}

impl<P: Propagator> SatelliteScene<P> {
    /// Advances simulated time and propagates the catalog. While the catalog
    /// is pending or failed this is a no-op returning an empty set.
    pub fn advance(&mut self, ticks: u32) -> Vec<SatellitePoint> {
        self.sim_time += self.time_step * ticks as i32;
        match self.catalog.loaded() {
            Some(records) => catalog_positions(records, self.sim_time),
            None => Vec::new(),
        }
    }

    /// Initial viewpoint over the catalog: equatorial, 3.5 globe radii up.
    pub fn initial_point_of_view() -> GeodeticPoint {
        GeodeticPoint::new(0.0, 0.0, 3.5)
    }

    /// Pushes the catalog's initial viewpoint into the host camera.
    pub fn push_initial_view(host: &mut dyn GlobeHost) {
        host.point_of_view(Self::initial_point_of_view());
    }
}

/// Convenience scheduler for hosts without their own frame loop machinery;
/// single-threaded by design, matching the cooperative execution model.
#[derive(Default)]
pub struct CallbackRegistry {
    callbacks: RefCell<Vec<(u64, Box<dyn FnMut(u32)>)>>,
    /// Ids cancelled while a tick is in flight; drained when the tick ends.
    cancelled: RefCell<Vec<u64>>,
    next_id: RefCell<u64>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every registered callback for one frame. Callbacks may register
    /// new callbacks or cancel existing ones (their own handle included)
    /// while running; registrations start on the next tick and a
    /// cancellation suppresses its callback for the rest of this one.
    pub fn tick(&self, ticks: u32) {
        let mut running = self.callbacks.take();
        for (id, callback) in running.iter_mut() {
            if self.cancelled.borrow().contains(id) {
                continue;
            }
            callback(ticks);
        }
        let cancelled = self.cancelled.take();
        running.retain(|(id, _)| !cancelled.contains(id));
        running.append(&mut self.callbacks.borrow_mut());
        *self.callbacks.borrow_mut() = running;
    }

    pub fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.borrow().is_empty()
    }
}

impl FrameScheduler for CallbackRegistry {
    fn register(&self, callback: Box<dyn FnMut(u32)>) -> u64 {
        let mut next = self.next_id.borrow_mut();
        *next += 1;
        let id = *next;
        self.callbacks.borrow_mut().push((id, callback));
        id
    }

    fn cancel(&self, id: u64) {
        self.cancelled.borrow_mut().push(id);
        self.callbacks.borrow_mut().retain(|(cb_id, _)| *cb_id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShuttlePreset;
    use crate::geodetic::to_cartesian;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    struct TestHost {
        radius: f64,
        view: Option<GeodeticPoint>,
    }

    impl TestHost {
        fn with_radius(radius: f64) -> Self {
            Self { radius, view: None }
        }
    }

    impl GlobeHost for TestHost {
        fn globe_radius(&self) -> f64 {
            self.radius
        }

        fn coords(&self, lat_deg: f64, lon_deg: f64, altitude_ratio: f64) -> Vector3<f64> {
            to_cartesian(&GeodeticPoint::new(lat_deg, lon_deg, altitude_ratio), self.radius)
        }

        fn point_of_view(&mut self, view: GeodeticPoint) {
            self.view = Some(view);
        }
    }

    struct StubPropagator(Option<(Vector3<f64>, Vector3<f64>)>);

    impl Propagator for StubPropagator {
        fn propagate(&self, _minutes_since_epoch: f64) -> Option<(Vector3<f64>, Vector3<f64>)> {
            self.0
        }
    }

    #[test]
    fn dropping_the_handle_cancels_the_callback() {
        let registry = Rc::new(CallbackRegistry::new());
        let scheduler: Rc<dyn FrameScheduler> = registry.clone();
        let handle = FrameHandle::new(scheduler.clone(), Box::new(|_| {}));
        assert_eq!(registry.len(), 1);
        let second = FrameHandle::new(scheduler, Box::new(|_| {}));
        assert_eq!(registry.len(), 2);
        drop(handle);
        assert_eq!(registry.len(), 1);
        drop(second);
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_drives_registered_callbacks() {
        let registry = Rc::new(CallbackRegistry::new());
        let scheduler: Rc<dyn FrameScheduler> = registry.clone();
        let counter = Rc::new(RefCell::new(0u32));
        let c = counter.clone();
        let _handle = FrameHandle::new(
            scheduler,
            Box::new(move |ticks| *c.borrow_mut() += ticks),
        );
        registry.tick(1);
        registry.tick(2);
        assert_eq!(*counter.borrow(), 3);
    }

    #[test]
    fn callback_may_cancel_itself_mid_frame() {
        let registry = Rc::new(CallbackRegistry::new());
        let scheduler: Rc<dyn FrameScheduler> = registry.clone();
        let slot: Rc<RefCell<Option<FrameHandle>>> = Rc::new(RefCell::new(None));
        let inner = slot.clone();
        let handle = FrameHandle::new(
            scheduler,
            Box::new(move |_| {
                inner.borrow_mut().take();
            }),
        );
        *slot.borrow_mut() = Some(handle);
        registry.tick(1);
        assert!(registry.is_empty());
        // the cancelled callback must stay gone on later frames
        registry.tick(1);
        assert!(registry.is_empty());
    }

    #[test]
    fn cancelling_a_peer_mid_frame_skips_it() {
        let registry = Rc::new(CallbackRegistry::new());
        let scheduler: Rc<dyn FrameScheduler> = registry.clone();
        let peer_slot: Rc<RefCell<Option<FrameHandle>>> = Rc::new(RefCell::new(None));
        let slot = peer_slot.clone();
        let _killer = FrameHandle::new(
            scheduler.clone(),
            Box::new(move |_| {
                slot.borrow_mut().take();
            }),
        );
        let fired = Rc::new(RefCell::new(false));
        let f = fired.clone();
        let peer = FrameHandle::new(scheduler, Box::new(move |_| *f.borrow_mut() = true));
        *peer_slot.borrow_mut() = Some(peer);
        registry.tick(1);
        assert!(!*fired.borrow());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn inertial_shuttle_orbits_at_the_configured_radius() {
        let host = TestHost::with_radius(100.0);
        let mut scene = ShuttleScene::new(ShuttlePreset::Orbiter.config(), &host);
        let frame = scene.advance(&host, 10);
        // radius_ratio 1.5 of a 100-unit globe, ignoring the vertical bob
        assert_relative_eq!(frame.position.xz().norm(), 150.0, epsilon = 1e-9);
        assert_relative_eq!(frame.heading.norm(), 1.0, epsilon = 1e-9);
        assert!(frame.camera.is_none());
    }

    #[test]
    fn follow_mode_produces_a_trailing_camera_pose() {
        let host = TestHost::with_radius(100.0);
        let mut scene = ShuttleScene::new(ShuttlePreset::Orbiter.config(), &host);
        scene.camera_mode = CameraMode::Follow;
        let frame = scene.advance(&host, 1);
        let camera = frame.camera.expect("follow mode sets a pose");
        assert_relative_eq!(camera.position, frame.position + scene.config.camera_offset);
        assert_relative_eq!(camera.look_at, Vector3::zeros());
    }

    #[test]
    fn ground_track_shuttle_stays_at_its_altitude() {
        let host = TestHost::with_radius(100.0);
        let mut scene = ShuttleScene::new(ShuttlePreset::GlbModel.config(), &host);
        for _ in 0..400 {
            let frame = scene.advance(&host, 1);
            // altitude_ratio 0.5 above a 100-unit globe
            assert_relative_eq!(frame.position.norm(), 150.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn catalog_initial_view_reaches_the_host_camera() {
        let mut host = TestHost::with_radius(100.0);
        SatelliteScene::<Sgp4Propagator>::push_initial_view(&mut host);
        let view = host.view.expect("viewpoint was pushed");
        assert_relative_eq!(view.lat_deg, 0.0);
        assert_relative_eq!(view.lon_deg, 0.0);
        assert_relative_eq!(view.altitude_ratio, 3.5);
    }

    #[test]
    fn pending_catalog_advances_time_but_renders_nothing() {
        let start = Utc.with_ymd_and_hms(2020, 7, 13, 12, 0, 0).unwrap();
        let mut scene = SatelliteScene::new(start);
        let points = scene.advance(10);
        assert!(points.is_empty());
        assert_eq!(scene.sim_time, start + chrono::Duration::seconds(30));
    }

    #[test]
    fn unparsable_catalog_marks_the_dataset_failed() {
        let start = Utc.with_ymd_and_hms(2020, 7, 13, 12, 0, 0).unwrap();
        let mut scene = SatelliteScene::new(start);
        scene.load_catalog("not a tle\nat all\n");
        assert!(matches!(scene.catalog, DatasetState::Failed(_)));
        assert!(scene.advance(1).is_empty());
    }

    #[test]
    fn stubbed_catalog_renders_per_tick_points() {
        let start = Utc.with_ymd_and_hms(2020, 7, 13, 12, 0, 0).unwrap();
        let mut scene = SatelliteScene::<StubPropagator> {
            catalog: DatasetState::Loaded(vec![SatelliteRecord {
                name: "STUB".to_string(),
                epoch_minutes: 0.0,
                propagator: StubPropagator(Some((
                    Vector3::new(7000.0, 0.0, 0.0),
                    Vector3::new(0.0, 7.5, 0.0),
                ))),
            }]),
            sim_time: start,
            time_step: chrono::Duration::seconds(3),
        };
        let points = scene.advance(1);
        assert_eq!(points.len(), 1);
        assert!(points[0].point.is_finite());
    }
}
