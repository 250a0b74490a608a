//! Two-Line Element (TLE) satellite catalog.
//!
//! Parses a raw TLE text blob into satellite records, runs a load-time
//! liveness propagation to permanently discard decayed or invalid elements,
//! and produces per-tick geodetic point sets for the render host. The
//! propagation engine sits behind the `Propagator` trait and is treated as
//! a black box: a miss (no position for a timestamp) is expected behavior,
//! not an error.

use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use sgp4::Constants;

use crate::geodetic::{eci_to_geodetic, GeodeticPoint};
use crate::time::greenwich_mean_sidereal_time;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CatalogSource {
    /// Space-track LEO sample bundled with globe.gl.
    LeoSample,
    Stations,
    Starlink,
    Brightest100,
}

impl CatalogSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::LeoSample => "LEO Sample",
            Self::Stations => "Stations",
            Self::Starlink => "Starlink",
            Self::Brightest100 => "100 Brightest",
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            Self::LeoSample => "https://unpkg.com/globe.gl/example/datasets/space-track-leo.txt",
            Self::Stations => "https://celestrak.org/NORAD/elements/gp.php?GROUP=stations&FORMAT=tle",
            Self::Starlink => "https://celestrak.org/NORAD/elements/gp.php?GROUP=starlink&FORMAT=tle",
            Self::Brightest100 => "https://celestrak.org/NORAD/elements/gp.php?GROUP=visual&FORMAT=tle",
        }
    }

    pub const ALL: [CatalogSource; 4] =
        [Self::LeoSample, Self::Stations, Self::Starlink, Self::Brightest100];
}

/// Black-box propagation collaborator. Position/velocity are km and km/s in
/// the inertial frame; `None` signals a propagation miss for that timestamp.
pub trait Propagator {
    fn propagate(&self, minutes_since_epoch: f64) -> Option<(Vector3<f64>, Vector3<f64>)>;
}

pub struct Sgp4Propagator {
    constants: Constants,
}

impl Sgp4Propagator {
    pub fn new(constants: Constants) -> Self {
        Self { constants }
    }
}

impl Propagator for Sgp4Propagator {
    fn propagate(&self, minutes_since_epoch: f64) -> Option<(Vector3<f64>, Vector3<f64>)> {
        let prediction = self
            .constants
            .propagate(sgp4::MinutesSinceEpoch(minutes_since_epoch))
            .ok()?;
        let position = Vector3::from(prediction.position);
        let velocity = Vector3::from(prediction.velocity);
        if !position.iter().all(|c| c.is_finite()) || !velocity.iter().all(|c| c.is_finite()) {
            return None;
        }
        Some((position, velocity))
    }
}

pub struct SatelliteRecord<P = Sgp4Propagator> {
    pub name: String,
    /// Element-set epoch as minutes since the Unix epoch.
    pub epoch_minutes: f64,
    pub propagator: P,
}

/// A satellite's renderable position for one frame, tied back to its record
/// by catalog index.
#[derive(Clone, Copy, Debug)]
pub struct SatellitePoint {
    pub index: usize,
    pub point: GeodeticPoint,
}

pub fn datetime_to_minutes(dt: &sgp4::chrono::NaiveDateTime) -> f64 {
    dt.and_utc().timestamp() as f64 / 60.0
}

/// Parses a TLE catalog: three lines per record (name, then lines starting
/// with "1" and "2"). Records with fewer than three lines or unparsable
/// elements are dropped silently; records whose liveness propagation at
/// `load_time` yields no position are discarded permanently.
pub fn parse_catalog(data: &str, load_time: DateTime<Utc>) -> Vec<SatelliteRecord> {
    let minutes_now = load_time.timestamp() as f64 / 60.0;
    let lines: Vec<&str> = data.lines().collect();
    let mut records = Vec::new();
    let mut dropped = 0usize;

    let mut i = 0;
    while i + 2 < lines.len() {
        let name_line = lines[i].trim();
        let line1 = lines[i + 1].trim();
        let line2 = lines[i + 2].trim();

        if !line1.starts_with('1') || !line2.starts_with('2') {
            i += 1;
            continue;
        }

        let tle = format!("{}\n{}\n{}", name_line, line1, line2);
        match sgp4::parse_3les(&tle) {
            Ok(elements_vec) => {
                for elements in elements_vec {
                    let Ok(constants) = Constants::from_elements(&elements) else {
                        dropped += 1;
                        continue;
                    };
                    let epoch_minutes = datetime_to_minutes(&elements.datetime);
                    let propagator = Sgp4Propagator::new(constants);
                    // Liveness check: a record that cannot be propagated now
                    // never will be.
                    if propagator.propagate(minutes_now - epoch_minutes).is_none() {
                        dropped += 1;
                        continue;
                    }
                    let raw_name = elements.object_name.unwrap_or_default();
                    let name = raw_name.strip_prefix("0 ").unwrap_or(&raw_name).to_string();
                    records.push(SatelliteRecord { name, epoch_minutes, propagator });
                }
            }
            Err(_) => {
                dropped += 1;
            }
        }

        i += 3;
    }

    log::info!("parsed TLE catalog: {} records, {} dropped", records.len(), dropped);
    records
}

/// Propagates every record to `time` and returns the frame's renderable
/// point set. Misses and non-finite results are omitted from the frame; the
/// records themselves stay in the catalog for future ticks.
pub fn catalog_positions<P: Propagator>(
    records: &[SatelliteRecord<P>],
    time: DateTime<Utc>,
) -> Vec<SatellitePoint> {
    let gmst = greenwich_mean_sidereal_time(time);
    let minutes_now = time.timestamp() as f64 / 60.0;
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let minutes_since_epoch = minutes_now - record.epoch_minutes;
            let (position_km, _velocity) = record.propagator.propagate(minutes_since_epoch)?;
            let point = eci_to_geodetic(&position_km, gmst, EARTH_RADIUS_KM);
            point.is_finite().then_some(SatellitePoint { index, point })
        })
        .collect()
}
