//! Synthetic arc overlay generation.
//!
//! Produces a batch of random great-circle arcs with per-arc color pairs and
//! dash animation parameters, matching the demo overlay that ships with the
//! globe widgets.

use rand::Rng;

pub const ARC_COLORS: [&str; 4] = ["red", "white", "blue", "green"];
pub const DEFAULT_ARC_COUNT: usize = 20;

#[derive(Clone, Debug)]
pub struct SyntheticArc {
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    pub end_lon: f64,
    /// Gradient endpoint colors.
    pub colors: [&'static str; 2],
    /// Dash length and gap as fractions of the arc length.
    pub dash_length: f64,
    pub dash_gap: f64,
    pub dash_animate_ms: f64,
}

pub fn random_arcs<R: Rng>(count: usize, rng: &mut R) -> Vec<SyntheticArc> {
    (0..count)
        .map(|_| SyntheticArc {
            start_lat: (rng.gen::<f64>() - 0.5) * 180.0,
            start_lon: (rng.gen::<f64>() - 0.5) * 360.0,
            end_lat: (rng.gen::<f64>() - 0.5) * 180.0,
            end_lon: (rng.gen::<f64>() - 0.5) * 360.0,
            colors: [
                ARC_COLORS[rng.gen_range(0..ARC_COLORS.len())],
                ARC_COLORS[rng.gen_range(0..ARC_COLORS.len())],
            ],
            dash_length: rng.gen::<f64>(),
            dash_gap: rng.gen::<f64>(),
            dash_animate_ms: rng.gen::<f64>() * 4000.0 + 500.0,
        })
        .collect()
}
