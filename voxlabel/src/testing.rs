//! Shared test helpers.

use common::Buffer3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Install a fmt subscriber that routes through the test harness.
///
/// Safe to call from many tests; only the first call installs.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Synthetic CT-like volume: air (-1000 HU) blobs inside soft tissue (40 HU).
///
/// `air_fraction` is the probability of each voxel being air.
pub fn synthetic_ct(
    width: usize,
    height: usize,
    depth: usize,
    air_fraction: f64,
    seed: u64,
) -> Buffer3<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let voxels = (0..width * height * depth)
        .map(|_| {
            if rng.random_bool(air_fraction) {
                -1000.0
            } else {
                40.0
            }
        })
        .collect();
    Buffer3::new(width, height, depth, voxels)
}
