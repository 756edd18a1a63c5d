//! Shared fixtures for landscape integration tests

#![allow(dead_code)]

use std::sync::Arc;

use dynopt_landscape::{RotationPeakConfigBuilder, SeedProvider, SeedTable, Variant};
use ndarray::{Array1, Array2, array};

/// Route `log` output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The standard seed bank, shared like engines would share it
pub fn standard_seeds() -> Arc<dyn SeedProvider> {
    Arc::new(SeedTable::standard())
}

/// One peak at the origin of a 2-D space, h = 50, w = 5
pub fn single_peak_seeds() -> Arc<dyn SeedProvider> {
    Arc::new(SeedTable::new(vec![0.0], Array2::zeros((1, 2)), vec![50.0], vec![5.0]))
}

/// Builder preset for small, fast landscapes
pub fn small_config(variant: Variant, dim: usize, freq: usize) -> RotationPeakConfigBuilder {
    RotationPeakConfigBuilder::new()
        .dim(dim)
        .num_peaks(5)
        .freq(freq)
        .variant(variant)
        .seed(42)
}

pub fn origin(dim: usize) -> Array1<f64> {
    Array1::zeros(dim)
}

pub fn pair(a: f64, b: f64) -> Array1<f64> {
    array![a, b]
}

/// Euclidean distance between two rows
pub fn distance(positions: &Array2<f64>, i: usize, j: usize) -> f64 {
    (&positions.row(i) - &positions.row(j)).mapv(|v| v * v).sum().sqrt()
}
