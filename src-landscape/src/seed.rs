//! Deterministic seed data shared by landscapes
//!
//! Reproducible trajectories need the same precomputed arrays everywhere:
//! per-element phase offsets for the recurrent dynamics, a bank of candidate
//! peak positions (initial positions and dimension growth), and seed heights
//! and widths for the chaotic landscape. Engines only see the `SeedProvider`
//! trait, so the storage behind it is up to the caller.

use std::f64::consts::PI;
use std::fmt;
use std::io::{Read, Write};

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::LandscapeError;

/// Read-only lookup of the deterministic arrays, by element / peak / dimension
pub trait SeedProvider: fmt::Debug + Send + Sync {
    fn phase_offset(&self, index: usize) -> Option<f64>;
    fn seed_position(&self, peak: usize, dim: usize) -> Option<f64>;
    fn seed_height(&self, peak: usize) -> Option<f64>;
    fn seed_width(&self, peak: usize) -> Option<f64>;
}

/// In-memory seed bank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedTable {
    pub phases: Vec<f64>,
    /// peaks x dimensions
    pub positions: Array2<f64>,
    pub heights: Vec<f64>,
    pub widths: Vec<f64>,
}

/// Shape and ranges used by `SeedTable::generate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedTableSpec {
    pub num_peaks: usize,
    pub dim: usize,
    pub num_phases: usize,
    pub bounds: (f64, f64),
    pub height_bounds: (f64, f64),
    pub width_bounds: (f64, f64),
}

impl Default for SeedTableSpec {
    fn default() -> Self {
        // 20 columns cover the dimension-variable landscape (up to 15 + 1)
        Self {
            num_peaks: 50,
            dim: 20,
            num_phases: 50,
            bounds: (-5.0, 5.0),
            height_bounds: (10.0, 100.0),
            width_bounds: (1.0, 10.0),
        }
    }
}

/// Seed used by `SeedTable::standard`
pub const STANDARD_SEED: u64 = 20_220_901;

impl SeedTable {
    pub fn new(phases: Vec<f64>, positions: Array2<f64>, heights: Vec<f64>, widths: Vec<f64>) -> Self {
        Self { phases, positions, heights, widths }
    }

    /// Deterministically generate a seed bank from `seed`
    pub fn generate(spec: &SeedTableSpec, seed: u64) -> Result<Self, LandscapeError> {
        for (name, (lo, hi)) in [
            ("bounds", spec.bounds),
            ("height_bounds", spec.height_bounds),
            ("width_bounds", spec.width_bounds),
        ] {
            if !(lo < hi) || !lo.is_finite() || !hi.is_finite() {
                return Err(LandscapeError::InvalidConfig(format!(
                    "seed table {} [{}, {}] is empty",
                    name, lo, hi
                )));
            }
        }
        Ok(Self::fill(spec, &mut StdRng::seed_from_u64(seed)))
    }

    /// The default bank: `SeedTableSpec::default()` generated from `STANDARD_SEED`
    pub fn standard() -> Self {
        Self::fill(&SeedTableSpec::default(), &mut StdRng::seed_from_u64(STANDARD_SEED))
    }

    fn fill<R: Rng + ?Sized>(spec: &SeedTableSpec, rng: &mut R) -> Self {
        let phases = (0..spec.num_phases).map(|_| rng.random_range(0.0..2.0 * PI)).collect();
        let (lo, hi) = spec.bounds;
        let positions = Array2::from_shape_fn((spec.num_peaks, spec.dim), |_| rng.random_range(lo..hi));
        let (h_lo, h_hi) = spec.height_bounds;
        let heights = (0..spec.num_peaks).map(|_| rng.random_range(h_lo..h_hi)).collect();
        let (w_lo, w_hi) = spec.width_bounds;
        let widths = (0..spec.num_peaks).map(|_| rng.random_range(w_lo..w_hi)).collect();
        Self { phases, positions, heights, widths }
    }

    pub fn num_peaks(&self) -> usize {
        self.positions.nrows()
    }

    pub fn dim(&self) -> usize {
        self.positions.ncols()
    }

    pub fn from_json_str(s: &str) -> Result<Self, LandscapeError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LandscapeError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json_string(&self) -> Result<String, LandscapeError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), LandscapeError> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }
}

impl SeedProvider for SeedTable {
    fn phase_offset(&self, index: usize) -> Option<f64> {
        self.phases.get(index).copied()
    }

    fn seed_position(&self, peak: usize, dim: usize) -> Option<f64> {
        self.positions.get((peak, dim)).copied()
    }

    fn seed_height(&self, peak: usize) -> Option<f64> {
        self.heights.get(peak).copied()
    }

    fn seed_width(&self, peak: usize) -> Option<f64> {
        self.widths.get(peak).copied()
    }
}

pub(crate) fn load_phases(seeds: &dyn SeedProvider, n: usize) -> Result<Vec<f64>, LandscapeError> {
    (0..n)
        .map(|i| {
            seeds.phase_offset(i).ok_or_else(|| {
                LandscapeError::MissingSeedData(format!("phase offset {} of {}", i, n))
            })
        })
        .collect()
}

pub(crate) fn load_positions(
    seeds: &dyn SeedProvider,
    num_peaks: usize,
    dim: usize,
) -> Result<Array2<f64>, LandscapeError> {
    let mut positions = Array2::zeros((num_peaks, dim));
    for ((p, d), v) in positions.indexed_iter_mut() {
        *v = seeds.seed_position(p, d).ok_or_else(|| {
            LandscapeError::MissingSeedData(format!(
                "position of peak {} at dimension {} ({} peaks x {} dims requested)",
                p, d, num_peaks, dim
            ))
        })?;
    }
    Ok(positions)
}

/// One seed column, used when the landscape grows a dimension
pub(crate) fn load_column(
    seeds: &dyn SeedProvider,
    num_peaks: usize,
    dim: usize,
) -> Result<Array1<f64>, LandscapeError> {
    (0..num_peaks)
        .map(|p| {
            seeds.seed_position(p, dim).ok_or_else(|| {
                LandscapeError::MissingSeedData(format!("position of peak {} at dimension {}", p, dim))
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Array1::from)
}

pub(crate) fn load_heights(seeds: &dyn SeedProvider, n: usize) -> Result<Array1<f64>, LandscapeError> {
    (0..n)
        .map(|p| {
            seeds
                .seed_height(p)
                .ok_or_else(|| LandscapeError::MissingSeedData(format!("height of peak {} of {}", p, n)))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Array1::from)
}

pub(crate) fn load_widths(seeds: &dyn SeedProvider, n: usize) -> Result<Array1<f64>, LandscapeError> {
    (0..n)
        .map(|p| {
            seeds
                .seed_width(p)
                .ok_or_else(|| LandscapeError::MissingSeedData(format!("width of peak {} of {}", p, n)))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Array1::from)
}
