//! Dynamic rotation peak benchmark
//!
//! A landscape of N inverted cones ("peaks") in D dimensions whose heights,
//! widths and positions change every `frequency` evaluations. Positions
//! rotate rigidly in random planes; heights and widths follow one of the
//! dynamics of [`dynopt_dynamics`]. Seven variants are provided, one of which
//! also lets the dimensionality drift between 5 and 15.
//!
//! Seed data (initial positions, phase offsets, chaotic heights and widths) is
//! injected through [`SeedProvider`]; [`SeedTable`] is an in-memory provider
//! with a deterministic generator.

pub mod config;
pub mod dimension;
pub mod engine;
pub mod error;
pub mod field;
pub mod rotation;
pub mod seed;
pub mod strategy;
pub mod variant;

pub use config::{RotationPeakConfig, RotationPeakConfigBuilder};
pub use dimension::{DimensionDrift, DimensionShift, reshape_query};
pub use engine::{ChangeCounters, LandscapeState, RotationPeak};
pub use error::LandscapeError;
pub use field::{Peak, PeakField};
pub use rotation::{pair_permutation, rotate_positions, rotation_matrix};
pub use seed::{STANDARD_SEED, SeedProvider, SeedTable, SeedTableSpec};
pub use strategy::{AngleDynamic, Initializer, LandscapeStrategies, PositionDynamic};
pub use variant::Variant;
