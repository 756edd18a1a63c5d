//! Change dynamics for dynamic optimization benchmarks
//!
//! Each dynamic maps the current value of a landscape parameter (peak heights,
//! peak widths, rotation angle, raw peak positions) to its next value when the
//! landscape changes. All values are updated in place and kept inside scalar
//! bounds applied element-wise.
//!
//! Supported dynamics:
//! - `small`: bounded uniform perturbation proportional to severity
//! - `large`: fixed-magnitude jump plus a smaller uniform term
//! - `random`: Gaussian perturbation with standard deviation = severity
//! - `chaotic`: logistic map on the normalized value (deterministic)
//! - `recurrent`: periodic in the change index, period 12
//! - `noisy_recurrent`: recurrent plus Gaussian jitter
//!
//! The first four are path-dependent (derived from the previous value), the
//! recurrent ones are path-independent (recomputed from the change index).

use std::fmt;
use std::str::FromStr;

use ndarray::ArrayViewMut1;
use rand::RngCore;
use serde::{Deserialize, Serialize};

pub mod clip_inplace;

pub mod chaotic_change;
pub mod large_change;
pub mod noisy_recurrent_change;
pub mod random_change;
pub mod recurrent_change;
pub mod small_change;


pub use chaotic_change::{ChaoticChange, chaotic_change};
pub use clip_inplace::clip_inplace;
pub use large_change::{LargeChange, large_change};
pub use noisy_recurrent_change::{NoisyRecurrentChange, noisy_recurrent_change};
pub use random_change::{RandomChange, random_change};
pub use recurrent_change::{RecurrentChange, recurrent_change};
pub use small_change::{SmallChange, small_change};

/// Errors raised by the change dynamics
#[derive(Debug, thiserror::Error)]
pub enum DynamicsError {
	#[error("invalid bounds [{min}, {max}]: expected finite values with min < max")]
	InvalidBounds { min: f64, max: f64 },

	#[error("invalid severity {0}: expected a finite, non-negative value")]
	InvalidSeverity(f64),

	#[error("phase offsets too short: need {needed}, got {available}")]
	MissingPhaseOffset { needed: usize, available: usize },

	#[error("unknown dynamic: {0}")]
	UnknownDynamic(String),

	#[error("normal distribution: {0}")]
	Distribution(#[from] rand_distr::NormalError),
}

/// Closed interval applied to every element of a parameter vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
	pub min: f64,
	pub max: f64,
}

impl Bounds {
	/// Create bounds, rejecting non-finite values and empty ranges
	pub fn new(min: f64, max: f64) -> Result<Self, DynamicsError> {
		if !min.is_finite() || !max.is_finite() || max <= min {
			return Err(DynamicsError::InvalidBounds { min, max });
		}
		Ok(Self { min, max })
	}

	/// Width of the interval
	pub fn range(&self) -> f64 {
		self.max - self.min
	}

	pub fn contains(&self, v: f64) -> bool {
		v >= self.min && v <= self.max
	}

	/// Map `v` into [0, 1] relative to the bounds
	pub fn normalize(&self, v: f64) -> f64 {
		(v - self.min) / self.range()
	}

	/// Inverse of `normalize`
	pub fn denormalize(&self, t: f64) -> f64 {
		self.min + t * self.range()
	}
}

/// Everything a dynamic may need besides the value itself and the RNG
#[derive(Debug, Clone, Copy)]
pub struct ChangeContext<'a> {
	/// Bounds applied to every element
	pub bounds: Bounds,
	/// Step magnitude; ignored by chaotic and recurrent dynamics
	pub severity: f64,
	/// Number of changes applied so far (the recurrent time index)
	pub change_count: usize,
	/// Per-element phase offsets for recurrent dynamics
	pub phases: &'a [f64],
}

impl<'a> ChangeContext<'a> {
	pub fn new(bounds: Bounds, severity: f64, change_count: usize, phases: &'a [f64]) -> Self {
		Self { bounds, severity, change_count, phases }
	}
}

/// A rule governing how one landscape parameter evolves across changes
///
/// Implementations update `u` in place. Adding a new dynamic only requires
/// implementing this trait.
pub trait ChangeDynamic: fmt::Debug + Send + Sync {
	/// Short identifier used in logs
	fn name(&self) -> &'static str;

	/// True when the next value depends only on the change index, not on `u`
	fn is_path_independent(&self) -> bool {
		false
	}

	/// True when `ChangeContext::phases` must cover every element of `u`
	fn uses_phase_offsets(&self) -> bool {
		false
	}

	fn apply(
		&self,
		u: ArrayViewMut1<'_, f64>,
		ctx: &ChangeContext<'_>,
		rng: &mut dyn RngCore,
	) -> Result<(), DynamicsError>;
}

/// Selector for the built-in dynamics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DynamicKind {
	Small,
	Large,
	Random,
	Chaotic,
	Recurrent,
	NoisyRecurrent,
}

impl DynamicKind {
	pub const ALL: [DynamicKind; 6] = [
		DynamicKind::Small,
		DynamicKind::Large,
		DynamicKind::Random,
		DynamicKind::Chaotic,
		DynamicKind::Recurrent,
		DynamicKind::NoisyRecurrent,
	];

	pub fn name(self) -> &'static str {
		match self {
			DynamicKind::Small => "small",
			DynamicKind::Large => "large",
			DynamicKind::Random => "random",
			DynamicKind::Chaotic => "chaotic",
			DynamicKind::Recurrent => "recurrent",
			DynamicKind::NoisyRecurrent => "noisy_recurrent",
		}
	}

	/// Build the capability implementing this dynamic
	pub fn build(self) -> Box<dyn ChangeDynamic> {
		match self {
			DynamicKind::Small => Box::new(SmallChange),
			DynamicKind::Large => Box::new(LargeChange),
			DynamicKind::Random => Box::new(RandomChange),
			DynamicKind::Chaotic => Box::new(ChaoticChange),
			DynamicKind::Recurrent => Box::new(RecurrentChange),
			DynamicKind::NoisyRecurrent => Box::new(NoisyRecurrentChange),
		}
	}
}

impl fmt::Display for DynamicKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for DynamicKind {
	type Err = DynamicsError;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let t = s.to_lowercase();
		match t.as_str() {
			"small" | "small_change" => Ok(DynamicKind::Small),
			"large" | "large_change" => Ok(DynamicKind::Large),
			"random" | "random_change" => Ok(DynamicKind::Random),
			"chaotic" | "chaotic_change" => Ok(DynamicKind::Chaotic),
			"recurrent" | "recurrent_change" => Ok(DynamicKind::Recurrent),
			"noisy_recurrent" | "noisy-recurrent" | "noisyrecurrent" | "noisy_recurrent_change" => {
				Ok(DynamicKind::NoisyRecurrent)
			}
			_ => Err(DynamicsError::UnknownDynamic(s.to_string())),
		}
	}
}

pub(crate) fn check_severity(severity: f64) -> Result<(), DynamicsError> {
	if !severity.is_finite() || severity < 0.0 {
		return Err(DynamicsError::InvalidSeverity(severity));
	}
	Ok(())
}
