use dynopt_dynamics::Bounds;
use serde::{Deserialize, Serialize};

use crate::error::LandscapeError;
use crate::variant::Variant;

/// Evaluations between changes per dimension when no frequency is set
pub const EVALS_PER_DIM: usize = 10_000;

/// Constants of one landscape instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationPeakConfig {
    /// Nominal dimensionality (starting value for dimension-variable landscapes)
    pub dim: usize,
    pub num_peaks: usize,
    /// Search bounds applied to every coordinate
    pub bounds: (f64, f64),
    /// Evaluations between changes; `None` means `10000 * dim`
    pub freq: Option<usize>,
    /// Expected number of changes over a run; never stops the engine
    pub num_change: usize,
    pub initial_height: f64,
    pub h_min: f64,
    pub h_max: f64,
    pub h_severity: f64,
    pub initial_width: f64,
    pub w_min: f64,
    pub w_max: f64,
    pub w_severity: f64,
    pub variant: Variant,
    /// Seed of the engine's RNG; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for RotationPeakConfig {
    fn default() -> Self {
        Self {
            dim: 10,
            num_peaks: 10,
            bounds: (-5.0, 5.0),
            freq: None,
            num_change: 60,
            initial_height: 50.0,
            h_min: 10.0,
            h_max: 100.0,
            h_severity: 5.0,
            initial_width: 5.0,
            w_min: 1.0,
            w_max: 10.0,
            w_severity: 0.5,
            variant: Variant::Small,
            seed: None,
        }
    }
}

impl RotationPeakConfig {
    pub fn from_json_str(s: &str) -> Result<Self, LandscapeError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Evaluations between two changes
    pub fn frequency(&self) -> usize {
        self.freq.unwrap_or(EVALS_PER_DIM * self.dim)
    }

    pub fn search_bounds(&self) -> Result<Bounds, LandscapeError> {
        checked_bounds("search", self.bounds)
    }

    pub fn height_bounds(&self) -> Result<Bounds, LandscapeError> {
        checked_bounds("height", (self.h_min, self.h_max))
    }

    pub fn width_bounds(&self) -> Result<Bounds, LandscapeError> {
        checked_bounds("width", (self.w_min, self.w_max))
    }

    pub fn validate(&self) -> Result<(), LandscapeError> {
        if self.dim == 0 {
            return Err(LandscapeError::InvalidConfig("dim must be positive".to_string()));
        }
        if self.num_peaks == 0 {
            return Err(LandscapeError::InvalidConfig("num_peaks must be positive".to_string()));
        }
        if self.freq == Some(0) {
            return Err(LandscapeError::InvalidConfig("freq must be positive".to_string()));
        }
        self.search_bounds()?;
        let hb = self.height_bounds()?;
        let wb = self.width_bounds()?;
        if self.w_min <= 0.0 {
            return Err(LandscapeError::InvalidConfig(format!(
                "w_min must be positive, got {}",
                self.w_min
            )));
        }
        for (name, v) in [("h_severity", self.h_severity), ("w_severity", self.w_severity)] {
            if !v.is_finite() || v < 0.0 {
                return Err(LandscapeError::InvalidConfig(format!(
                    "{} must be non-negative, got {}",
                    name, v
                )));
            }
        }
        if !hb.contains(self.initial_height) {
            return Err(LandscapeError::InvalidConfig(format!(
                "initial_height {} outside [{}, {}]",
                self.initial_height, hb.min, hb.max
            )));
        }
        if !wb.contains(self.initial_width) {
            return Err(LandscapeError::InvalidConfig(format!(
                "initial_width {} outside [{}, {}]",
                self.initial_width, wb.min, wb.max
            )));
        }
        Ok(())
    }
}

fn checked_bounds(name: &str, (min, max): (f64, f64)) -> Result<Bounds, LandscapeError> {
    Bounds::new(min, max).map_err(|_| {
        LandscapeError::InvalidConfig(format!("{} bounds [{}, {}] are empty or not finite", name, min, max))
    })
}

/// Fluent builder for [`RotationPeakConfig`]
#[derive(Debug, Clone, Default)]
pub struct RotationPeakConfigBuilder {
    cfg: RotationPeakConfig,
}

impl RotationPeakConfigBuilder {
    pub fn new() -> Self {
        Self { cfg: RotationPeakConfig::default() }
    }
    pub fn dim(mut self, v: usize) -> Self {
        self.cfg.dim = v;
        self
    }
    pub fn num_peaks(mut self, v: usize) -> Self {
        self.cfg.num_peaks = v;
        self
    }
    pub fn bounds(mut self, min: f64, max: f64) -> Self {
        self.cfg.bounds = (min, max);
        self
    }
    pub fn freq(mut self, v: usize) -> Self {
        self.cfg.freq = Some(v);
        self
    }
    pub fn num_change(mut self, v: usize) -> Self {
        self.cfg.num_change = v;
        self
    }
    pub fn initial_height(mut self, v: f64) -> Self {
        self.cfg.initial_height = v;
        self
    }
    pub fn height_range(mut self, min: f64, max: f64) -> Self {
        self.cfg.h_min = min;
        self.cfg.h_max = max;
        self
    }
    pub fn h_severity(mut self, v: f64) -> Self {
        self.cfg.h_severity = v;
        self
    }
    pub fn initial_width(mut self, v: f64) -> Self {
        self.cfg.initial_width = v;
        self
    }
    pub fn width_range(mut self, min: f64, max: f64) -> Self {
        self.cfg.w_min = min;
        self.cfg.w_max = max;
        self
    }
    pub fn w_severity(mut self, v: f64) -> Self {
        self.cfg.w_severity = v;
        self
    }
    pub fn variant(mut self, v: Variant) -> Self {
        self.cfg.variant = v;
        self
    }
    pub fn seed(mut self, v: u64) -> Self {
        self.cfg.seed = Some(v);
        self
    }
    pub fn build(self) -> RotationPeakConfig {
        self.cfg
    }
}
