//! Which dynamic drives which landscape parameter
//!
//! A landscape variant is nothing more than a choice of dynamics for heights,
//! widths, positions and the rotation angle, plus the way the initial values
//! are produced. `LandscapeStrategies` bundles these choices.

use std::f64::consts::PI;

use dynopt_dynamics::{Bounds, ChangeDynamic};
use serde::{Deserialize, Serialize};

use crate::dimension::DimensionDrift;

/// Angle range of the small, large and random landscapes
pub const FULL_TURN: Bounds = Bounds { min: -PI, max: PI };

/// Angle range of the recurrent landscapes
pub const RECURRENT_ANGLE: Bounds = Bounds { min: 0.0, max: PI / 6.0 };

/// Dynamic applied to the rotation angle
#[derive(Debug)]
pub struct AngleDynamic {
    pub dynamic: Box<dyn ChangeDynamic>,
    pub bounds: Bounds,
    pub severity: f64,
}

/// How peak positions move on a change
#[derive(Debug)]
pub enum PositionDynamic {
    /// Rotate the whole field by the current angle in random planes
    Rotation,
    /// Map each peak position through a dynamic, using the search bounds
    Map { dynamic: Box<dyn ChangeDynamic>, severity: f64 },
}

/// How heights, widths and the angle get their first values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Initializer {
    /// Configured initial height and width, angle uniform in the angle bounds
    Uniform,
    /// Heights and widths read from the seed bank
    Seeded,
    /// Height and width dynamics evaluated at change 0, angle dynamic at
    /// change 1 starting from zero
    Phased,
}

#[derive(Debug)]
pub struct LandscapeStrategies {
    pub height: Box<dyn ChangeDynamic>,
    pub width: Box<dyn ChangeDynamic>,
    /// `None` keeps the angle fixed
    pub angle: Option<AngleDynamic>,
    pub position: PositionDynamic,
    pub initializer: Initializer,
    /// `Some` makes the dimensionality drift on every change
    pub drift: Option<DimensionDrift>,
}

impl LandscapeStrategies {
    /// True when any bound dynamic reads phase offsets
    pub fn uses_phase_offsets(&self) -> bool {
        self.height.uses_phase_offsets()
            || self.width.uses_phase_offsets()
            || self.angle.as_ref().is_some_and(|a| a.dynamic.uses_phase_offsets())
            || self.position_uses_phase_offsets()
    }

    pub(crate) fn position_uses_phase_offsets(&self) -> bool {
        matches!(&self.position, PositionDynamic::Map { dynamic, .. } if dynamic.uses_phase_offsets())
    }

    /// Largest dimensionality the landscape can reach
    pub fn max_dim(&self, dim: usize) -> usize {
        self.drift.map_or(dim, |d| d.max_dim.max(dim))
    }
}
