//! Dimension drift: the landscape gains or loses one dimension per change,
//! bouncing between a lower and an upper limit.

use dynopt_dynamics::Bounds;
use ndarray::{Array1, s};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::LandscapeError;
use crate::field::PeakField;
use crate::seed::{SeedProvider, load_column};

/// Direction of the last dimension change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionShift {
    Grew,
    Shrunk,
}

/// Limits of the dimension-variable landscape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionDrift {
    pub min_dim: usize,
    pub max_dim: usize,
    /// +1 or -1
    pub initial_step: isize,
}

impl Default for DimensionDrift {
    fn default() -> Self {
        Self { min_dim: 5, max_dim: 15, initial_step: 1 }
    }
}

impl DimensionDrift {
    pub fn validate(&self, dim: usize) -> Result<(), LandscapeError> {
        if self.min_dim < 2 || self.min_dim >= self.max_dim {
            return Err(LandscapeError::InvalidConfig(format!(
                "dimension drift limits [{}, {}] must satisfy 2 <= min < max",
                self.min_dim, self.max_dim
            )));
        }
        if self.initial_step.abs() != 1 {
            return Err(LandscapeError::InvalidConfig(format!(
                "dimension step must be +1 or -1, got {}",
                self.initial_step
            )));
        }
        if dim < self.min_dim || dim > self.max_dim {
            return Err(LandscapeError::InvalidConfig(format!(
                "dimension {} outside drift limits [{}, {}]",
                dim, self.min_dim, self.max_dim
            )));
        }
        Ok(())
    }

    /// Step to take from `dim`: `step` unless that leaves the limits, then reversed
    pub fn next_step(&self, dim: usize, step: isize) -> isize {
        let target = dim as isize + step;
        if target > self.max_dim as isize || target < self.min_dim as isize {
            -step
        } else {
            step
        }
    }

    /// Resize every peak by one dimension and update `step`
    ///
    /// Growth reads the seed column whose index is the new dimensionality.
    pub(crate) fn apply(
        &self,
        field: &mut PeakField,
        step: &mut isize,
        seeds: &dyn SeedProvider,
    ) -> Result<DimensionShift, LandscapeError> {
        *step = self.next_step(field.dim(), *step);
        if *step > 0 {
            let new_dim = field.dim() + 1;
            let column = load_column(seeds, field.num_peaks(), new_dim)?;
            field.grow(column.view())?;
            Ok(DimensionShift::Grew)
        } else {
            field.shrink()?;
            Ok(DimensionShift::Shrunk)
        }
    }
}

/// Bring a query point to the landscape's new dimensionality
///
/// Growth appends one coordinate drawn uniformly from `bounds`; shrinking
/// drops the trailing coordinate.
pub fn reshape_query<R: Rng + ?Sized>(
    x: Array1<f64>,
    shift: DimensionShift,
    bounds: Bounds,
    rng: &mut R,
) -> Array1<f64> {
    match shift {
        DimensionShift::Grew => {
            let extra: f64 = rng.random_range(bounds.min..bounds.max);
            x.iter().copied().chain(std::iter::once(extra)).collect()
        }
        DimensionShift::Shrunk => {
            let n = x.len().saturating_sub(1);
            x.slice(s![..n]).to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_next_step_bounces() {
        let drift = DimensionDrift::default();
        assert_eq!(drift.next_step(10, 1), 1);
        assert_eq!(drift.next_step(15, 1), -1);
        assert_eq!(drift.next_step(5, -1), 1);
        assert_eq!(drift.next_step(6, -1), -1);
    }

    #[test]
    fn test_validate() {
        let drift = DimensionDrift::default();
        assert!(drift.validate(10).is_ok());
        assert!(drift.validate(4).is_err());
        assert!(drift.validate(16).is_err());
        assert!(DimensionDrift { initial_step: 2, ..drift }.validate(10).is_err());
        assert!(DimensionDrift { min_dim: 15, max_dim: 5, initial_step: 1 }.validate(10).is_err());
    }

    #[test]
    fn test_reshape_query() {
        let bounds = Bounds::new(-5.0, 5.0).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let x = array![1.0, 2.0, 3.0];
        let grown = reshape_query(x.clone(), DimensionShift::Grew, bounds, &mut rng);
        assert_eq!(grown.len(), 4);
        assert_eq!(grown.slice(s![..3]), x);
        assert!(bounds.contains(grown[3]));
        let shrunk = reshape_query(x, DimensionShift::Shrunk, bounds, &mut rng);
        assert_eq!(shrunk, array![1.0, 2.0]);
    }
}
