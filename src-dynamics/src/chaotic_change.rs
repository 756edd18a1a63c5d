use ndarray::{ArrayBase, ArrayViewMut1, DataMut, Dimension};
use rand::RngCore;

use crate::{Bounds, ChangeContext, ChangeDynamic, DynamicsError};

/// Logistic map parameter
pub const LOGISTIC_A: f64 = 3.67;

/// Non-trivial fixed point of the logistic map, in normalized coordinates
pub fn logistic_fixed_point() -> f64 {
    1.0 - 1.0 / LOGISTIC_A
}

/// Chaotic step: normalize into [0, 1], apply x' = A x (1 - x), map back.
///
/// Deterministic. No clipping: for A < 4 the map keeps [0, 1] inside itself.
/// Works on any array shape, so raw peak positions can be mapped directly.
pub fn chaotic_change<S, D>(u: &mut ArrayBase<S, D>, bounds: Bounds)
where
    S: DataMut<Elem = f64>,
    D: Dimension,
{
    u.mapv_inplace(|ui| {
        let x = bounds.normalize(ui);
        bounds.denormalize(LOGISTIC_A * x * (1.0 - x))
    });
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChaoticChange;

impl ChangeDynamic for ChaoticChange {
    fn name(&self) -> &'static str {
        "chaotic"
    }

    fn apply(
        &self,
        mut u: ArrayViewMut1<'_, f64>,
        ctx: &ChangeContext<'_>,
        _rng: &mut dyn RngCore,
    ) -> Result<(), DynamicsError> {
        chaotic_change(&mut u, ctx.bounds);
        Ok(())
    }
}
