use ndarray::{ArrayBase, ArrayViewMut1, DataMut, Ix1};
use rand::{Rng, RngCore};

use crate::clip_inplace::clip_inplace;
use crate::{Bounds, ChangeContext, ChangeDynamic, DynamicsError};

const ALPHA: f64 = 0.04;

/// Small step: u + alpha * range * r * severity with r ~ U(-1, 1), clipped
pub fn small_change<S, R>(
    u: &mut ArrayBase<S, Ix1>,
    bounds: Bounds,
    severity: f64,
    rng: &mut R,
) -> Result<(), DynamicsError>
where
    S: DataMut<Elem = f64>,
    R: Rng + ?Sized,
{
    crate::check_severity(severity)?;
    let range = bounds.range();
    for ui in u.iter_mut() {
        let r: f64 = rng.random_range(-1.0..1.0);
        *ui += ALPHA * range * r * severity;
    }
    clip_inplace(u, bounds);
    Ok(())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SmallChange;

impl ChangeDynamic for SmallChange {
    fn name(&self) -> &'static str {
        "small"
    }

    fn apply(
        &self,
        mut u: ArrayViewMut1<'_, f64>,
        ctx: &ChangeContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<(), DynamicsError> {
        small_change(&mut u, ctx.bounds, ctx.severity, rng)
    }
}
