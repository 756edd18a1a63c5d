use ndarray::{ArrayBase, ArrayViewMut1, DataMut, Ix1};
use rand::{Rng, RngCore};

use crate::clip_inplace::clip_inplace;
use crate::{Bounds, ChangeContext, ChangeDynamic, DynamicsError};

const ALPHA: f64 = 0.04;
const ALPHA_MAX: f64 = 0.1;

/// Large step: a jump of `alpha * range` in the direction of r plus a
/// continuous `(alpha_max - alpha) * r` term, scaled by severity and clipped.
pub fn large_change<S, R>(
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
        // sign(0) == 0, as opposed to f64::signum
        let sign = if r > 0.0 {
            1.0
        } else if r < 0.0 {
            -1.0
        } else {
            0.0
        };
        *ui += range * (ALPHA * sign + (ALPHA_MAX - ALPHA) * r) * severity;
    }
    clip_inplace(u, bounds);
    Ok(())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LargeChange;

impl ChangeDynamic for LargeChange {
    fn name(&self) -> &'static str {
        "large"
    }

    fn apply(
        &self,
        mut u: ArrayViewMut1<'_, f64>,
        ctx: &ChangeContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<(), DynamicsError> {
        large_change(&mut u, ctx.bounds, ctx.severity, rng)
    }
}
