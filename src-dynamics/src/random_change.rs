use ndarray::{ArrayBase, ArrayViewMut1, DataMut, Ix1};
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};

use crate::clip_inplace::clip_inplace;
use crate::{Bounds, ChangeContext, ChangeDynamic, DynamicsError};

/// Gaussian step: u + N(0, severity), clipped
///
/// Unlike the small and large dynamics the step does not scale with the
/// width of the bounds.
pub fn random_change<S, R>(
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
    let normal = Normal::new(0.0, severity)?;
    for ui in u.iter_mut() {
        *ui += normal.sample(rng);
    }
    clip_inplace(u, bounds);
    Ok(())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomChange;

impl ChangeDynamic for RandomChange {
    fn name(&self) -> &'static str {
        "random"
    }

    fn apply(
        &self,
        mut u: ArrayViewMut1<'_, f64>,
        ctx: &ChangeContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<(), DynamicsError> {
        random_change(&mut u, ctx.bounds, ctx.severity, rng)
    }
}
