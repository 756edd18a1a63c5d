use ndarray::{ArrayBase, ArrayViewMut1, DataMut, Ix1};
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};

use crate::clip_inplace::clip_inplace;
use crate::recurrent_change::{check_phases, recurrent_value};
use crate::{Bounds, ChangeContext, ChangeDynamic, DynamicsError};

/// Standard deviation of the jitter added on top of the periodic value
pub const NOISE_SEVERITY: f64 = 0.8;

/// Recurrent value plus N(0, 0.8) jitter, clipped
pub fn noisy_recurrent_change<S, R>(
    u: &mut ArrayBase<S, Ix1>,
    bounds: Bounds,
    change_count: usize,
    phases: &[f64],
    rng: &mut R,
) -> Result<(), DynamicsError>
where
    S: DataMut<Elem = f64>,
    R: Rng + ?Sized,
{
    check_phases(u.len(), phases)?;
    let noise = Normal::new(0.0, NOISE_SEVERITY)?;
    for (ui, &phi) in u.iter_mut().zip(phases) {
        *ui = recurrent_value(bounds, change_count, phi) + noise.sample(rng);
    }
    clip_inplace(u, bounds);
    Ok(())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoisyRecurrentChange;

impl ChangeDynamic for NoisyRecurrentChange {
    fn name(&self) -> &'static str {
        "noisy_recurrent"
    }

    fn is_path_independent(&self) -> bool {
        true
    }

    fn uses_phase_offsets(&self) -> bool {
        true
    }

    fn apply(
        &self,
        mut u: ArrayViewMut1<'_, f64>,
        ctx: &ChangeContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<(), DynamicsError> {
        noisy_recurrent_change(&mut u, ctx.bounds, ctx.change_count, ctx.phases, rng)
    }
}
