use std::f64::consts::PI;

use ndarray::{ArrayBase, ArrayViewMut1, DataMut, Ix1};
use rand::RngCore;

use crate::{Bounds, ChangeContext, ChangeDynamic, DynamicsError};

/// Number of changes after which a recurrent dynamic repeats itself
pub const PERIOD: usize = 12;

/// Value of element `i` at change index `t`
pub(crate) fn recurrent_value(bounds: Bounds, t: usize, phase: f64) -> f64 {
    let angle = 2.0 * PI * t as f64 / PERIOD as f64 + phase;
    bounds.min + bounds.range() * (angle.sin() + 1.0) / 2.0
}

pub(crate) fn check_phases(len: usize, phases: &[f64]) -> Result<(), DynamicsError> {
    if phases.len() < len {
        return Err(DynamicsError::MissingPhaseOffset { needed: len, available: phases.len() });
    }
    Ok(())
}

/// Periodic value: u_min + range * (sin(2 pi t / 12 + phi_i) + 1) / 2
///
/// The previous content of `u` is ignored; only its length matters. Element
/// `i` uses `phases[i]`.
pub fn recurrent_change<S>(
    u: &mut ArrayBase<S, Ix1>,
    bounds: Bounds,
    change_count: usize,
    phases: &[f64],
) -> Result<(), DynamicsError>
where
    S: DataMut<Elem = f64>,
{
    check_phases(u.len(), phases)?;
    for (ui, &phi) in u.iter_mut().zip(phases) {
        *ui = recurrent_value(bounds, change_count, phi);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecurrentChange;

impl ChangeDynamic for RecurrentChange {
    fn name(&self) -> &'static str {
        "recurrent"
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
        _rng: &mut dyn RngCore,
    ) -> Result<(), DynamicsError> {
        recurrent_change(&mut u, ctx.bounds, ctx.change_count, ctx.phases)
    }
}
