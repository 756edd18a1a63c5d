//! The benchmark engine: owns a peak field, counts evaluations and changes
//! the landscape every `frequency` evaluations.

use std::sync::Arc;

use dynopt_dynamics::{Bounds, ChangeContext};
use log::{debug, trace, warn};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::RotationPeakConfig;
use crate::dimension::{DimensionShift, reshape_query};
use crate::error::LandscapeError;
use crate::field::PeakField;
use crate::seed::{SeedProvider, load_heights, load_phases, load_positions, load_widths};
use crate::strategy::{AngleDynamic, Initializer, LandscapeStrategies, PositionDynamic};
use crate::variant::Variant;

/// Evaluation and change bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeCounters {
    pub fes: usize,
    pub fes_last_change: usize,
    pub change_count: usize,
    pub frequency: usize,
}

impl ChangeCounters {
    pub fn new(frequency: usize) -> Self {
        Self { fes: 0, fes_last_change: 0, change_count: 0, frequency }
    }

    /// True when the evaluation counted last must change the landscape first
    pub fn is_due(&self) -> bool {
        self.fes == self.fes_last_change + self.frequency
    }
}

/// Everything that changes while the engine runs
#[derive(Debug, Clone)]
pub struct LandscapeState {
    field: PeakField,
    counters: ChangeCounters,
    /// Direction of the next dimension change
    dim_step: isize,
    phases: Vec<f64>,
}

impl LandscapeState {
    pub fn field(&self) -> &PeakField {
        &self.field
    }

    pub fn counters(&self) -> &ChangeCounters {
        &self.counters
    }

    pub fn dim_step(&self) -> isize {
        self.dim_step
    }
}

#[derive(Debug)]
enum Readiness {
    Uninitialized,
    Ready(Box<LandscapeState>),
}

/// Dynamic rotation peak benchmark
///
/// ```ignore
/// let seeds = Arc::new(SeedTable::standard());
/// let cfg = RotationPeakConfigBuilder::new().dim(5).freq(100).seed(1).build();
/// let mut bench = RotationPeak::new(cfg, seeds)?;
/// let (f, x) = bench.evaluate(Array1::zeros(5))?;
/// ```
#[derive(Debug)]
pub struct RotationPeak {
    config: RotationPeakConfig,
    strategies: LandscapeStrategies,
    seeds: Arc<dyn SeedProvider>,
    rng: StdRng,
    readiness: Readiness,
}

impl RotationPeak {
    /// Engine running the preset strategies of `config.variant`
    pub fn new(config: RotationPeakConfig, seeds: Arc<dyn SeedProvider>) -> Result<Self, LandscapeError> {
        let strategies = config.variant.strategies();
        Self::with_strategies(config, strategies, seeds)
    }

    /// Engine running caller-supplied strategies
    ///
    /// `config.variant` is kept for reporting only.
    pub fn with_strategies(
        config: RotationPeakConfig,
        strategies: LandscapeStrategies,
        seeds: Arc<dyn SeedProvider>,
    ) -> Result<Self, LandscapeError> {
        config.validate()?;
        if let Some(drift) = &strategies.drift {
            drift.validate(config.dim)?;
        }
        if let Some(angle) = &strategies.angle {
            Bounds::new(angle.bounds.min, angle.bounds.max)?;
        }
        let rng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Ok(Self { config, strategies, seeds, rng, readiness: Readiness::Uninitialized })
    }

    /// Build the peak field from the seed bank; no-op once ready
    pub fn initialize(&mut self) -> Result<(), LandscapeError> {
        if let Readiness::Ready(_) = self.readiness {
            return Ok(());
        }
        let state = self.build_state()?;
        debug!(
            "initialized {} landscape: {} peaks in {} dimensions, change every {} evaluations",
            self.config.variant,
            state.field.num_peaks(),
            state.field.dim(),
            state.counters.frequency
        );
        self.readiness = Readiness::Ready(Box::new(state));
        Ok(())
    }

    fn build_state(&mut self) -> Result<LandscapeState, LandscapeError> {
        let cfg = &self.config;
        let strategies = &self.strategies;
        let seeds = self.seeds.as_ref();
        let n = cfg.num_peaks;

        let positions = load_positions(seeds, n, cfg.dim)?;
        // growth reads columns up to max_dim inclusive
        let bank = match strategies.drift {
            Some(_) => Some(load_positions(seeds, n, strategies.max_dim(cfg.dim) + 1)?),
            None => None,
        };
        if let PositionDynamic::Map { .. } = strategies.position {
            // mapped positions are not clipped
            check_seed_range("position", bank.as_ref().unwrap_or(&positions).iter(), cfg.search_bounds()?)?;
        }
        let phases = if strategies.uses_phase_offsets() {
            let mut count = n.max(1);
            if strategies.position_uses_phase_offsets() {
                count = count.max(strategies.max_dim(cfg.dim));
            }
            load_phases(seeds, count)?
        } else {
            Vec::new()
        };

        let hb = cfg.height_bounds()?;
        let wb = cfg.width_bounds()?;
        let rng = &mut self.rng;
        let (heights, widths, theta) = match strategies.initializer {
            Initializer::Uniform => (
                Array1::from_elem(n, cfg.initial_height),
                Array1::from_elem(n, cfg.initial_width),
                strategies.angle.as_ref().map_or(0.0, |a| rng.random_range(a.bounds.min..a.bounds.max)),
            ),
            Initializer::Seeded => {
                let heights = load_heights(seeds, n)?;
                let widths = load_widths(seeds, n)?;
                check_seed_range("height", heights.iter(), hb)?;
                check_seed_range("width", widths.iter(), wb)?;
                let theta =
                    strategies.angle.as_ref().map_or(0.0, |a| rng.random_range(a.bounds.min..a.bounds.max));
                (heights, widths, theta)
            }
            Initializer::Phased => {
                let mut heights = Array1::from_elem(n, cfg.initial_height);
                let mut widths = Array1::from_elem(n, cfg.initial_width);
                strategies.height.apply(
                    heights.view_mut(),
                    &ChangeContext::new(hb, cfg.h_severity, 0, &phases),
                    rng,
                )?;
                strategies.width.apply(
                    widths.view_mut(),
                    &ChangeContext::new(wb, cfg.w_severity, 0, &phases),
                    rng,
                )?;
                let theta = match &strategies.angle {
                    Some(angle) => advance_angle(angle, 0.0, 1, &phases, rng)?,
                    None => 0.0,
                };
                (heights, widths, theta)
            }
        };

        let field = PeakField::new(positions, heights, widths, theta)?;
        let dim_step = strategies.drift.map_or(0, |d| d.initial_step);
        Ok(LandscapeState { field, counters: ChangeCounters::new(cfg.frequency()), dim_step, phases })
    }

    /// Score `x`, changing the landscape first when a change is due
    ///
    /// Returns the fitness and the point actually scored, which differs from
    /// `x` only when the dimensionality changed during this call.
    pub fn evaluate(&mut self, x: Array1<f64>) -> Result<(f64, Array1<f64>), LandscapeError> {
        self.initialize()?;
        let Self { config, strategies, seeds, rng, readiness } = self;
        let Readiness::Ready(state) = readiness else {
            return Err(LandscapeError::InvalidConfig("landscape is not initialized".to_string()));
        };

        if x.len() != state.field.dim() {
            return Err(LandscapeError::DimensionMismatch { expected: state.field.dim(), got: x.len() });
        }

        let mut x = x;
        let mut counters = state.counters;
        counters.fes += 1;
        if counters.is_due() {
            let shift = change(state, &mut counters, config, strategies, &**seeds, rng)?;
            if let Some(shift) = shift {
                x = reshape_query(x, shift, config.search_bounds()?, rng);
                trace!("query reshaped to {} coordinates", x.len());
            }
        }
        state.counters = counters;

        let fitness = state.field.fitness(x.view())?;
        Ok((fitness, x))
    }

    pub fn config(&self) -> &RotationPeakConfig {
        &self.config
    }

    pub fn variant(&self) -> Variant {
        self.config.variant
    }

    pub fn strategies(&self) -> &LandscapeStrategies {
        &self.strategies
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.readiness, Readiness::Ready(_))
    }

    pub fn state(&self) -> Option<&LandscapeState> {
        match &self.readiness {
            Readiness::Ready(state) => Some(state),
            Readiness::Uninitialized => None,
        }
    }

    pub fn field(&self) -> Option<&PeakField> {
        self.state().map(|s| &s.field)
    }

    pub fn fes(&self) -> usize {
        self.state().map_or(0, |s| s.counters.fes)
    }

    pub fn change_count(&self) -> usize {
        self.state().map_or(0, |s| s.counters.change_count)
    }

    pub fn fes_last_change(&self) -> usize {
        self.state().map_or(0, |s| s.counters.fes_last_change)
    }

    pub fn frequency(&self) -> usize {
        self.config.frequency()
    }

    /// Current dimensionality
    pub fn dim(&self) -> usize {
        self.field().map_or(self.config.dim, PeakField::dim)
    }

    pub fn num_peaks(&self) -> usize {
        self.config.num_peaks
    }

    pub fn num_change(&self) -> usize {
        self.config.num_change
    }

    pub fn changes_remaining(&self) -> usize {
        self.config.num_change.saturating_sub(self.change_count())
    }
}

/// One landscape change: heights, widths, optional resize, positions, angle
///
/// Works on a copy of the field; `state` and `counters` are only updated
/// once every dynamic succeeded.
fn change(
    state: &mut LandscapeState,
    counters: &mut ChangeCounters,
    config: &RotationPeakConfig,
    strategies: &LandscapeStrategies,
    seeds: &dyn SeedProvider,
    rng: &mut StdRng,
) -> Result<Option<DimensionShift>, LandscapeError> {
    let t = counters.change_count + 1;
    let phases = state.phases.as_slice();
    let mut next = state.field.clone();
    let mut dim_step = state.dim_step;
    let field = &mut next;

    strategies.height.apply(
        field.heights_mut().view_mut(),
        &ChangeContext::new(config.height_bounds()?, config.h_severity, t, phases),
        rng,
    )?;
    strategies.width.apply(
        field.widths_mut().view_mut(),
        &ChangeContext::new(config.width_bounds()?, config.w_severity, t, phases),
        rng,
    )?;

    let shift = match &strategies.drift {
        Some(drift) => Some(drift.apply(field, &mut dim_step, seeds)?),
        None => None,
    };

    match &strategies.position {
        PositionDynamic::Rotation => field.rotate(rng),
        PositionDynamic::Map { dynamic, severity } => {
            let ctx = ChangeContext::new(config.search_bounds()?, *severity, t, phases);
            for row in field.positions_mut().rows_mut() {
                dynamic.apply(row, &ctx, rng)?;
            }
        }
    }

    if let Some(angle) = &strategies.angle {
        let theta = advance_angle(angle, field.theta(), t, phases, rng)?;
        field.set_theta(theta);
    }

    debug!(
        "change {} at evaluation {}: dim {}, theta {:.4}, best height {:.3}",
        t,
        counters.fes,
        next.dim(),
        next.theta(),
        next.heights().fold(f64::NEG_INFINITY, |a, &b| a.max(b))
    );
    state.field = next;
    state.dim_step = dim_step;
    counters.change_count = t;
    counters.fes_last_change = counters.fes;
    if t == config.num_change + 1 {
        warn!("change budget of {} exceeded, landscape keeps changing", config.num_change);
    }
    Ok(shift)
}

fn check_seed_range<'a>(
    what: &str,
    values: impl IntoIterator<Item = &'a f64>,
    bounds: Bounds,
) -> Result<(), LandscapeError> {
    match values.into_iter().find(|v| !bounds.contains(**v)) {
        Some(v) => Err(LandscapeError::InvalidConfig(format!(
            "seed {} {} outside [{}, {}]",
            what, v, bounds.min, bounds.max
        ))),
        None => Ok(()),
    }
}

fn advance_angle(
    angle: &AngleDynamic,
    theta: f64,
    t: usize,
    phases: &[f64],
    rng: &mut StdRng,
) -> Result<f64, LandscapeError> {
    let mut th = Array1::from_elem(1, theta);
    angle.dynamic.apply(th.view_mut(), &ChangeContext::new(angle.bounds, angle.severity, t, phases), rng)?;
    Ok(th[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RotationPeakConfigBuilder;
    use crate::seed::SeedTable;
    use ndarray::{Array2, array};

    fn one_peak_seeds() -> Arc<dyn SeedProvider> {
        Arc::new(SeedTable::new(vec![0.0], Array2::zeros((1, 2)), vec![50.0], vec![5.0]))
    }

    #[test]
    fn test_counters_due() {
        let mut c = ChangeCounters::new(3);
        assert!(!c.is_due());
        c.fes = 3;
        assert!(c.is_due());
        c.fes_last_change = 3;
        assert!(!c.is_due());
    }

    #[test]
    fn test_lazy_initialize() {
        let cfg = RotationPeakConfigBuilder::new().dim(2).num_peaks(1).freq(3).seed(1).build();
        let mut bench = RotationPeak::new(cfg, one_peak_seeds()).unwrap();
        assert!(!bench.is_ready());
        assert!(bench.field().is_none());
        assert_eq!(bench.dim(), 2);
        let (f, x) = bench.evaluate(array![0.0, 0.0]).unwrap();
        assert!(bench.is_ready());
        assert_eq!(f, 50.0);
        assert_eq!(x, array![0.0, 0.0]);
        assert_eq!(bench.fes(), 1);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let cfg = RotationPeakConfigBuilder::new().dim(2).num_peaks(1).seed(1).build();
        let mut bench = RotationPeak::new(cfg, one_peak_seeds()).unwrap();
        bench.initialize().unwrap();
        let theta = bench.field().unwrap().theta();
        bench.initialize().unwrap();
        assert_eq!(bench.field().unwrap().theta(), theta);
    }

    #[test]
    fn test_phased_initializer_starts_on_curve() {
        let cfg = RotationPeakConfigBuilder::new()
            .dim(2)
            .num_peaks(1)
            .variant(Variant::Recurrent)
            .seed(1)
            .build();
        let mut bench = RotationPeak::new(cfg, one_peak_seeds()).unwrap();
        bench.initialize().unwrap();
        let field = bench.field().unwrap();
        // phase 0 at t = 0: midpoint of the range
        assert!((field.heights()[0] - 55.0).abs() < 1e-9);
        assert!((field.widths()[0] - 5.5).abs() < 1e-9);
        let expected = (std::f64::consts::PI / 6.0) * ((2.0 * std::f64::consts::PI / 12.0).sin() + 1.0) / 2.0;
        assert!((field.theta() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_changes_remaining() {
        let cfg = RotationPeakConfigBuilder::new().dim(2).num_peaks(1).freq(1).num_change(2).seed(3).build();
        let mut bench = RotationPeak::new(cfg, one_peak_seeds()).unwrap();
        assert_eq!(bench.changes_remaining(), 2);
        for _ in 0..5 {
            bench.evaluate(array![0.0, 0.0]).unwrap();
        }
        assert_eq!(bench.change_count(), 5);
        assert_eq!(bench.changes_remaining(), 0);
    }
}
