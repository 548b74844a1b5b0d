//! Sequential curve bootstrap with an outer fixed-point loop for
//! non-local interpolation.

use pillar_core::types::Date;
use pillar_math::solvers::{hybrid_numerical, SolverConfig};

use crate::error::{CurveError, CurveResult};
use crate::helpers::RateHelper;
use crate::interpolation::InterpolationMethod;
use crate::term_structure::{year_fraction, TermStructure};

/// Lower bound for any pillar discount factor during solving.
const DF_FLOOR: f64 = 1e-12;

/// Headroom above the previous pillar's discount factor, so mildly
/// negative forward rates stay solvable.
const DF_UPPER_MARGIN: f64 = 2.0;

/// Configuration for the bootstrap.
#[derive(Debug, Clone, Copy)]
pub struct BootstrapConfig {
    /// Interpolation scheme for the built curve.
    pub interpolation: InterpolationMethod,
    /// Convergence tolerance, applied to the quote residual per pillar
    /// and to the max discount factor change per outer sweep.
    pub tolerance: f64,
    /// Iteration budget for each pillar's root search.
    pub max_iterations: u32,
    /// Outer sweep budget for non-local interpolation.
    pub max_global_iterations: u32,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            interpolation: InterpolationMethod::default(),
            tolerance: 1e-10,
            max_iterations: 100,
            max_global_iterations: 25,
        }
    }
}

impl BootstrapConfig {
    /// Sets the interpolation scheme.
    #[must_use]
    pub fn with_interpolation(mut self, interpolation: InterpolationMethod) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the per-pillar iteration budget.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the outer sweep budget.
    #[must_use]
    pub fn with_max_global_iterations(mut self, max_global_iterations: u32) -> Self {
        self.max_global_iterations = max_global_iterations;
        self
    }
}

/// Bootstraps an immutable [`TermStructure`] from a set of helpers.
///
/// Helpers are sorted by pillar date and solved one at a time: each
/// pillar's discount factor is the root of
/// `implied_quote(trial curve) − market quote`, holding earlier pillars
/// fixed. With local interpolation one pass reprices every helper
/// exactly. Non-local interpolation couples the pillars, so the
/// sequential pass repeats as an outer fixed-point iteration until the
/// pillar discount factors stop moving.
///
/// # Example
///
/// ```rust,ignore
/// let curve = Bootstrapper::new(reference_date)
///     .add_helper(Box::new(deposit_3m))
///     .add_helper(Box::new(swap_2y))
///     .add_helper(Box::new(swap_10y))
///     .bootstrap()?;
/// ```
pub struct Bootstrapper {
    reference_date: Date,
    helpers: Vec<Box<dyn RateHelper>>,
    config: BootstrapConfig,
}

impl Bootstrapper {
    /// Creates a bootstrapper anchored at `reference_date`.
    #[must_use]
    pub fn new(reference_date: Date) -> Self {
        Self {
            reference_date,
            helpers: Vec::new(),
            config: BootstrapConfig::default(),
        }
    }

    /// Sets the bootstrap configuration.
    #[must_use]
    pub fn with_config(mut self, config: BootstrapConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds a calibration helper.
    #[must_use]
    pub fn add_helper(mut self, helper: Box<dyn RateHelper>) -> Self {
        self.helpers.push(helper);
        self
    }

    /// Adds multiple calibration helpers.
    #[must_use]
    pub fn add_helpers(mut self, helpers: impl IntoIterator<Item = Box<dyn RateHelper>>) -> Self {
        self.helpers.extend(helpers);
        self
    }

    /// The helpers added so far.
    #[must_use]
    pub fn helpers(&self) -> &[Box<dyn RateHelper>] {
        &self.helpers
    }

    /// Runs the bootstrap.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::DuplicatePillar`] when two helpers share a
    /// pillar date, [`CurveError::BuildFailed`] when a pillar root search
    /// or the outer iteration fails to converge, and construction errors
    /// for degenerate helper sets.
    pub fn bootstrap(&self) -> CurveResult<TermStructure> {
        build_curve(self.reference_date, &self.helpers, &self.config)
    }
}

/// The bootstrap proper, shared with the lazily rebuilding curve wrapper.
pub(crate) fn build_curve(
    reference_date: Date,
    helpers: &[Box<dyn RateHelper>],
    config: &BootstrapConfig,
) -> CurveResult<TermStructure> {
    if helpers.is_empty() {
        return Err(CurveError::insufficient_pillars(1, 0));
    }

    // Sort helper indices by pillar date; the helpers stay in place.
    let mut order: Vec<usize> = (0..helpers.len()).collect();
    order.sort_by_key(|&i| helpers[i].pillar_date());

    for pair in order.windows(2) {
        let (a, b) = (&helpers[pair[0]], &helpers[pair[1]]);
        if a.pillar_date() == b.pillar_date() {
            return Err(CurveError::duplicate_pillar(
                a.pillar_date(),
                a.description(),
                b.description(),
            ));
        }
    }

    let first = &helpers[order[0]];
    if first.pillar_date() <= reference_date {
        return Err(CurveError::invalid_helper(format!(
            "pillar date {} of '{}' is not after the reference date {reference_date}",
            first.pillar_date(),
            first.description()
        )));
    }

    let dates: Vec<Date> = order.iter().map(|&i| helpers[i].pillar_date()).collect();

    // Seed each pillar by discounting at its own quote, a guess close
    // enough for the short end and harmless further out. Price-quoted
    // helpers (bonds near 100) are clamped to a rate-like magnitude.
    let mut dfs: Vec<f64> = order
        .iter()
        .zip(&dates)
        .map(|(&i, date)| {
            let t = year_fraction(reference_date, *date);
            (-helpers[i].quote().clamp(0.0, 0.2) * t).exp()
        })
        .collect();

    let solver_config = SolverConfig::new(config.tolerance, config.max_iterations);

    if config.interpolation.is_local() {
        sweep(
            reference_date,
            helpers,
            &order,
            &dates,
            &mut dfs,
            config,
            &solver_config,
        )?;
    } else {
        let mut converged = false;
        for iteration in 0..config.max_global_iterations {
            let max_change = sweep(
                reference_date,
                helpers,
                &order,
                &dates,
                &mut dfs,
                config,
                &solver_config,
            )?;
            log::debug!(
                "bootstrap sweep {iteration}: max discount factor change {max_change:.3e}"
            );
            if max_change < config.tolerance {
                converged = true;
                break;
            }
        }
        if !converged {
            let residual = residual_after_sweeps(reference_date, helpers, &order, &dates, &dfs, config);
            return Err(CurveError::build_failed(
                config.max_global_iterations,
                residual,
                "outer fixed-point iteration did not converge",
            ));
        }
    }

    let pillars: Vec<(Date, f64)> = dates.into_iter().zip(dfs).collect();
    TermStructure::new(reference_date, pillars, config.interpolation)
}

/// One sequential pass over all pillars. Returns the largest discount
/// factor change.
#[allow(clippy::too_many_arguments)]
fn sweep(
    reference_date: Date,
    helpers: &[Box<dyn RateHelper>],
    order: &[usize],
    dates: &[Date],
    dfs: &mut [f64],
    config: &BootstrapConfig,
    solver_config: &SolverConfig,
) -> CurveResult<f64> {
    let mut max_change: f64 = 0.0;

    for (pos, &helper_index) in order.iter().enumerate() {
        let helper = &helpers[helper_index];
        let target = helper.quote();

        let objective = |df: f64| {
            if df <= 0.0 || !df.is_finite() {
                return f64::NAN;
            }
            let mut trial: Vec<(Date, f64)> = dates.iter().copied().zip(dfs.iter().copied()).collect();
            trial[pos].1 = df;
            match TermStructure::new(reference_date, trial, config.interpolation) {
                Ok(curve) => match helper.implied_quote(&curve) {
                    Ok(implied) => implied - target,
                    Err(_) => f64::NAN,
                },
                Err(_) => f64::NAN,
            }
        };

        let prev_df = if pos == 0 { 1.0 } else { dfs[pos - 1] };
        let bounds = (DF_FLOOR, prev_df * DF_UPPER_MARGIN);
        let guess = dfs[pos].clamp(bounds.0, bounds.1);

        let result = hybrid_numerical(objective, guess, Some(bounds), solver_config).map_err(
            |err| {
                CurveError::build_failed(
                    solver_config.max_iterations,
                    err_residual(&err),
                    format!(
                        "pillar {} ('{}') failed to solve: {err}",
                        dates[pos],
                        helper.description()
                    ),
                )
            },
        )?;

        max_change = max_change.max((result.root - dfs[pos]).abs());
        dfs[pos] = result.root;
    }

    Ok(max_change)
}

/// Worst remaining quote residual, reported on outer-loop failure.
fn residual_after_sweeps(
    reference_date: Date,
    helpers: &[Box<dyn RateHelper>],
    order: &[usize],
    dates: &[Date],
    dfs: &[f64],
    config: &BootstrapConfig,
) -> f64 {
    let pillars: Vec<(Date, f64)> = dates.iter().copied().zip(dfs.iter().copied()).collect();
    let Ok(curve) = TermStructure::new(reference_date, pillars, config.interpolation) else {
        return f64::NAN;
    };
    order
        .iter()
        .filter_map(|&i| {
            let helper = &helpers[i];
            helper
                .implied_quote(&curve)
                .ok()
                .map(|implied| (implied - helper.quote()).abs())
        })
        .fold(0.0, f64::max)
}

fn err_residual(err: &pillar_math::MathError) -> f64 {
    match err {
        pillar_math::MathError::ConvergenceFailed { residual, .. } => *residual,
        _ => f64::NAN,
    }
}
