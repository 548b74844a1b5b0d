//! Hybrid solver: fast Newton iteration with a guaranteed bisection fallback.

use crate::error::{MathError, MathResult};
use crate::solvers::{bisection, SolverConfig, SolverResult};

/// Consecutive residual increases tolerated before Newton is abandoned.
const MAX_DIVERGENCE: u32 = 3;

/// Cap on the Newton stage; the remaining budget belongs to bisection.
const NEWTON_ITERATION_CAP: u32 = 20;

/// Widest half-width tried when searching for a bracket around the guess.
const BRACKET_EXPANSION_CAP: f64 = 1e6;

/// Hybrid root finding: monitored Newton-Raphson, falling back to bisection.
///
/// Newton runs first from `initial_guess`, with the residual watched for
/// divergence and the step size capped so a wild derivative cannot fling
/// the iterate out of range. If Newton stalls, diverges, or hits a flat
/// derivative, the solver bisects instead, over `bounds` when the caller
/// supplies them or over a bracket found by geometric expansion around
/// the guess.
///
/// This is the solver every pricing routine should reach for: it keeps
/// Newton's quadratic convergence for well-behaved objectives (yields,
/// par rates, pillar discount factors) without inheriting its failure
/// modes.
///
/// # Errors
///
/// Returns [`MathError::ConvergenceFailed`] when both stages exhaust the
/// budget, or [`MathError::InvalidBracket`] when no sign change can be
/// found for the fallback.
///
/// # Example
///
/// ```rust
/// use pillar_math::solvers::{hybrid, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
/// let df = |x: f64| 2.0 * x;
///
/// let result = hybrid(f, df, 1.0, Some((0.0, 10.0)), &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn hybrid<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let newton_budget = config.max_iterations.min(NEWTON_ITERATION_CAP);

    match newton_monitored(&f, &df, initial_guess, bounds, newton_budget, config) {
        Ok(result) => Ok(result),
        Err(newton_err) => {
            log::debug!("newton stage failed ({newton_err}), falling back to bisection");

            let (lo, hi) = match bounds {
                Some((lo, hi)) if f(lo) * f(hi) <= 0.0 => (lo, hi),
                _ => find_bracket(&f, initial_guess)?,
            };

            bisection(&f, lo, hi, config)
        }
    }
}

/// Hybrid solver with a centered finite-difference derivative.
pub fn hybrid_numerical<F>(
    f: F,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let h = 1e-8;
    let df = |x: f64| (f(x + h) - f(x - h)) / (2.0 * h);
    hybrid(&f, df, initial_guess, bounds, config)
}

/// Newton iteration that watches for divergence instead of trusting it.
fn newton_monitored<F, DF>(
    f: &F,
    df: &DF,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    max_iterations: u32,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let mut x = initial_guess;
    let mut best_residual = f64::INFINITY;
    let mut divergence_count = 0u32;

    for iteration in 0..max_iterations {
        let fx = f(x);

        if !fx.is_finite() {
            return Err(MathError::invalid_input(format!(
                "function value is not finite at x = {x}"
            )));
        }

        if fx.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        if fx.abs() >= best_residual {
            divergence_count += 1;
            if divergence_count > MAX_DIVERGENCE {
                return Err(MathError::convergence_failed(iteration, fx.abs()));
            }
        } else {
            best_residual = fx.abs();
            divergence_count = 0;
        }

        let dfx = df(x);
        if dfx.abs() < 1e-15 {
            return Err(MathError::DivisionByZero { value: dfx });
        }

        let mut next = x - fx / dfx;

        // Clamp the iterate to the caller's bounds; a step that keeps
        // hitting the wall counts as divergence via the residual monitor.
        if let Some((lo, hi)) = bounds {
            next = next.clamp(lo.min(hi), lo.max(hi));
        }

        if (next - x).abs() < config.tolerance {
            let residual = f(next);
            return Ok(SolverResult {
                root: next,
                iterations: iteration + 1,
                residual,
            });
        }

        x = next;
    }

    Err(MathError::convergence_failed(max_iterations, f(x).abs()))
}

/// Expand geometrically outward from `center` until a sign change appears.
fn find_bracket<F>(f: &F, center: f64) -> MathResult<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let f_center = f(center);
    let mut delta = 0.1_f64.max(center.abs() * 0.1);

    while delta <= BRACKET_EXPANSION_CAP {
        let lo = center - delta;
        let hi = center + delta;

        if f(lo) * f_center < 0.0 {
            return Ok((lo, center));
        }
        if f_center * f(hi) < 0.0 {
            return Ok((center, hi));
        }

        delta *= 2.0;
    }

    Err(MathError::InvalidBracket {
        a: center - BRACKET_EXPANSION_CAP,
        b: center + BRACKET_EXPANSION_CAP,
        fa: f(center - BRACKET_EXPANSION_CAP),
        fb: f(center + BRACKET_EXPANSION_CAP),
    })
}
