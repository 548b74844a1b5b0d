//! Newton-Raphson iteration with analytic or numerical derivatives.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Floor below which a derivative is treated as vanishing.
const DERIVATIVE_FLOOR: f64 = 1e-15;

/// Newton-Raphson root finding.
///
/// Iterates `x_{n+1} = x_n - f(x_n) / f'(x_n)` until either the residual
/// or the step size drops below the configured tolerance. Convergence is
/// quadratic near a simple root, but the method can diverge from a poor
/// starting point; callers that need robustness should go through
/// [`hybrid`](crate::solvers::hybrid) instead.
///
/// # Errors
///
/// Returns [`MathError::DivisionByZero`] when the derivative vanishes,
/// [`MathError::InvalidInput`] when the iterate leaves the finite range,
/// and [`MathError::ConvergenceFailed`] when the iteration budget runs out.
///
/// # Example
///
/// ```rust
/// use pillar_math::solvers::{newton_raphson, SolverConfig};
///
/// // Solve exp(-x) = 0.5, i.e. the continuously compounded rate that
/// // halves a unit notional over one year.
/// let f = |x: f64| (-x).exp() - 0.5;
/// let df = |x: f64| -(-x).exp();
///
/// let result = newton_raphson(f, df, 0.5, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::LN_2).abs() < 1e-10);
/// ```
pub fn newton_raphson<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let mut x = initial_guess;

    for iteration in 0..config.max_iterations {
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

        let dfx = df(x);
        if dfx.abs() < DERIVATIVE_FLOOR {
            return Err(MathError::DivisionByZero { value: dfx });
        }

        let step = fx / dfx;
        x -= step;

        if !x.is_finite() {
            return Err(MathError::invalid_input(
                "iterate diverged to a non-finite value",
            ));
        }

        // Step convergence: the root is pinned even if the residual
        // tolerance has not been hit yet.
        if step.abs() < config.tolerance {
            let residual = f(x);
            return Ok(SolverResult {
                root: x,
                iterations: iteration + 1,
                residual,
            });
        }
    }

    Err(MathError::convergence_failed(
        config.max_iterations,
        f(x).abs(),
    ))
}

/// Newton-Raphson with a centered finite-difference derivative.
///
/// Used when the objective has no cheap analytic derivative, e.g. the
/// pricing residual of a curve pillar during bootstrap.
pub fn newton_raphson_numerical<F>(
    f: F,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let h = 1e-8;
    let df = |x: f64| (f(x + h) - f(x - h)) / (2.0 * h);
    newton_raphson(&f, df, initial_guess, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn solves_continuous_rate() {
        let f = |x: f64| (-x).exp() - 0.5;
        let df = |x: f64| -(-x).exp();

        let result = newton_raphson(f, df, 0.5, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::LN_2, epsilon = 1e-10);
        assert!(result.iterations < 10);
    }

    #[test]
    fn solves_polynomial() {
        let f = |x: f64| x * x * x - 27.0;
        let df = |x: f64| 3.0 * x * x;

        let result = newton_raphson(f, df, 2.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, 3.0, epsilon = 1e-10);
    }

    #[test]
    fn numerical_derivative_matches_analytic() {
        let f = |x: f64| x * x - 2.0;

        let result = newton_raphson_numerical(f, 1.5, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-8);
    }

    #[test]
    fn zero_derivative_is_an_error() {
        let f = |x: f64| x * x * x - 1.0;
        let df = |x: f64| 3.0 * x * x;

        let result = newton_raphson(f, df, 0.0, &SolverConfig::default());

        assert!(matches!(result, Err(MathError::DivisionByZero { .. })));
    }

    #[test]
    fn exhausted_budget_reports_residual() {
        // x^2 + 1 has no real root, so the iteration wanders forever.
        let f = |x: f64| x * x + 1.0;
        let df = |x: f64| 2.0 * x;

        let config = SolverConfig::new(1e-12, 4);
        let result = newton_raphson(f, df, 3.0, &config);

        match result {
            Err(MathError::ConvergenceFailed { iterations, .. }) => assert_eq!(iterations, 4),
            other => panic!("expected convergence failure, got {other:?}"),
        }
    }
}
