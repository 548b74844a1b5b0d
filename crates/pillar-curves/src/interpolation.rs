//! Interpolation schemes for discount curves.

use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// Interpolation schemes applied to the pillar discount factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InterpolationMethod {
    /// Linear interpolation on log discount factors (piecewise-flat
    /// forward rates).
    #[default]
    LogLinearDiscount,

    /// Linear interpolation on discount factors.
    LinearDiscount,

    /// Natural cubic spline on log discount factors.
    CubicSplineDiscount,
}

impl InterpolationMethod {
    /// Whether a pillar's interpolated values depend only on its two
    /// bracketing pillars.
    ///
    /// Non-local schemes couple every pillar to every other one, which
    /// forces the bootstrap into outer fixed-point sweeps.
    #[must_use]
    pub fn is_local(&self) -> bool {
        match self {
            Self::LogLinearDiscount | Self::LinearDiscount => true,
            Self::CubicSplineDiscount => false,
        }
    }
}

impl std::fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::LogLinearDiscount => "Log-Linear (Discount)",
            Self::LinearDiscount => "Linear (Discount)",
            Self::CubicSplineDiscount => "Cubic Spline (Discount)",
        };
        write!(f, "{name}")
    }
}

/// Precomputed interpolant over `(time, discount factor)` pillars.
///
/// Always anchored at `t = 0` with a discount factor of exactly 1.
#[derive(Debug, Clone)]
pub(crate) struct DiscountInterpolator {
    times: Vec<f64>,
    dfs: Vec<f64>,
    log_dfs: Vec<f64>,
    /// Second derivatives of log-DF at the knots; spline scheme only.
    second_derivs: Option<Vec<f64>>,
    method: InterpolationMethod,
}

impl DiscountInterpolator {
    /// Builds the interpolant. `times` must start at 0 with `dfs[0] == 1`
    /// and be strictly increasing; both are the caller's invariants.
    pub(crate) fn new(
        times: Vec<f64>,
        dfs: Vec<f64>,
        method: InterpolationMethod,
    ) -> CurveResult<Self> {
        if times.len() < 2 {
            return Err(CurveError::insufficient_pillars(2, times.len()));
        }
        for (t, df) in times.iter().zip(&dfs) {
            if !t.is_finite() || !df.is_finite() || *df <= 0.0 {
                return Err(CurveError::invalid_value(format!(
                    "pillar (t = {t}, df = {df}) is not a positive finite discount factor"
                )));
            }
        }

        let log_dfs: Vec<f64> = dfs.iter().map(|df| df.ln()).collect();
        let second_derivs = match method {
            InterpolationMethod::CubicSplineDiscount => {
                Some(natural_spline_second_derivs(&times, &log_dfs))
            }
            _ => None,
        };

        Ok(Self {
            times,
            dfs,
            log_dfs,
            second_derivs,
            method,
        })
    }

    /// Interpolated discount factor at time `t` (years from reference).
    ///
    /// Values beyond the last pillar continue log-linearly along the last
    /// segment's slope, i.e. flat in the forward rate.
    pub(crate) fn discount_factor(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 1.0;
        }

        let n = self.times.len();
        let last = self.times[n - 1];
        if t >= last {
            let slope =
                (self.log_dfs[n - 1] - self.log_dfs[n - 2]) / (last - self.times[n - 2]);
            return (self.log_dfs[n - 1] + slope * (t - last)).exp();
        }

        // Index of the segment [times[i], times[i+1]) containing t.
        let i = self.times.partition_point(|&x| x <= t) - 1;
        let (t0, t1) = (self.times[i], self.times[i + 1]);
        let w = (t - t0) / (t1 - t0);

        match self.method {
            InterpolationMethod::LogLinearDiscount => {
                let log_df = self.log_dfs[i] * (1.0 - w) + self.log_dfs[i + 1] * w;
                log_df.exp()
            }
            InterpolationMethod::LinearDiscount => {
                self.dfs[i] * (1.0 - w) + self.dfs[i + 1] * w
            }
            InterpolationMethod::CubicSplineDiscount => {
                let m = self
                    .second_derivs
                    .as_ref()
                    .map_or(&[][..], Vec::as_slice);
                let h = t1 - t0;
                let a = 1.0 - w;
                let b = w;
                let log_df = a * self.log_dfs[i]
                    + b * self.log_dfs[i + 1]
                    + ((a * a * a - a) * m[i] + (b * b * b - b) * m[i + 1]) * h * h / 6.0;
                log_df.exp()
            }
        }
    }
}

/// Second derivatives of a natural cubic spline through `(x, y)`.
///
/// Standard tridiagonal sweep with natural boundary conditions
/// (zero curvature at both ends).
fn natural_spline_second_derivs(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut m = vec![0.0; n];
    if n < 3 {
        return m;
    }

    let mut u = vec![0.0; n - 1];
    for i in 1..n - 1 {
        let sig = (x[i] - x[i - 1]) / (x[i + 1] - x[i - 1]);
        let p = sig * m[i - 1] + 2.0;
        m[i] = (sig - 1.0) / p;
        let slope_right = (y[i + 1] - y[i]) / (x[i + 1] - x[i]);
        let slope_left = (y[i] - y[i - 1]) / (x[i] - x[i - 1]);
        u[i] = (6.0 * (slope_right - slope_left) / (x[i + 1] - x[i - 1]) - sig * u[i - 1]) / p;
    }

    m[n - 1] = 0.0;
    for i in (1..n - 1).rev() {
        m[i] = m[i] * m[i + 1] + u[i];
    }
    m[0] = 0.0;

    m
}
