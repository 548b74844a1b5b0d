//! Error types for curve construction and queries.

use pillar_core::types::Date;
use pillar_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone)]
pub enum CurveError {
    /// Two helpers resolve to the same pillar date.
    #[error("Duplicate pillar date {date} ({first} vs {second})")]
    DuplicatePillar {
        /// The contested pillar date.
        date: Date,
        /// Description of the first helper on that date.
        first: String,
        /// Description of the second helper on that date.
        second: String,
    },

    /// The bootstrap failed to converge.
    #[error("Curve build failed after {iterations} iterations (max change: {residual:.2e}): {message}")]
    BuildFailed {
        /// Number of iterations attempted.
        iterations: u32,
        /// Largest remaining discount factor change or pricing residual.
        residual: f64,
        /// Description of the failure.
        message: String,
    },

    /// Pillar dates are not strictly increasing.
    #[error("Non-monotonic pillars at index {index}: {prev} >= {current}")]
    NonMonotonicPillars {
        /// Index where the violation occurred.
        index: usize,
        /// Previous pillar date.
        prev: Date,
        /// Offending pillar date.
        current: Date,
    },

    /// Not enough pillars for the requested interpolation.
    #[error("Insufficient pillars: need at least {required}, got {got}")]
    InsufficientPillars {
        /// Minimum required pillars.
        required: usize,
        /// Actual number provided.
        got: usize,
    },

    /// Invalid value (NaN, Inf, non-positive discount factor).
    #[error("Invalid value: {reason}")]
    InvalidValue {
        /// Description of why the value is invalid.
        reason: String,
    },

    /// Invalid bootstrap helper.
    #[error("Invalid helper: {reason}")]
    InvalidHelper {
        /// Description of what is wrong with the helper.
        reason: String,
    },

    /// A numerical routine failed underneath a curve operation.
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

impl CurveError {
    /// Creates a duplicate pillar error.
    #[must_use]
    pub fn duplicate_pillar(date: Date, first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::DuplicatePillar {
            date,
            first: first.into(),
            second: second.into(),
        }
    }

    /// Creates a build failure error.
    #[must_use]
    pub fn build_failed(iterations: u32, residual: f64, message: impl Into<String>) -> Self {
        Self::BuildFailed {
            iterations,
            residual,
            message: message.into(),
        }
    }

    /// Creates a non-monotonic pillars error.
    #[must_use]
    pub fn non_monotonic_pillars(index: usize, prev: Date, current: Date) -> Self {
        Self::NonMonotonicPillars {
            index,
            prev,
            current,
        }
    }

    /// Creates an insufficient pillars error.
    #[must_use]
    pub fn insufficient_pillars(required: usize, got: usize) -> Self {
        Self::InsufficientPillars { required, got }
    }

    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }

    /// Creates an invalid helper error.
    #[must_use]
    pub fn invalid_helper(reason: impl Into<String>) -> Self {
        Self::InvalidHelper {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_failed_display() {
        let err = CurveError::build_failed(50, 1e-6, "outer iteration stalled");
        let msg = format!("{err}");
        assert!(msg.contains("50 iterations"));
        assert!(msg.contains("outer iteration stalled"));
    }

    #[test]
    fn duplicate_pillar_display() {
        let date = Date::from_ymd(2026, 3, 15).unwrap();
        let err = CurveError::duplicate_pillar(date, "deposit 3M", "swap 3M");
        let msg = format!("{err}");
        assert!(msg.contains("2026-03-15"));
        assert!(msg.contains("deposit 3M"));
    }

    #[test]
    fn math_error_converts() {
        let math = MathError::convergence_failed(100, 0.5);
        let err: CurveError = math.into();
        assert!(matches!(err, CurveError::Math(_)));
    }
}
