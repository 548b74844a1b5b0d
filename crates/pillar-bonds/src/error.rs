//! Error types for bond operations.

use pillar_core::types::Date;
use thiserror::Error;

/// A specialized Result type for bond operations.
pub type BondResult<T> = Result<T, BondError>;

/// Errors that can occur during bond operations.
#[derive(Error, Debug, Clone)]
pub enum BondError {
    /// The bond has no outstanding notional at the settlement date.
    #[error("Bond is not tradable at settlement {settlement} (maturity {maturity})")]
    NotTradable {
        /// The offending settlement date.
        settlement: Date,
        /// The bond's maturity date.
        maturity: Date,
    },

    /// Amount and date lists passed together have different lengths.
    #[error("Mismatched inputs: {amounts} amounts vs {dates} dates")]
    MismatchedAmounts {
        /// Number of amounts supplied.
        amounts: usize,
        /// Number of dates supplied.
        dates: usize,
    },

    /// Invalid bond specification.
    #[error("Invalid bond specification: {reason}")]
    InvalidSpec {
        /// Description of what is invalid.
        reason: String,
    },

    /// Core library error.
    #[error("Core error: {0}")]
    Core(#[from] pillar_core::error::CoreError),

    /// Curve error.
    #[error("Curve error: {0}")]
    Curve(#[from] pillar_curves::CurveError),

    /// Numerical error, typically a yield or spread search that failed
    /// to converge.
    #[error("Math error: {0}")]
    Math(#[from] pillar_math::MathError),
}

impl BondError {
    /// Creates a not tradable error.
    #[must_use]
    pub fn not_tradable(settlement: Date, maturity: Date) -> Self {
        Self::NotTradable {
            settlement,
            maturity,
        }
    }

    /// Creates a mismatched amounts error.
    #[must_use]
    pub fn mismatched_amounts(amounts: usize, dates: usize) -> Self {
        Self::MismatchedAmounts { amounts, dates }
    }

    /// Creates an invalid specification error.
    #[must_use]
    pub fn invalid_spec(reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            reason: reason.into(),
        }
    }
}
