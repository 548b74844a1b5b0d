//! Error types for core operations.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by core types and conventions.
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    /// An invalid calendar date.
    #[error("Invalid date: {input}")]
    InvalidDate {
        /// The offending input.
        input: String,
    },

    /// A cash flow schedule violated its ordering invariant.
    #[error("Invalid schedule: {reason}")]
    InvalidSchedule {
        /// Description of the violation.
        reason: String,
    },

    /// An invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(input: impl Into<String>) -> Self {
        Self::InvalidDate {
            input: input.into(),
        }
    }

    /// Creates an invalid schedule error.
    #[must_use]
    pub fn invalid_schedule(reason: impl Into<String>) -> Self {
        Self::InvalidSchedule {
            reason: reason.into(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_schedule("dates not increasing");
        assert!(err.to_string().contains("dates not increasing"));
    }
}
