//! Interest rate value type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::daycounts::DayCountConvention;
use crate::types::{Compounding, Date, Frequency};
use rust_decimal::prelude::ToPrimitive;

/// An interest rate with its quoting conventions.
///
/// Pure value type: the compounding and discounting functions are
/// deterministic given `(rate, t)`. The day counter turns date pairs into
/// the year fractions the rate compounds over.
///
/// # Example
///
/// ```rust
/// use pillar_core::daycounts::DayCountConvention;
/// use pillar_core::types::{Compounding, Frequency, InterestRate};
///
/// let rate = InterestRate::new(
///     0.05,
///     DayCountConvention::Act365Fixed,
///     Compounding::Compounded,
///     Frequency::SemiAnnual,
/// );
/// let df = rate.discount_factor(1.0);
/// assert!(df < 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterestRate {
    /// The rate level (e.g., 0.05 for 5%).
    rate: f64,
    /// Day count convention for date-pair year fractions.
    day_count: DayCountConvention,
    /// Compounding convention.
    compounding: Compounding,
    /// Compounding frequency.
    frequency: Frequency,
}

impl InterestRate {
    /// Creates a new interest rate.
    #[must_use]
    pub fn new(
        rate: f64,
        day_count: DayCountConvention,
        compounding: Compounding,
        frequency: Frequency,
    ) -> Self {
        Self {
            rate,
            day_count,
            compounding,
            frequency,
        }
    }

    /// Returns the rate level.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the day count convention.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Returns the compounding convention.
    #[must_use]
    pub fn compounding(&self) -> Compounding {
        self.compounding
    }

    /// Returns the compounding frequency.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Growth factor of a unit investment over `t` years.
    #[must_use]
    pub fn compound_factor(&self, t: f64) -> f64 {
        self.compounding.compound_factor(self.rate, t, self.frequency)
    }

    /// Discount factor over `t` years.
    #[must_use]
    pub fn discount_factor(&self, t: f64) -> f64 {
        self.compounding.discount_factor(self.rate, t, self.frequency)
    }

    /// Year fraction between two dates under this rate's day counter.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.day_count
            .to_day_count()
            .year_fraction(start, end)
            .to_f64()
            .unwrap_or(0.0)
    }

    /// Discount factor between two dates.
    #[must_use]
    pub fn discount_factor_between(&self, start: Date, end: Date) -> f64 {
        self.discount_factor(self.year_fraction(start, end))
    }

    /// Returns a copy of this rate with a different level.
    ///
    /// Used by solvers that iterate on the level while keeping conventions.
    #[must_use]
    pub fn with_rate(&self, rate: f64) -> Self {
        Self { rate, ..*self }
    }

    /// The rate that produces `compound` over `t` years under these
    /// conventions.
    #[must_use]
    pub fn implied_rate(
        compound: f64,
        t: f64,
        day_count: DayCountConvention,
        compounding: Compounding,
        frequency: Frequency,
    ) -> Self {
        let rate = compounding.implied_rate(compound, t, frequency);
        Self::new(rate, day_count, compounding, frequency)
    }
}

impl fmt::Display for InterestRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.4}% {} {} {}",
            self.rate * 100.0,
            self.day_count.name(),
            self.compounding,
            self.frequency
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn semiannual(rate: f64) -> InterestRate {
        InterestRate::new(
            rate,
            DayCountConvention::Act365Fixed,
            Compounding::Compounded,
            Frequency::SemiAnnual,
        )
    }

    #[test]
    fn test_discount_compound_reciprocal() {
        let rate = semiannual(0.05);
        assert_relative_eq!(
            rate.discount_factor(2.0) * rate.compound_factor(2.0),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_discount_between_dates() {
        let rate = semiannual(0.05);
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2026, 1, 1).unwrap();
        let t = 365.0 / 365.0;
        assert_relative_eq!(
            rate.discount_factor_between(start, end),
            rate.discount_factor(t),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_implied_rate_roundtrip() {
        let rate = semiannual(0.0475);
        let factor = rate.compound_factor(3.0);
        let implied = InterestRate::implied_rate(
            factor,
            3.0,
            rate.day_count(),
            rate.compounding(),
            rate.frequency(),
        );
        assert_relative_eq!(implied.rate(), 0.0475, epsilon = 1e-10);
    }

    #[test]
    fn test_with_rate_keeps_conventions() {
        let rate = semiannual(0.05).with_rate(0.06);
        assert_relative_eq!(rate.rate(), 0.06, epsilon = 1e-15);
        assert_eq!(rate.frequency(), Frequency::SemiAnnual);
    }
}
