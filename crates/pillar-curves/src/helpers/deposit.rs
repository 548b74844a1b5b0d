//! Money market deposit helper for the short end of the curve.

use pillar_core::daycounts::DayCountConvention;
use pillar_core::types::{Date, Quote};
use rust_decimal::prelude::ToPrimitive;

use super::RateHelper;
use crate::error::{CurveError, CurveResult};
use crate::term_structure::TermStructure;

/// A money market deposit quoted as a simple rate.
///
/// Deposits pin down the short end of the curve, typically overnight out
/// to 12 months. The pricing identity is
///
/// ```text
/// DF(end) = DF(start) / (1 + rate × τ)
/// ```
///
/// where τ is the accrual fraction under the deposit's day count
/// (Act/360 for most money markets).
#[derive(Debug, Clone)]
pub struct DepositRateHelper {
    quote: Quote,
    start_date: Date,
    end_date: Date,
    day_count: DayCountConvention,
}

impl DepositRateHelper {
    /// Creates a deposit helper.
    ///
    /// # Errors
    ///
    /// Returns an error when `end_date` is not strictly after
    /// `start_date`.
    pub fn new(
        quote: Quote,
        start_date: Date,
        end_date: Date,
        day_count: DayCountConvention,
    ) -> CurveResult<Self> {
        if end_date <= start_date {
            return Err(CurveError::invalid_helper(format!(
                "deposit end {end_date} is not after start {start_date}"
            )));
        }
        Ok(Self {
            quote,
            start_date,
            end_date,
            day_count,
        })
    }

    /// The deposit start date.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// The accrual fraction over the deposit period.
    fn accrual_fraction(&self) -> f64 {
        self.day_count
            .to_day_count()
            .year_fraction(self.start_date, self.end_date)
            .to_f64()
            .unwrap_or_default()
    }
}

impl RateHelper for DepositRateHelper {
    fn pillar_date(&self) -> Date {
        self.end_date
    }

    fn quote(&self) -> f64 {
        self.quote.value()
    }

    fn implied_quote(&self, curve: &TermStructure) -> CurveResult<f64> {
        let df_start = curve.discount_factor(self.start_date);
        let df_end = curve.discount_factor(self.end_date);
        let tau = self.accrual_fraction();
        Ok((df_start / df_end - 1.0) / tau)
    }

    fn quote_version(&self) -> u64 {
        self.quote.version()
    }

    fn description(&self) -> String {
        format!(
            "deposit {} -> {} @ {}",
            self.start_date,
            self.end_date,
            self.day_count.name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::InterpolationMethod;
    use approx::assert_relative_eq;

    #[test]
    fn implied_quote_inverts_the_pricing_identity() {
        let reference = Date::from_ymd(2026, 1, 15).unwrap();
        let end = Date::from_ymd(2026, 7, 15).unwrap();

        // Curve with a known DF at the deposit maturity.
        let df_end = 0.975;
        let curve = TermStructure::new(
            reference,
            vec![(end, df_end)],
            InterpolationMethod::LogLinearDiscount,
        )
        .unwrap();

        let helper = DepositRateHelper::new(
            Quote::new(0.05),
            reference,
            end,
            DayCountConvention::Act360,
        )
        .unwrap();

        let implied = helper.implied_quote(&curve).unwrap();
        let tau = 181.0 / 360.0;
        assert_relative_eq!(implied, (1.0 / df_end - 1.0) / tau, epsilon = 1e-12);
    }

    #[test]
    fn rejects_inverted_period() {
        let start = Date::from_ymd(2026, 7, 15).unwrap();
        let end = Date::from_ymd(2026, 1, 15).unwrap();
        let result =
            DepositRateHelper::new(Quote::new(0.05), start, end, DayCountConvention::Act360);
        assert!(result.is_err());
    }

    #[test]
    fn tracks_quote_updates() {
        let start = Date::from_ymd(2026, 1, 15).unwrap();
        let end = Date::from_ymd(2026, 4, 15).unwrap();
        let quote = Quote::new(0.05);
        let helper =
            DepositRateHelper::new(quote.clone(), start, end, DayCountConvention::Act360).unwrap();

        let before = helper.quote_version();
        quote.set_value(0.055);

        assert_relative_eq!(helper.quote(), 0.055);
        assert!(helper.quote_version() > before);
    }
}
