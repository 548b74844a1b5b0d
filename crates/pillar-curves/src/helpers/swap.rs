//! Par swap helper for the intermediate and long end of the curve.

use pillar_core::daycounts::DayCountConvention;
use pillar_core::types::{Date, Frequency, Quote};
use rust_decimal::prelude::ToPrimitive;

use super::RateHelper;
use crate::error::{CurveError, CurveResult};
use crate::term_structure::TermStructure;

/// A fixed-for-float swap quoted as a par fixed rate.
///
/// Under single-curve discounting the float leg telescopes, so the par
/// rate priced off a curve is
///
/// ```text
/// rate = (DF(start) − DF(end)) / Σ τᵢ × DF(payᵢ)
/// ```
///
/// with the sum running over the generated fixed-leg payment dates.
#[derive(Debug, Clone)]
pub struct SwapRateHelper {
    quote: Quote,
    effective_date: Date,
    maturity_date: Date,
    fixed_frequency: Frequency,
    day_count: DayCountConvention,
    /// Fixed-leg payment dates, generated forward from the effective date.
    payment_dates: Vec<Date>,
}

impl SwapRateHelper {
    /// Creates a swap helper, generating the fixed-leg schedule.
    ///
    /// Payment dates roll forward from the effective date in whole
    /// periods of the fixed frequency; the final stub, if any, pays on
    /// the maturity date.
    ///
    /// # Errors
    ///
    /// Returns an error when the maturity is not strictly after the
    /// effective date, or the frequency is `Once` (no coupon period to
    /// roll by).
    pub fn new(
        quote: Quote,
        effective_date: Date,
        maturity_date: Date,
        fixed_frequency: Frequency,
        day_count: DayCountConvention,
    ) -> CurveResult<Self> {
        if maturity_date <= effective_date {
            return Err(CurveError::invalid_helper(format!(
                "swap maturity {maturity_date} is not after effective date {effective_date}"
            )));
        }
        if fixed_frequency == Frequency::Once {
            return Err(CurveError::invalid_helper(
                "swap fixed leg requires a periodic frequency",
            ));
        }
        let months = fixed_frequency.months_per_period() as i32;

        let mut payment_dates = Vec::new();
        let mut period = 1i32;
        loop {
            let date = effective_date
                .add_months(months * period)
                .map_err(|e| CurveError::invalid_helper(e.to_string()))?;
            if date >= maturity_date {
                payment_dates.push(maturity_date);
                break;
            }
            payment_dates.push(date);
            period += 1;
        }

        Ok(Self {
            quote,
            effective_date,
            maturity_date,
            fixed_frequency,
            day_count,
            payment_dates,
        })
    }

    /// The swap's effective (start) date.
    #[must_use]
    pub fn effective_date(&self) -> Date {
        self.effective_date
    }

    /// The generated fixed-leg payment dates.
    #[must_use]
    pub fn payment_dates(&self) -> &[Date] {
        &self.payment_dates
    }

    /// The fixed-leg frequency.
    #[must_use]
    pub fn fixed_frequency(&self) -> Frequency {
        self.fixed_frequency
    }

    /// Fixed-leg annuity: Σ τᵢ × DF(payᵢ).
    fn annuity(&self, curve: &TermStructure) -> f64 {
        let counter = self.day_count.to_day_count();
        let mut annuity = 0.0;
        let mut accrual_start = self.effective_date;
        for pay_date in &self.payment_dates {
            let tau = counter
                .year_fraction(accrual_start, *pay_date)
                .to_f64()
                .unwrap_or_default();
            annuity += tau * curve.discount_factor(*pay_date);
            accrual_start = *pay_date;
        }
        annuity
    }
}

impl RateHelper for SwapRateHelper {
    fn pillar_date(&self) -> Date {
        self.maturity_date
    }

    fn quote(&self) -> f64 {
        self.quote.value()
    }

    fn implied_quote(&self, curve: &TermStructure) -> CurveResult<f64> {
        let annuity = self.annuity(curve);
        if annuity <= 0.0 {
            return Err(CurveError::invalid_value(format!(
                "non-positive fixed-leg annuity {annuity} for {}",
                self.description()
            )));
        }
        let df_start = curve.discount_factor(self.effective_date);
        let df_end = curve.discount_factor(self.maturity_date);
        Ok((df_start - df_end) / annuity)
    }

    fn quote_version(&self) -> u64 {
        self.quote.version()
    }

    fn description(&self) -> String {
        format!(
            "swap {} -> {} ({} fixed, {})",
            self.effective_date,
            self.maturity_date,
            self.fixed_frequency,
            self.day_count.name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::InterpolationMethod;
    use approx::assert_relative_eq;

    fn flat_curve(reference: Date, rate: f64, years: i32) -> TermStructure {
        let pillars = (1..=years)
            .map(|y| {
                let date = reference.add_years(y).unwrap();
                let t = y as f64;
                (date, (-rate * t).exp())
            })
            .collect();
        TermStructure::new(reference, pillars, InterpolationMethod::LogLinearDiscount).unwrap()
    }

    #[test]
    fn generates_annual_payment_dates() {
        let effective = Date::from_ymd(2026, 1, 15).unwrap();
        let maturity = Date::from_ymd(2031, 1, 15).unwrap();
        let helper = SwapRateHelper::new(
            Quote::new(0.04),
            effective,
            maturity,
            Frequency::Annual,
            DayCountConvention::Thirty360US,
        )
        .unwrap();

        assert_eq!(helper.payment_dates().len(), 5);
        assert_eq!(helper.payment_dates()[0], effective.add_years(1).unwrap());
        assert_eq!(*helper.payment_dates().last().unwrap(), maturity);
    }

    #[test]
    fn stub_period_pays_on_maturity() {
        let effective = Date::from_ymd(2026, 1, 15).unwrap();
        let maturity = Date::from_ymd(2027, 7, 20).unwrap();
        let helper = SwapRateHelper::new(
            Quote::new(0.04),
            effective,
            maturity,
            Frequency::Annual,
            DayCountConvention::Thirty360US,
        )
        .unwrap();

        assert_eq!(helper.payment_dates().len(), 2);
        assert_eq!(*helper.payment_dates().last().unwrap(), maturity);
    }

    #[test]
    fn par_rate_on_flat_curve_is_near_the_flat_rate() {
        let reference = Date::from_ymd(2026, 1, 15).unwrap();
        let curve = flat_curve(reference, 0.04, 10);

        let helper = SwapRateHelper::new(
            Quote::new(0.04),
            reference,
            reference.add_years(10).unwrap(),
            Frequency::Annual,
            DayCountConvention::Act365Fixed,
        )
        .unwrap();

        let implied = helper.implied_quote(&curve).unwrap();
        // Par rate of an annual swap on a 4% continuous flat curve is
        // the annually compounded equivalent, e^0.04 - 1.
        assert_relative_eq!(implied, 0.04_f64.exp() - 1.0, epsilon = 1e-3);
    }

    #[test]
    fn rejects_once_frequency() {
        let effective = Date::from_ymd(2026, 1, 15).unwrap();
        let result = SwapRateHelper::new(
            Quote::new(0.04),
            effective,
            effective.add_years(5).unwrap(),
            Frequency::Once,
            DayCountConvention::Act365Fixed,
        );
        assert!(result.is_err());
    }
}
