//! Interpolated discount curve anchored at a reference date.

use pillar_core::daycounts::DayCountConvention;
use pillar_core::types::{Compounding, Date, Frequency};
use rust_decimal::prelude::ToPrimitive;

use crate::error::{CurveError, CurveResult};
use crate::interpolation::{DiscountInterpolator, InterpolationMethod};

/// An immutable interpolated discount curve.
///
/// Holds `(pillar date, discount factor)` pairs and answers discount,
/// forward, and zero rate queries between and beyond them. The curve is
/// anchored so that `discount_factor(reference_date)` is exactly 1, and
/// dates beyond the last pillar extrapolate flat in the forward rate.
///
/// Discount factor monotonicity is deliberately not enforced: implausible
/// market inputs pass through as implausible curves rather than failing.
///
/// Time is measured from the reference date with Act/365F, the convention
/// used throughout for curve time.
#[derive(Debug, Clone)]
pub struct TermStructure {
    reference_date: Date,
    pillars: Vec<(Date, f64)>,
    interpolation: InterpolationMethod,
    interp: DiscountInterpolator,
}

impl TermStructure {
    /// Creates a term structure from pillar discount factors.
    ///
    /// # Errors
    ///
    /// Returns an error when the pillars are empty, not strictly
    /// increasing, not strictly after the reference date, or carry a
    /// non-positive or non-finite discount factor.
    pub fn new(
        reference_date: Date,
        pillars: Vec<(Date, f64)>,
        interpolation: InterpolationMethod,
    ) -> CurveResult<Self> {
        if pillars.is_empty() {
            return Err(CurveError::insufficient_pillars(1, 0));
        }

        let mut prev = reference_date;
        for (index, (date, df)) in pillars.iter().enumerate() {
            if *date <= prev {
                return Err(CurveError::non_monotonic_pillars(index, prev, *date));
            }
            if !df.is_finite() || *df <= 0.0 {
                return Err(CurveError::invalid_value(format!(
                    "discount factor {df} at pillar {date} is not positive and finite"
                )));
            }
            prev = *date;
        }

        let mut times = Vec::with_capacity(pillars.len() + 1);
        let mut dfs = Vec::with_capacity(pillars.len() + 1);
        times.push(0.0);
        dfs.push(1.0);
        for (date, df) in &pillars {
            times.push(year_fraction(reference_date, *date));
            dfs.push(*df);
        }

        let interp = DiscountInterpolator::new(times, dfs, interpolation)?;

        Ok(Self {
            reference_date,
            pillars,
            interpolation,
            interp,
        })
    }

    /// The curve's anchor date.
    #[must_use]
    pub fn reference_date(&self) -> Date {
        self.reference_date
    }

    /// The interpolation scheme in use.
    #[must_use]
    pub fn interpolation(&self) -> InterpolationMethod {
        self.interpolation
    }

    /// The pillar dates, in ascending order.
    #[must_use]
    pub fn pillar_dates(&self) -> Vec<Date> {
        self.pillars.iter().map(|(date, _)| *date).collect()
    }

    /// The `(pillar date, discount factor)` pairs.
    #[must_use]
    pub fn pillars(&self) -> &[(Date, f64)] {
        &self.pillars
    }

    /// The last pillar date; queries beyond it extrapolate.
    #[must_use]
    pub fn max_date(&self) -> Date {
        self.pillars[self.pillars.len() - 1].0
    }

    /// Discount factor for a date. Exactly 1 on (and before) the
    /// reference date.
    #[must_use]
    pub fn discount_factor(&self, date: Date) -> f64 {
        self.discount_factor_at(year_fraction(self.reference_date, date))
    }

    /// Discount factor at a time in years from the reference date.
    #[must_use]
    pub fn discount_factor_at(&self, t: f64) -> f64 {
        self.interp.discount_factor(t)
    }

    /// Simply compounded forward rate between two dates.
    ///
    /// # Errors
    ///
    /// Returns an error when `end` is not strictly after `start`.
    pub fn forward_rate(&self, start: Date, end: Date) -> CurveResult<f64> {
        if end <= start {
            return Err(CurveError::invalid_value(format!(
                "forward period end {end} is not after start {start}"
            )));
        }
        let tau = year_fraction(start, end);
        let df_start = self.discount_factor(start);
        let df_end = self.discount_factor(end);
        Ok((df_start / df_end - 1.0) / tau)
    }

    /// Zero rate to a date under the given compounding and frequency.
    ///
    /// # Errors
    ///
    /// Returns an error when `date` is not strictly after the reference
    /// date.
    pub fn zero_rate(
        &self,
        date: Date,
        compounding: Compounding,
        frequency: Frequency,
    ) -> CurveResult<f64> {
        let t = year_fraction(self.reference_date, date);
        if t <= 0.0 {
            return Err(CurveError::invalid_value(format!(
                "zero rate requested at {date}, on or before the reference date {}",
                self.reference_date
            )));
        }
        let compound = 1.0 / self.discount_factor_at(t);
        Ok(compounding.implied_rate(compound, t, frequency))
    }

}

/// Curve time: Act/365F year fraction between two dates.
pub(crate) fn year_fraction(start: Date, end: Date) -> f64 {
    DayCountConvention::Act365Fixed
        .to_day_count()
        .year_fraction(start, end)
        .to_f64()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn curve() -> TermStructure {
        let reference = Date::from_ymd(2026, 1, 15).unwrap();
        let pillars = vec![
            (Date::from_ymd(2027, 1, 15).unwrap(), 0.96),
            (Date::from_ymd(2028, 1, 15).unwrap(), 0.92),
            (Date::from_ymd(2031, 1, 15).unwrap(), 0.80),
        ];
        TermStructure::new(reference, pillars, InterpolationMethod::LogLinearDiscount).unwrap()
    }

    #[test]
    fn reference_date_discounts_to_one() {
        let curve = curve();
        assert_eq!(curve.discount_factor(curve.reference_date()), 1.0);
        assert_eq!(curve.discount_factor_at(0.0), 1.0);
    }

    #[test]
    fn pillar_dates_reproduce_inputs() {
        let curve = curve();
        assert_relative_eq!(
            curve.discount_factor(Date::from_ymd(2028, 1, 15).unwrap()),
            0.92,
            epsilon = 1e-12
        );
        assert_eq!(curve.max_date(), Date::from_ymd(2031, 1, 15).unwrap());
        assert_eq!(curve.pillar_dates().len(), 3);
    }

    #[test]
    fn rejects_pillar_on_reference_date() {
        let reference = Date::from_ymd(2026, 1, 15).unwrap();
        let result = TermStructure::new(
            reference,
            vec![(reference, 1.0)],
            InterpolationMethod::default(),
        );
        assert!(matches!(result, Err(CurveError::NonMonotonicPillars { .. })));
    }

    #[test]
    fn rejects_unordered_pillars() {
        let reference = Date::from_ymd(2026, 1, 15).unwrap();
        let result = TermStructure::new(
            reference,
            vec![
                (Date::from_ymd(2028, 1, 15).unwrap(), 0.92),
                (Date::from_ymd(2027, 1, 15).unwrap(), 0.96),
            ],
            InterpolationMethod::default(),
        );
        assert!(matches!(result, Err(CurveError::NonMonotonicPillars { .. })));
    }

    #[test]
    fn forward_rate_matches_discount_ratio() {
        let curve = curve();
        let d1 = Date::from_ymd(2027, 1, 15).unwrap();
        let d2 = Date::from_ymd(2028, 1, 15).unwrap();

        let fwd = curve.forward_rate(d1, d2).unwrap();
        let tau = year_fraction(d1, d2);
        assert_relative_eq!(1.0 + fwd * tau, 0.96 / 0.92, epsilon = 1e-12);

        assert!(curve.forward_rate(d2, d1).is_err());
    }

    #[test]
    fn zero_rate_inverts_discounting() {
        let curve = curve();
        let date = Date::from_ymd(2028, 1, 15).unwrap();
        let rate = curve
            .zero_rate(date, Compounding::Continuous, Frequency::Annual)
            .unwrap();

        let t = year_fraction(curve.reference_date(), date);
        assert_relative_eq!((-rate * t).exp(), 0.92, epsilon = 1e-12);
    }

    #[test]
    fn extrapolation_continues_last_forward() {
        let curve = curve();
        let beyond = Date::from_ymd(2033, 1, 15).unwrap();
        let df = curve.discount_factor(beyond);
        assert!(df > 0.0 && df < 0.80);
    }
}
