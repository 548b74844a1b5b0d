//! Cash flow and schedule types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// A single dated cash flow.
///
/// Immutable once scheduled. Coupon flows carry their accrual period and
/// rate so accrued interest can be pro-rated without re-deriving the
/// schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlow {
    /// Payment date.
    date: Date,
    /// Cash flow amount.
    amount: Decimal,
    /// Accrual period start (coupons only).
    accrual_start: Option<Date>,
    /// Accrual period end (coupons only).
    accrual_end: Option<Date>,
    /// Annualized coupon rate backing this flow, if any.
    rate: Option<Decimal>,
}

impl CashFlow {
    /// Creates a flow with no accrual information (redemption, fee).
    #[must_use]
    pub fn simple(date: Date, amount: Decimal) -> Self {
        Self {
            date,
            amount,
            accrual_start: None,
            accrual_end: None,
            rate: None,
        }
    }

    /// Creates a coupon flow with its accrual period and rate.
    #[must_use]
    pub fn coupon(
        date: Date,
        amount: Decimal,
        accrual_start: Date,
        accrual_end: Date,
        rate: Decimal,
    ) -> Self {
        Self {
            date,
            amount,
            accrual_start: Some(accrual_start),
            accrual_end: Some(accrual_end),
            rate: Some(rate),
        }
    }

    /// Returns the payment date.
    #[must_use]
    pub fn date(&self) -> Date {
        self.date
    }

    /// Returns the amount.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the accrual period start, if this is a coupon.
    #[must_use]
    pub fn accrual_start(&self) -> Option<Date> {
        self.accrual_start
    }

    /// Returns the accrual period end, if this is a coupon.
    #[must_use]
    pub fn accrual_end(&self) -> Option<Date> {
        self.accrual_end
    }

    /// Returns the coupon rate, if any.
    #[must_use]
    pub fn rate(&self) -> Option<Decimal> {
        self.rate
    }

    /// Returns true if the flow carries an accrual period.
    #[must_use]
    pub fn is_coupon(&self) -> bool {
        self.accrual_start.is_some() && self.accrual_end.is_some()
    }
}

impl fmt::Display for CashFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.amount)
    }
}

/// An ordered cash flow schedule.
///
/// Invariant: payment dates strictly increasing; the last entry is the
/// redemption flow. Validated at construction, immutable afterwards.
///
/// # Example
///
/// ```rust
/// use pillar_core::types::{CashFlow, Date, Schedule};
/// use rust_decimal_macros::dec;
///
/// let schedule = Schedule::new(vec![
///     CashFlow::simple(Date::from_ymd(2026, 1, 15).unwrap(), dec!(2.5)),
///     CashFlow::simple(Date::from_ymd(2026, 7, 15).unwrap(), dec!(102.5)),
/// ]).unwrap();
/// assert_eq!(schedule.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    flows: Vec<CashFlow>,
}

impl Schedule {
    /// Creates a schedule, validating the date ordering invariant.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidSchedule` if the schedule is empty or the
    /// dates are not strictly increasing (duplicate dates on the same
    /// instrument are disallowed).
    pub fn new(flows: Vec<CashFlow>) -> CoreResult<Self> {
        if flows.is_empty() {
            return Err(CoreError::invalid_schedule("schedule has no cash flows"));
        }
        for pair in flows.windows(2) {
            if pair[1].date() <= pair[0].date() {
                return Err(CoreError::invalid_schedule(format!(
                    "dates not strictly increasing at {} -> {}",
                    pair[0].date(),
                    pair[1].date()
                )));
            }
        }
        Ok(Self { flows })
    }

    /// Returns the number of flows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// Returns true if the schedule is empty (never, by construction).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Returns the flows as a slice.
    #[must_use]
    pub fn flows(&self) -> &[CashFlow] {
        &self.flows
    }

    /// Iterates over the flows in date order.
    pub fn iter(&self) -> std::slice::Iter<'_, CashFlow> {
        self.flows.iter()
    }

    /// The first accrual start if present, else the first payment date.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.flows[0]
            .accrual_start()
            .unwrap_or_else(|| self.flows[0].date())
    }

    /// The final payment date (the redemption flow).
    #[must_use]
    pub fn maturity_date(&self) -> Date {
        self.flows[self.flows.len() - 1].date()
    }

    /// Flows strictly after the given date.
    ///
    /// Flows on the date itself are excluded: a payment on the computation
    /// date belongs to the seller.
    pub fn flows_after(&self, date: Date) -> impl Iterator<Item = &CashFlow> {
        self.flows.iter().filter(move |cf| cf.date() > date)
    }

    /// The last flow on or before the given date, if any.
    #[must_use]
    pub fn previous_flow(&self, date: Date) -> Option<&CashFlow> {
        self.flows.iter().rev().find(|cf| cf.date() <= date)
    }

    /// The first flow strictly after the given date, if any.
    #[must_use]
    pub fn next_flow(&self, date: Date) -> Option<&CashFlow> {
        self.flows.iter().find(|cf| cf.date() > date)
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a CashFlow;
    type IntoIter = std::slice::Iter<'a, CashFlow>;

    fn into_iter(self) -> Self::IntoIter {
        self.flows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_schedule_rejects_empty() {
        assert!(Schedule::new(vec![]).is_err());
    }

    #[test]
    fn test_schedule_rejects_duplicate_dates() {
        let flows = vec![
            CashFlow::simple(d(2026, 1, 15), dec!(2.5)),
            CashFlow::simple(d(2026, 1, 15), dec!(2.5)),
        ];
        assert!(Schedule::new(flows).is_err());
    }

    #[test]
    fn test_schedule_rejects_out_of_order() {
        let flows = vec![
            CashFlow::simple(d(2026, 7, 15), dec!(2.5)),
            CashFlow::simple(d(2026, 1, 15), dec!(102.5)),
        ];
        assert!(Schedule::new(flows).is_err());
    }

    #[test]
    fn test_flows_after_excludes_same_day() {
        let schedule = Schedule::new(vec![
            CashFlow::simple(d(2026, 1, 15), dec!(2.5)),
            CashFlow::simple(d(2026, 7, 15), dec!(102.5)),
        ])
        .unwrap();

        let after: Vec<_> = schedule.flows_after(d(2026, 1, 15)).collect();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].date(), d(2026, 7, 15));
    }

    #[test]
    fn test_maturity_and_start() {
        let schedule = Schedule::new(vec![
            CashFlow::coupon(d(2026, 1, 15), dec!(2.5), d(2025, 7, 15), d(2026, 1, 15), dec!(0.05)),
            CashFlow::simple(d(2026, 7, 15), dec!(102.5)),
        ])
        .unwrap();

        assert_eq!(schedule.start_date(), d(2025, 7, 15));
        assert_eq!(schedule.maturity_date(), d(2026, 7, 15));
    }

    #[test]
    fn test_previous_and_next_flow() {
        let schedule = Schedule::new(vec![
            CashFlow::simple(d(2026, 1, 15), dec!(2.5)),
            CashFlow::simple(d(2026, 7, 15), dec!(102.5)),
        ])
        .unwrap();

        assert_eq!(
            schedule.previous_flow(d(2026, 3, 1)).unwrap().date(),
            d(2026, 1, 15)
        );
        assert_eq!(
            schedule.next_flow(d(2026, 3, 1)).unwrap().date(),
            d(2026, 7, 15)
        );
        assert!(schedule.previous_flow(d(2025, 1, 1)).is_none());
        assert!(schedule.next_flow(d(2027, 1, 1)).is_none());
    }
}
