//! The bond instrument: a cash flow schedule plus trading conventions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use pillar_core::daycounts::DayCountConvention;
use pillar_core::types::{CashFlow, Date, Schedule};

use crate::cashflows;
use crate::error::{BondError, BondResult};

/// A bond: an immutable cash flow schedule with the conventions needed
/// to trade it.
///
/// The notional schedule records the outstanding face over time, so
/// sinking-fund bonds fit the same type as bullets. Each entry
/// `(until, face)` means `face` is outstanding strictly before `until`;
/// on and after the maturity date the notional is zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bond {
    issue_date: Date,
    settlement_days: u32,
    schedule: Schedule,
    /// `(outstanding until this date, face amount)`, ascending.
    notionals: Vec<(Date, Decimal)>,
    day_count: DayCountConvention,
}

impl Bond {
    /// Creates a coupon bond from a prebuilt schedule.
    ///
    /// The full face stays outstanding until maturity (a bullet). Use
    /// [`with_notionals`](Self::with_notionals) for sinkers.
    ///
    /// # Errors
    ///
    /// Returns an error when the face is not positive or the issue date
    /// is after the schedule's maturity.
    pub fn fixed_rate(
        issue_date: Date,
        settlement_days: u32,
        face: Decimal,
        schedule: Schedule,
        day_count: DayCountConvention,
    ) -> BondResult<Self> {
        if face <= Decimal::ZERO {
            return Err(BondError::invalid_spec(format!(
                "face amount {face} must be positive"
            )));
        }
        let maturity = schedule.maturity_date();
        if issue_date >= maturity {
            return Err(BondError::invalid_spec(format!(
                "issue date {issue_date} is not before maturity {maturity}"
            )));
        }
        Ok(Self {
            issue_date,
            settlement_days,
            schedule,
            notionals: vec![(maturity, face)],
            day_count,
        })
    }

    /// Creates a zero coupon bond redeeming `face` at `maturity`.
    ///
    /// # Errors
    ///
    /// Returns an error when the face is not positive or the maturity is
    /// not after the issue date.
    pub fn zero_coupon(
        issue_date: Date,
        settlement_days: u32,
        face: Decimal,
        maturity: Date,
        day_count: DayCountConvention,
    ) -> BondResult<Self> {
        let schedule = Schedule::new(vec![CashFlow::simple(maturity, face)])?;
        Self::fixed_rate(issue_date, settlement_days, face, schedule, day_count)
    }

    /// Replaces the notional schedule, for sinking-fund bonds.
    ///
    /// # Errors
    ///
    /// Returns an error when the entries are empty, not strictly
    /// ascending in date, non-positive in amount, not decreasing in
    /// amount, or do not end at the bond's maturity.
    pub fn with_notionals(mut self, notionals: Vec<(Date, Decimal)>) -> BondResult<Self> {
        if notionals.is_empty() {
            return Err(BondError::invalid_spec("notional schedule is empty"));
        }
        for pair in notionals.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(BondError::invalid_spec(format!(
                    "notional dates not strictly increasing at {} -> {}",
                    pair[0].0, pair[1].0
                )));
            }
            if pair[1].1 >= pair[0].1 {
                return Err(BondError::invalid_spec(format!(
                    "outstanding face must decrease over time ({} -> {})",
                    pair[0].1, pair[1].1
                )));
            }
        }
        for (date, face) in &notionals {
            if *face <= Decimal::ZERO {
                return Err(BondError::invalid_spec(format!(
                    "outstanding face {face} at {date} must be positive"
                )));
            }
        }
        let last = notionals[notionals.len() - 1].0;
        if last != self.maturity_date() {
            return Err(BondError::invalid_spec(format!(
                "notional schedule ends at {last}, bond matures {}",
                self.maturity_date()
            )));
        }
        self.notionals = notionals;
        Ok(self)
    }

    /// The bond's issue date.
    #[must_use]
    pub fn issue_date(&self) -> Date {
        self.issue_date
    }

    /// Business days between trade and settlement.
    #[must_use]
    pub fn settlement_days(&self) -> u32 {
        self.settlement_days
    }

    /// The cash flow schedule.
    #[must_use]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// The bond's accrual day count convention.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// The final payment date.
    #[must_use]
    pub fn maturity_date(&self) -> Date {
        self.schedule.maturity_date()
    }

    /// The first accrual date of the schedule.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.schedule.start_date()
    }

    /// Settlement date for a trade on `eval_date`: the evaluation date
    /// advanced by the bond's settlement days, skipping weekends.
    #[must_use]
    pub fn settlement_date(&self, eval_date: Date) -> Date {
        eval_date.add_business_days(self.settlement_days)
    }

    /// Outstanding face at a date. Zero on and after maturity.
    #[must_use]
    pub fn notional(&self, date: Date) -> Decimal {
        self.notionals
            .iter()
            .find(|(until, _)| date < *until)
            .map_or(Decimal::ZERO, |(_, face)| *face)
    }

    /// Whether the bond still has outstanding notional at `settlement`.
    #[must_use]
    pub fn is_tradable(&self, settlement: Date) -> bool {
        self.notional(settlement) > Decimal::ZERO
    }

    /// Principal repayments implied by the notional schedule, in date
    /// order. A bullet has a single entry at maturity for the full
    /// face; a sinker repays the steps between consecutive outstanding
    /// amounts.
    #[must_use]
    pub fn redemptions(&self) -> Vec<(Date, Decimal)> {
        self.notionals
            .iter()
            .enumerate()
            .map(|(i, (date, face))| {
                let next = self
                    .notionals
                    .get(i + 1)
                    .map_or(Decimal::ZERO, |(_, f)| *f);
                (*date, *face - next)
            })
            .collect()
    }

    /// Accrued interest at `settlement`, per 100 face.
    #[must_use]
    pub fn accrued_amount(&self, settlement: Date) -> Decimal {
        let notional = self.notional(settlement);
        if notional == Decimal::ZERO {
            return Decimal::ZERO;
        }
        let accrued = cashflows::accrued_amount(&self.schedule, settlement, self.day_count);
        accrued * dec!(100) / notional
    }
}
