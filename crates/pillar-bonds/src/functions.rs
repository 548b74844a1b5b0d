//! Bond-level analytics adapter.
//!
//! [`BondFunctions`] carries an evaluation date and wraps the schedule
//! analytics in [`crate::cashflows`] with the bond-specific plumbing:
//! settlement resolution, tradability checks, and per-100-face price
//! conversions.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use pillar_core::types::{Compounding, Date, Frequency, InterestRate};
use pillar_curves::term_structure::TermStructure;

use crate::bond::Bond;
use crate::cashflows::{self, DurationType};
use crate::error::{BondError, BondResult};

/// Default yield solver accuracy.
pub const DEFAULT_ACCURACY: f64 = 1e-10;
/// Default yield solver iteration budget.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Bond analytics relative to an evaluation date.
///
/// Every operation resolves its settlement date, either the explicit
/// one the caller passes or the bond's own rule applied to the
/// evaluation date, and fails with [`BondError::NotTradable`] when the
/// bond has no outstanding notional there. Prices are quoted per 100
/// face; `dirty = clean + accrued` throughout.
#[derive(Debug, Clone, Copy)]
pub struct BondFunctions {
    evaluation_date: Date,
}

impl BondFunctions {
    /// Creates an analytics context as of `evaluation_date`.
    #[must_use]
    pub fn new(evaluation_date: Date) -> Self {
        Self { evaluation_date }
    }

    /// The evaluation date this context resolves settlements from.
    #[must_use]
    pub fn evaluation_date(&self) -> Date {
        self.evaluation_date
    }

    /// The bond's first accrual date.
    #[must_use]
    pub fn start_date(&self, bond: &Bond) -> Date {
        bond.start_date()
    }

    /// The bond's final payment date.
    #[must_use]
    pub fn maturity_date(&self, bond: &Bond) -> Date {
        bond.maturity_date()
    }

    /// Whether the bond trades at the resolved settlement date.
    #[must_use]
    pub fn is_tradable(&self, bond: &Bond, settlement: Option<Date>) -> bool {
        bond.is_tradable(self.resolve(bond, settlement))
    }

    /// The last cash flow date on or before settlement, if any.
    #[must_use]
    pub fn previous_cash_flow_date(&self, bond: &Bond, settlement: Option<Date>) -> Option<Date> {
        let settlement = self.resolve(bond, settlement);
        bond.schedule().previous_flow(settlement).map(|cf| cf.date())
    }

    /// The first cash flow date strictly after settlement, if any.
    #[must_use]
    pub fn next_cash_flow_date(&self, bond: &Bond, settlement: Option<Date>) -> Option<Date> {
        let settlement = self.resolve(bond, settlement);
        bond.schedule().next_flow(settlement).map(|cf| cf.date())
    }

    /// Rate of the last coupon paid on or before settlement.
    ///
    /// `None` when no coupon has been paid yet, or when the flow in
    /// question carries no rate (a redemption).
    ///
    /// # Errors
    ///
    /// Fails when the bond is not tradable at settlement.
    pub fn previous_coupon_rate(
        &self,
        bond: &Bond,
        settlement: Option<Date>,
    ) -> BondResult<Option<Decimal>> {
        let settlement = self.ensure_tradable(bond, settlement)?;
        Ok(bond
            .schedule()
            .previous_flow(settlement)
            .and_then(|cf| cf.rate()))
    }

    /// Rate of the coupon currently accruing, the first flow strictly
    /// after settlement.
    ///
    /// `None` when that flow carries no rate (a zero coupon's
    /// redemption).
    ///
    /// # Errors
    ///
    /// Fails when the bond is not tradable at settlement.
    pub fn next_coupon_rate(
        &self,
        bond: &Bond,
        settlement: Option<Date>,
    ) -> BondResult<Option<Decimal>> {
        let settlement = self.ensure_tradable(bond, settlement)?;
        Ok(bond
            .schedule()
            .next_flow(settlement)
            .and_then(|cf| cf.rate()))
    }

    /// Accrual start of the coupon period containing settlement.
    ///
    /// # Errors
    ///
    /// Fails when the bond is not tradable at settlement.
    pub fn accrual_start_date(&self, bond: &Bond, settlement: Option<Date>) -> BondResult<Option<Date>> {
        let settlement = self.ensure_tradable(bond, settlement)?;
        Ok(current_period(bond, settlement).map(|(start, _)| start))
    }

    /// Accrual end of the coupon period containing settlement.
    ///
    /// # Errors
    ///
    /// Fails when the bond is not tradable at settlement.
    pub fn accrual_end_date(&self, bond: &Bond, settlement: Option<Date>) -> BondResult<Option<Date>> {
        let settlement = self.ensure_tradable(bond, settlement)?;
        Ok(current_period(bond, settlement).map(|(_, end)| end))
    }

    /// Accrued interest per 100 face at settlement.
    ///
    /// # Errors
    ///
    /// Fails when the bond is not tradable at settlement.
    pub fn accrued_amount(&self, bond: &Bond, settlement: Option<Date>) -> BondResult<Decimal> {
        let settlement = self.ensure_tradable(bond, settlement)?;
        Ok(bond.accrued_amount(settlement))
    }

    /// Days of accrual elapsed in the current coupon period, under the
    /// bond's day counter.
    ///
    /// # Errors
    ///
    /// Fails when the bond is not tradable at settlement.
    pub fn accrued_days(&self, bond: &Bond, settlement: Option<Date>) -> BondResult<i64> {
        let settlement = self.ensure_tradable(bond, settlement)?;
        Ok(current_period(bond, settlement)
            .filter(|(start, _)| *start < settlement)
            .map_or(0, |(start, _)| {
                bond.day_count().to_day_count().day_count(start, settlement)
            }))
    }

    /// Dirty price per 100 face off a discount curve.
    ///
    /// # Errors
    ///
    /// Fails when the bond is not tradable at settlement.
    pub fn dirty_price(
        &self,
        bond: &Bond,
        curve: &TermStructure,
        settlement: Option<Date>,
    ) -> BondResult<f64> {
        let settlement = self.ensure_tradable(bond, settlement)?;
        let value = cashflows::npv(bond.schedule(), curve, settlement);
        self.to_price_per_100(bond, settlement, value)
    }

    /// Clean price per 100 face off a discount curve.
    ///
    /// # Errors
    ///
    /// Fails when the bond is not tradable at settlement.
    pub fn clean_price(
        &self,
        bond: &Bond,
        curve: &TermStructure,
        settlement: Option<Date>,
    ) -> BondResult<f64> {
        let settlement = self.ensure_tradable(bond, settlement)?;
        let dirty = self.dirty_price(bond, curve, Some(settlement))?;
        Ok(dirty - accrued_f64(bond, settlement))
    }

    /// Dirty price per 100 face at a flat yield.
    ///
    /// # Errors
    ///
    /// Fails when the bond is not tradable at settlement.
    pub fn dirty_price_from_yield(
        &self,
        bond: &Bond,
        rate: &InterestRate,
        settlement: Option<Date>,
    ) -> BondResult<f64> {
        let settlement = self.ensure_tradable(bond, settlement)?;
        let value = cashflows::npv_at_rate(bond.schedule(), rate, settlement);
        self.to_price_per_100(bond, settlement, value)
    }

    /// Clean price per 100 face at a flat yield.
    ///
    /// # Errors
    ///
    /// Fails when the bond is not tradable at settlement.
    pub fn clean_price_from_yield(
        &self,
        bond: &Bond,
        rate: &InterestRate,
        settlement: Option<Date>,
    ) -> BondResult<f64> {
        let settlement = self.ensure_tradable(bond, settlement)?;
        let dirty = self.dirty_price_from_yield(bond, rate, Some(settlement))?;
        Ok(dirty - accrued_f64(bond, settlement))
    }

    /// Dirty price per 100 face off a curve plus a constant z-spread.
    ///
    /// # Errors
    ///
    /// Fails when the bond is not tradable at settlement.
    pub fn dirty_price_with_spread(
        &self,
        bond: &Bond,
        curve: &TermStructure,
        spread: f64,
        compounding: Compounding,
        frequency: Frequency,
        settlement: Option<Date>,
    ) -> BondResult<f64> {
        let settlement = self.ensure_tradable(bond, settlement)?;
        let value = cashflows::npv_with_spread(
            bond.schedule(),
            curve,
            spread,
            bond.day_count(),
            compounding,
            frequency,
            settlement,
        );
        self.to_price_per_100(bond, settlement, value)
    }

    /// Clean price per 100 face off a curve plus a constant z-spread.
    ///
    /// # Errors
    ///
    /// Fails when the bond is not tradable at settlement.
    #[allow(clippy::too_many_arguments)]
    pub fn clean_price_with_spread(
        &self,
        bond: &Bond,
        curve: &TermStructure,
        spread: f64,
        compounding: Compounding,
        frequency: Frequency,
        settlement: Option<Date>,
    ) -> BondResult<f64> {
        let settlement = self.ensure_tradable(bond, settlement)?;
        let dirty =
            self.dirty_price_with_spread(bond, curve, spread, compounding, frequency, Some(settlement))?;
        Ok(dirty - accrued_f64(bond, settlement))
    }

    /// Converts a clean price to dirty at settlement.
    ///
    /// # Errors
    ///
    /// Fails when the bond is not tradable at settlement.
    pub fn clean_to_dirty(
        &self,
        bond: &Bond,
        clean_price: f64,
        settlement: Option<Date>,
    ) -> BondResult<f64> {
        let settlement = self.ensure_tradable(bond, settlement)?;
        Ok(clean_price + accrued_f64(bond, settlement))
    }

    /// Converts a dirty price to clean at settlement.
    ///
    /// # Errors
    ///
    /// Fails when the bond is not tradable at settlement.
    pub fn dirty_to_clean(
        &self,
        bond: &Bond,
        dirty_price: f64,
        settlement: Option<Date>,
    ) -> BondResult<f64> {
        let settlement = self.ensure_tradable(bond, settlement)?;
        Ok(dirty_price - accrued_f64(bond, settlement))
    }

    /// Yield implied by a clean price.
    ///
    /// # Errors
    ///
    /// Fails when the bond is not tradable at settlement or the yield
    /// search does not converge.
    #[allow(clippy::too_many_arguments)]
    pub fn bond_yield(
        &self,
        bond: &Bond,
        clean_price: f64,
        compounding: Compounding,
        frequency: Frequency,
        settlement: Option<Date>,
        accuracy: f64,
        max_iterations: u32,
        guess: f64,
    ) -> BondResult<InterestRate> {
        let settlement = self.ensure_tradable(bond, settlement)?;
        let dirty = clean_price + accrued_f64(bond, settlement);
        let target = dirty * notional_f64(bond, settlement) / 100.0;
        cashflows::yield_from_npv(
            bond.schedule(),
            target,
            bond.day_count(),
            compounding,
            frequency,
            settlement,
            accuracy,
            max_iterations,
            guess,
        )
    }

    /// Duration at a flat yield.
    ///
    /// # Errors
    ///
    /// Fails when the bond is not tradable at settlement.
    pub fn duration(
        &self,
        bond: &Bond,
        rate: &InterestRate,
        duration_type: DurationType,
        settlement: Option<Date>,
    ) -> BondResult<f64> {
        let settlement = self.ensure_tradable(bond, settlement)?;
        Ok(cashflows::duration(
            bond.schedule(),
            rate,
            duration_type,
            settlement,
        ))
    }

    /// Convexity at a flat yield.
    ///
    /// # Errors
    ///
    /// Fails when the bond is not tradable at settlement.
    pub fn convexity(
        &self,
        bond: &Bond,
        rate: &InterestRate,
        settlement: Option<Date>,
    ) -> BondResult<f64> {
        let settlement = self.ensure_tradable(bond, settlement)?;
        Ok(cashflows::convexity(bond.schedule(), rate, settlement))
    }

    /// Constant spread over the curve implied by a clean price.
    ///
    /// # Errors
    ///
    /// Fails when the bond is not tradable at settlement or the spread
    /// search does not converge.
    #[allow(clippy::too_many_arguments)]
    pub fn z_spread(
        &self,
        bond: &Bond,
        clean_price: f64,
        curve: &TermStructure,
        compounding: Compounding,
        frequency: Frequency,
        settlement: Option<Date>,
        accuracy: f64,
        max_iterations: u32,
        guess: f64,
    ) -> BondResult<f64> {
        let settlement = self.ensure_tradable(bond, settlement)?;
        let dirty = clean_price + accrued_f64(bond, settlement);
        let target = dirty * notional_f64(bond, settlement) / 100.0;
        cashflows::z_spread(
            bond.schedule(),
            curve,
            target,
            bond.day_count(),
            compounding,
            frequency,
            settlement,
            accuracy,
            max_iterations,
            guess,
        )
    }

    /// Value of one basis point over the remaining coupon periods, per
    /// 100 face.
    ///
    /// # Errors
    ///
    /// Fails when the bond is not tradable at settlement.
    pub fn basis_point_sensitivity(
        &self,
        bond: &Bond,
        curve: &TermStructure,
        settlement: Option<Date>,
    ) -> BondResult<f64> {
        let settlement = self.ensure_tradable(bond, settlement)?;
        let value = cashflows::bps(bond.schedule(), curve, settlement, bond.day_count());
        self.to_price_per_100(bond, settlement, value)
    }

    /// Weighted average life of a repayment stream, as a date.
    ///
    /// Weights each future repayment by its Act/365F distance from
    /// `today` and rounds the average to the nearest day. Amounts on or
    /// before `today` are ignored; with nothing left, `today` itself
    /// comes back.
    ///
    /// # Errors
    ///
    /// Fails when `amounts` and `dates` differ in length.
    pub fn weighted_average_life(
        today: Date,
        amounts: &[Decimal],
        dates: &[Date],
    ) -> BondResult<Date> {
        if amounts.len() != dates.len() {
            return Err(BondError::mismatched_amounts(amounts.len(), dates.len()));
        }

        let mut weighted = 0.0;
        let mut total = 0.0;
        for (amount, date) in amounts.iter().zip(dates) {
            if *date <= today {
                continue;
            }
            let amount = amount.to_f64().unwrap_or_default();
            if amount == 0.0 {
                continue;
            }
            let t = today.days_between(date) as f64 / 365.0;
            weighted += amount * t;
            total += amount;
        }

        if total == 0.0 {
            return Ok(today);
        }

        let days = (weighted / total * 365.0).round() as i64;
        Ok(today.add_days(days))
    }

    fn resolve(&self, bond: &Bond, settlement: Option<Date>) -> Date {
        settlement.unwrap_or_else(|| bond.settlement_date(self.evaluation_date))
    }

    fn ensure_tradable(&self, bond: &Bond, settlement: Option<Date>) -> BondResult<Date> {
        let settlement = self.resolve(bond, settlement);
        if !bond.is_tradable(settlement) {
            return Err(BondError::not_tradable(settlement, bond.maturity_date()));
        }
        Ok(settlement)
    }

    fn to_price_per_100(&self, bond: &Bond, settlement: Date, value: f64) -> BondResult<f64> {
        let notional = notional_f64(bond, settlement);
        if notional <= 0.0 {
            return Err(BondError::not_tradable(settlement, bond.maturity_date()));
        }
        Ok(value * 100.0 / notional)
    }
}

/// The accrual period `(start, end)` containing the settlement date,
/// taken from the next coupon flow.
fn current_period(bond: &Bond, settlement: Date) -> Option<(Date, Date)> {
    bond.schedule()
        .flows_after(settlement)
        .find_map(|cf| match (cf.accrual_start(), cf.accrual_end()) {
            (Some(start), Some(end)) if start <= settlement && settlement < end => {
                Some((start, end))
            }
            _ => None,
        })
}

fn accrued_f64(bond: &Bond, settlement: Date) -> f64 {
    bond.accrued_amount(settlement).to_f64().unwrap_or_default()
}

fn notional_f64(bond: &Bond, settlement: Date) -> f64 {
    bond.notional(settlement).to_f64().unwrap_or_default()
}
