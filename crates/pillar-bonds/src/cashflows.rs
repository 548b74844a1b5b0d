//! Cash flow analytics: present value, yield, risk measures, accrued.
//!
//! Free functions over a [`Schedule`], all relative to a settlement
//! date. Flows on or before the settlement date belong to the seller and
//! are excluded throughout.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use pillar_core::daycounts::DayCountConvention;
use pillar_core::types::{Compounding, Date, Frequency, InterestRate, Schedule};
use pillar_curves::term_structure::TermStructure;
use pillar_math::solvers::{hybrid, hybrid_numerical, SolverConfig};

use crate::error::BondResult;

/// Bump size for numeric rate derivatives.
const RATE_BUMP: f64 = 1e-6;

/// Duration measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationType {
    /// Discounted-cash-flow weighted average time: Σ t·c·DF / Σ c·DF.
    Simple,
    /// Weighted average time to each flow: modified duration grossed up
    /// by one period's growth, except under continuous compounding
    /// where the two coincide.
    Macaulay,
    /// Price sensitivity: −(dNPV/dy) / NPV.
    Modified,
}

/// Present value of the remaining flows off a discount curve.
///
/// Discounts every flow after `settlement` and rebases to the
/// settlement date, so the result is a settlement-date value regardless
/// of the curve's reference date.
#[must_use]
pub fn npv(schedule: &Schedule, curve: &TermStructure, settlement: Date) -> f64 {
    let df_settlement = curve.discount_factor(settlement);
    let value: f64 = schedule
        .flows_after(settlement)
        .map(|cf| amount_f64(cf.amount()) * curve.discount_factor(cf.date()))
        .sum();
    value / df_settlement
}

/// Present value of the remaining flows at a flat yield.
#[must_use]
pub fn npv_at_rate(schedule: &Schedule, rate: &InterestRate, settlement: Date) -> f64 {
    schedule
        .flows_after(settlement)
        .map(|cf| {
            let t = rate.year_fraction(settlement, cf.date());
            amount_f64(cf.amount()) * rate.discount_factor(t)
        })
        .sum()
}

/// Basis point sensitivity: the value of one basis point paid over the
/// remaining accrual periods.
///
/// Sums `τᵢ × DF(payᵢ)` over the coupon flows after `settlement` (the
/// unit-coupon annuity) and scales by 1e-4. Redemption flows carry no
/// accrual period and do not contribute.
#[must_use]
pub fn bps(
    schedule: &Schedule,
    curve: &TermStructure,
    settlement: Date,
    day_count: DayCountConvention,
) -> f64 {
    let counter = day_count.to_day_count();
    let df_settlement = curve.discount_factor(settlement);
    let annuity: f64 = schedule
        .flows_after(settlement)
        .filter_map(|cf| {
            let (start, end) = (cf.accrual_start()?, cf.accrual_end()?);
            let tau = counter.year_fraction(start, end).to_f64()?;
            Some(tau * curve.discount_factor(cf.date()))
        })
        .sum();
    annuity / df_settlement * 1e-4
}

/// Basis point sensitivity at a flat yield.
///
/// Flat-yield twin of [`bps`]: the unit-coupon annuity is discounted
/// under the rate's own compounding and day count.
#[must_use]
pub fn bps_at_rate(schedule: &Schedule, rate: &InterestRate, settlement: Date) -> f64 {
    let counter = rate.day_count().to_day_count();
    let annuity: f64 = schedule
        .flows_after(settlement)
        .filter_map(|cf| {
            let (start, end) = (cf.accrual_start()?, cf.accrual_end()?);
            let tau = counter.year_fraction(start, end).to_f64()?;
            let t = rate.year_fraction(settlement, cf.date());
            Some(tau * rate.discount_factor(t))
        })
        .sum();
    annuity * 1e-4
}

/// Solves for the flat yield that reprices the schedule to `target_npv`.
///
/// Newton with the analytic dNPV/dy (the duration engine) backed by
/// bisection; `SimpleThenCompounded` falls back to a numerical
/// derivative since its kink breaks the analytic form.
///
/// # Errors
///
/// Propagates solver convergence failures.
#[allow(clippy::too_many_arguments)]
pub fn yield_from_npv(
    schedule: &Schedule,
    target_npv: f64,
    day_count: DayCountConvention,
    compounding: Compounding,
    frequency: Frequency,
    settlement: Date,
    accuracy: f64,
    max_iterations: u32,
    guess: f64,
) -> BondResult<InterestRate> {
    let template = InterestRate::new(guess, day_count, compounding, frequency);
    let config = SolverConfig::new(accuracy, max_iterations);
    // Deeply negative yields blow up periodic compounding; cap the
    // search to a sane trading range.
    let bounds = Some((-0.5, 5.0));

    let objective = |y: f64| npv_at_rate(schedule, &template.with_rate(y), settlement) - target_npv;

    let result = if compounding == Compounding::SimpleThenCompounded {
        hybrid_numerical(objective, guess, bounds, &config)?
    } else {
        let derivative = |y: f64| {
            let rate = template.with_rate(y);
            schedule
                .flows_after(settlement)
                .map(|cf| {
                    let t = rate.year_fraction(settlement, cf.date());
                    amount_f64(cf.amount()) * discount_derivative(&rate, t)
                })
                .sum()
        };
        hybrid(objective, derivative, guess, bounds, &config)?
    };

    Ok(template.with_rate(result.root))
}

/// Duration of the remaining flows at a flat yield.
///
/// Returns 0 when nothing remains after `settlement`.
#[must_use]
pub fn duration(
    schedule: &Schedule,
    rate: &InterestRate,
    duration_type: DurationType,
    settlement: Date,
) -> f64 {
    let value = npv_at_rate(schedule, rate, settlement);
    if value == 0.0 {
        return 0.0;
    }

    match duration_type {
        DurationType::Simple => {
            let weighted: f64 = schedule
                .flows_after(settlement)
                .map(|cf| {
                    let t = rate.year_fraction(settlement, cf.date());
                    t * amount_f64(cf.amount()) * rate.discount_factor(t)
                })
                .sum();
            weighted / value
        }
        DurationType::Modified => -npv_derivative(schedule, rate, settlement) / value,
        DurationType::Macaulay => {
            let modified = -npv_derivative(schedule, rate, settlement) / value;
            match rate.compounding() {
                // d(e^-yt)/dy = -t e^-yt, so the weighted average time
                // is the modified duration itself.
                Compounding::Continuous => modified,
                _ => {
                    let f = f64::from(rate.frequency().periods_per_year());
                    modified * (1.0 + rate.rate() / f)
                }
            }
        }
    }
}

/// Convexity of the remaining flows: d²NPV/dy² ÷ NPV.
///
/// Returns 0 when nothing remains after `settlement`.
#[must_use]
pub fn convexity(schedule: &Schedule, rate: &InterestRate, settlement: Date) -> f64 {
    let value = npv_at_rate(schedule, rate, settlement);
    if value == 0.0 {
        return 0.0;
    }

    let second = if rate.compounding() == Compounding::SimpleThenCompounded {
        let h = RATE_BUMP;
        let up = npv_at_rate(schedule, &rate.with_rate(rate.rate() + h), settlement);
        let down = npv_at_rate(schedule, &rate.with_rate(rate.rate() - h), settlement);
        (up - 2.0 * value + down) / (h * h)
    } else {
        schedule
            .flows_after(settlement)
            .map(|cf| {
                let t = rate.year_fraction(settlement, cf.date());
                amount_f64(cf.amount()) * discount_second_derivative(rate, t)
            })
            .sum()
    };

    second / value
}

/// Present value with a constant spread over the curve's zero rates.
///
/// Each flow is rediscounted at `z(t) + spread` under the given
/// compounding, where `z(t)` is the settlement-relative zero rate the
/// curve implies for the flow date.
#[must_use]
pub fn npv_with_spread(
    schedule: &Schedule,
    curve: &TermStructure,
    spread: f64,
    day_count: DayCountConvention,
    compounding: Compounding,
    frequency: Frequency,
    settlement: Date,
) -> f64 {
    let counter = day_count.to_day_count();
    let df_settlement = curve.discount_factor(settlement);

    schedule
        .flows_after(settlement)
        .map(|cf| {
            let t = counter
                .year_fraction(settlement, cf.date())
                .to_f64()
                .unwrap_or_default();
            if t <= 0.0 {
                return amount_f64(cf.amount());
            }
            let df_curve = curve.discount_factor(cf.date()) / df_settlement;
            let zero = compounding.implied_rate(1.0 / df_curve, t, frequency);
            amount_f64(cf.amount()) * compounding.discount_factor(zero + spread, t, frequency)
        })
        .sum()
}

/// Solves for the constant spread over the curve that reprices the
/// schedule to `target_npv`.
///
/// # Errors
///
/// Propagates solver convergence failures.
#[allow(clippy::too_many_arguments)]
pub fn z_spread(
    schedule: &Schedule,
    curve: &TermStructure,
    target_npv: f64,
    day_count: DayCountConvention,
    compounding: Compounding,
    frequency: Frequency,
    settlement: Date,
    accuracy: f64,
    max_iterations: u32,
    guess: f64,
) -> BondResult<f64> {
    let config = SolverConfig::new(accuracy, max_iterations);
    let objective = |s: f64| {
        npv_with_spread(
            schedule,
            curve,
            s,
            day_count,
            compounding,
            frequency,
            settlement,
        ) - target_npv
    };

    let result = hybrid_numerical(objective, guess, Some((-0.5, 5.0)), &config)?;
    Ok(result.root)
}

/// Accrued interest at `settlement`, in the schedule's money units.
///
/// Locates the coupon whose accrual period strictly contains the
/// settlement date and pro-rates its amount by the elapsed year
/// fraction. Returns zero when no period contains the date, when the
/// period is degenerate, or when the settlement falls exactly on a
/// period boundary (the coupon just paid is already excluded from value,
/// and nothing of the next period has accrued).
#[must_use]
pub fn accrued_amount(
    schedule: &Schedule,
    settlement: Date,
    day_count: DayCountConvention,
) -> Decimal {
    let counter = day_count.to_day_count();

    for cf in schedule.flows_after(settlement) {
        let (Some(start), Some(end)) = (cf.accrual_start(), cf.accrual_end()) else {
            continue;
        };
        if start < settlement && settlement < end {
            let period = counter.year_fraction(start, end);
            if period.is_zero() {
                return Decimal::ZERO;
            }
            let elapsed = counter.year_fraction(start, settlement);
            return cf.amount() * elapsed / period;
        }
    }

    Decimal::ZERO
}

/// Analytic dNPV/dy at the rate's own level.
fn npv_derivative(schedule: &Schedule, rate: &InterestRate, settlement: Date) -> f64 {
    if rate.compounding() == Compounding::SimpleThenCompounded {
        let h = RATE_BUMP;
        let up = npv_at_rate(schedule, &rate.with_rate(rate.rate() + h), settlement);
        let down = npv_at_rate(schedule, &rate.with_rate(rate.rate() - h), settlement);
        return (up - down) / (2.0 * h);
    }

    schedule
        .flows_after(settlement)
        .map(|cf| {
            let t = rate.year_fraction(settlement, cf.date());
            amount_f64(cf.amount()) * discount_derivative(rate, t)
        })
        .sum()
}

/// d/dy of the discount factor at time `t`.
///
/// `SimpleThenCompounded` is handled by the callers' numeric bump; its
/// kink at the frequency boundary has no single analytic form.
fn discount_derivative(rate: &InterestRate, t: f64) -> f64 {
    let y = rate.rate();
    let f = f64::from(rate.frequency().periods_per_year());
    match rate.compounding() {
        Compounding::Simple => -t / (1.0 + y * t).powi(2),
        Compounding::Compounded => -t * (1.0 + y / f).powf(-f * t - 1.0),
        Compounding::Continuous => -t * (-y * t).exp(),
        Compounding::SimpleThenCompounded => {
            if t <= 1.0 / f {
                -t / (1.0 + y * t).powi(2)
            } else {
                -t * (1.0 + y / f).powf(-f * t - 1.0)
            }
        }
    }
}

/// d²/dy² of the discount factor at time `t`.
fn discount_second_derivative(rate: &InterestRate, t: f64) -> f64 {
    let y = rate.rate();
    let f = f64::from(rate.frequency().periods_per_year());
    match rate.compounding() {
        Compounding::Simple => 2.0 * t * t / (1.0 + y * t).powi(3),
        Compounding::Compounded => {
            t * (t + 1.0 / f) * (1.0 + y / f).powf(-f * t - 2.0)
        }
        Compounding::Continuous => t * t * (-y * t).exp(),
        Compounding::SimpleThenCompounded => {
            if t <= 1.0 / f {
                2.0 * t * t / (1.0 + y * t).powi(3)
            } else {
                t * (t + 1.0 / f) * (1.0 + y / f).powf(-f * t - 2.0)
            }
        }
    }
}

fn amount_f64(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}
