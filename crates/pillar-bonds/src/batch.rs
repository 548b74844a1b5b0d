//! Parallel fan-out over independent bond analytics requests.
//!
//! Each request carries a caller identifier; responses come back in
//! input order with the same identifiers. Items are evaluated on the
//! rayon pool, one task per request, and a failing item reports its
//! error in its own response slot rather than aborting the batch. The
//! analytics themselves stay synchronous and share no mutable state,
//! so the fan-out is a plain `par_iter`.

use rayon::prelude::*;
use rust_decimal::Decimal;

use pillar_core::types::{Compounding, Date, Frequency, InterestRate};

use crate::bond::Bond;
use crate::cashflows::DurationType;
use crate::error::BondResult;
use crate::functions::{BondFunctions, DEFAULT_ACCURACY, DEFAULT_MAX_ITERATIONS};

/// Yield-from-clean-price request.
#[derive(Debug, Clone)]
pub struct YieldRequest {
    /// Caller correlation id, echoed in the response.
    pub id: String,
    /// The bond to solve.
    pub bond: Bond,
    /// Quoted clean price per 100 face.
    pub clean_price: f64,
    /// Compounding convention of the solved yield.
    pub compounding: Compounding,
    /// Compounding frequency of the solved yield.
    pub frequency: Frequency,
    /// Explicit settlement, or `None` for the bond's own rule.
    pub settlement: Option<Date>,
}

/// Result slot for one [`YieldRequest`].
#[derive(Debug)]
pub struct YieldResponse {
    /// The request's correlation id.
    pub id: String,
    /// Solved yield, or the per-item failure.
    pub result: BondResult<InterestRate>,
}

/// Accrued-interest request.
#[derive(Debug, Clone)]
pub struct AccruedRequest {
    /// Caller correlation id, echoed in the response.
    pub id: String,
    /// The bond to query.
    pub bond: Bond,
    /// Explicit settlement, or `None` for the bond's own rule.
    pub settlement: Option<Date>,
}

/// Accrued days and amount for one bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accrued {
    /// Days of accrual elapsed under the bond's day counter.
    pub days: i64,
    /// Accrued interest per 100 face.
    pub amount: Decimal,
}

/// Result slot for one [`AccruedRequest`].
#[derive(Debug)]
pub struct AccruedResponse {
    /// The request's correlation id.
    pub id: String,
    /// Accrued figures, or the per-item failure.
    pub result: BondResult<Accrued>,
}

/// Duration request at a flat yield.
#[derive(Debug, Clone)]
pub struct DurationRequest {
    /// Caller correlation id, echoed in the response.
    pub id: String,
    /// The bond to measure.
    pub bond: Bond,
    /// The flat yield to measure at.
    pub rate: InterestRate,
    /// Which duration to compute.
    pub duration_type: DurationType,
    /// Explicit settlement, or `None` for the bond's own rule.
    pub settlement: Option<Date>,
}

/// Result slot for one [`DurationRequest`].
#[derive(Debug)]
pub struct DurationResponse {
    /// The request's correlation id.
    pub id: String,
    /// Duration in years, or the per-item failure.
    pub result: BondResult<f64>,
}

/// Weighted-average-life request over an explicit repayment stream.
#[derive(Debug, Clone)]
pub struct WalRequest {
    /// Caller correlation id, echoed in the response.
    pub id: String,
    /// The date to weight distances from.
    pub today: Date,
    /// Repayment amounts, parallel to `dates`.
    pub amounts: Vec<Decimal>,
    /// Repayment dates, parallel to `amounts`.
    pub dates: Vec<Date>,
}

/// Result slot for one [`WalRequest`].
#[derive(Debug)]
pub struct WalResponse {
    /// The request's correlation id.
    pub id: String,
    /// Weighted average life as a date, or the per-item failure.
    pub result: BondResult<Date>,
}

/// Combined per-bond analytics request.
#[derive(Debug, Clone)]
pub struct BondAnalyticsRequest {
    /// Caller correlation id, echoed in the response.
    pub id: String,
    /// The bond to analyse.
    pub bond: Bond,
    /// Quoted clean price per 100 face, driving yield and duration.
    pub clean_price: f64,
    /// Compounding convention of the solved yield.
    pub compounding: Compounding,
    /// Compounding frequency of the solved yield.
    pub frequency: Frequency,
    /// Explicit settlement, or `None` for the bond's own rule.
    pub settlement: Option<Date>,
}

/// The full analytics set for one bond.
#[derive(Debug, Clone)]
pub struct BondAnalytics {
    /// Accrued days and amount at settlement.
    pub accrued: Accrued,
    /// Weighted average life of the bond's principal repayments.
    pub weighted_average_life: Date,
    /// Yield implied by the quoted clean price.
    pub bond_yield: InterestRate,
    /// Modified duration at the solved yield.
    pub modified_duration: f64,
}

/// Result slot for one [`BondAnalyticsRequest`].
#[derive(Debug)]
pub struct BondAnalyticsResponse {
    /// The request's correlation id.
    pub id: String,
    /// The analytics set, or the per-item failure.
    pub result: BondResult<BondAnalytics>,
}

/// Solves yields for a batch of priced bonds in parallel.
#[must_use]
pub fn solve_yields(evaluation_date: Date, requests: &[YieldRequest]) -> Vec<YieldResponse> {
    let functions = BondFunctions::new(evaluation_date);
    requests
        .par_iter()
        .map(|req| {
            let result = functions.bond_yield(
                &req.bond,
                req.clean_price,
                req.compounding,
                req.frequency,
                req.settlement,
                DEFAULT_ACCURACY,
                DEFAULT_MAX_ITERATIONS,
                0.05,
            );
            log_failure(&req.id, &result);
            YieldResponse {
                id: req.id.clone(),
                result,
            }
        })
        .collect()
}

/// Computes accrued interest for a batch of bonds in parallel.
#[must_use]
pub fn compute_accrued(evaluation_date: Date, requests: &[AccruedRequest]) -> Vec<AccruedResponse> {
    let functions = BondFunctions::new(evaluation_date);
    requests
        .par_iter()
        .map(|req| AccruedResponse {
            id: req.id.clone(),
            result: accrued_for(&functions, &req.bond, req.settlement),
        })
        .collect()
}

/// Computes durations for a batch of bonds in parallel.
#[must_use]
pub fn compute_durations(
    evaluation_date: Date,
    requests: &[DurationRequest],
) -> Vec<DurationResponse> {
    let functions = BondFunctions::new(evaluation_date);
    requests
        .par_iter()
        .map(|req| DurationResponse {
            id: req.id.clone(),
            result: functions.duration(&req.bond, &req.rate, req.duration_type, req.settlement),
        })
        .collect()
}

/// Computes weighted average lives for a batch of repayment streams in
/// parallel.
#[must_use]
pub fn compute_weighted_average_lives(requests: &[WalRequest]) -> Vec<WalResponse> {
    requests
        .par_iter()
        .map(|req| WalResponse {
            id: req.id.clone(),
            result: BondFunctions::weighted_average_life(req.today, &req.amounts, &req.dates),
        })
        .collect()
}

/// Computes the combined analytics set for a batch of priced bonds in
/// parallel.
#[must_use]
pub fn compute_analytics(
    evaluation_date: Date,
    requests: &[BondAnalyticsRequest],
) -> Vec<BondAnalyticsResponse> {
    let functions = BondFunctions::new(evaluation_date);
    requests
        .par_iter()
        .map(|req| {
            let result = analytics_for(&functions, req);
            log_failure(&req.id, &result);
            BondAnalyticsResponse {
                id: req.id.clone(),
                result,
            }
        })
        .collect()
}

fn log_failure<T>(id: &str, result: &BondResult<T>) {
    if let Err(err) = result {
        log::debug!("batch item {id} failed: {err}");
    }
}

fn accrued_for(
    functions: &BondFunctions,
    bond: &Bond,
    settlement: Option<Date>,
) -> BondResult<Accrued> {
    Ok(Accrued {
        days: functions.accrued_days(bond, settlement)?,
        amount: functions.accrued_amount(bond, settlement)?,
    })
}

fn analytics_for(
    functions: &BondFunctions,
    req: &BondAnalyticsRequest,
) -> BondResult<BondAnalytics> {
    let accrued = accrued_for(functions, &req.bond, req.settlement)?;

    let (dates, amounts): (Vec<Date>, Vec<Decimal>) = req.bond.redemptions().into_iter().unzip();
    let weighted_average_life =
        BondFunctions::weighted_average_life(functions.evaluation_date(), &amounts, &dates)?;

    let bond_yield = functions.bond_yield(
        &req.bond,
        req.clean_price,
        req.compounding,
        req.frequency,
        req.settlement,
        DEFAULT_ACCURACY,
        DEFAULT_MAX_ITERATIONS,
        0.05,
    )?;
    let modified_duration = functions.duration(
        &req.bond,
        &bond_yield,
        DurationType::Modified,
        req.settlement,
    )?;

    Ok(BondAnalytics {
        accrued,
        weighted_average_life,
        bond_yield,
        modified_duration,
    })
}
