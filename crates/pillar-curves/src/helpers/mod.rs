//! Bootstrap helpers: market instruments quoted against a curve.
//!
//! Each helper ties an observable [`Quote`](pillar_core::types::Quote) to
//! a pillar date and knows how to read its own quote back off a trial
//! curve. The bootstrapper works purely through the [`RateHelper`] trait
//! and never names a concrete instrument.

mod deposit;
mod swap;

pub use deposit::DepositRateHelper;
pub use swap::SwapRateHelper;

use pillar_core::types::Date;

use crate::error::CurveResult;
use crate::term_structure::TermStructure;

/// A calibration instrument for curve bootstrap.
///
/// Implementations must be cheap to query: `implied_quote` is evaluated
/// inside the pillar root search on every solver iteration.
pub trait RateHelper: Send + Sync {
    /// The date of the pillar this helper pins down (its maturity).
    fn pillar_date(&self) -> Date;

    /// The current market quote.
    fn quote(&self) -> f64;

    /// The quote this helper implies when priced off `curve`.
    ///
    /// At the solution, `implied_quote(curve) == quote()` to within the
    /// bootstrap tolerance.
    fn implied_quote(&self, curve: &TermStructure) -> CurveResult<f64>;

    /// Version counter of the underlying quote, for staleness checks.
    fn quote_version(&self) -> u64;

    /// Human-readable description, used in error messages.
    fn description(&self) -> String;
}
