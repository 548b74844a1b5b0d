//! Bond helper for curve bootstrapping.
//!
//! Lets liquid bond prices participate in a discount curve build
//! alongside deposits and swaps: the helper reprices its bond off each
//! trial curve and the bootstrapper drives the model clean price to the
//! quoted one.

use rust_decimal::prelude::ToPrimitive;

use pillar_core::types::{Date, Quote};
use pillar_curves::helpers::RateHelper;
use pillar_curves::term_structure::TermStructure;
use pillar_curves::{CurveError, CurveResult};

use crate::bond::Bond;
use crate::cashflows;

/// A fixed rate bond quoted as a clean price per 100 face.
#[derive(Debug, Clone)]
pub struct FixedRateBondHelper {
    quote: Quote,
    bond: Bond,
}

impl FixedRateBondHelper {
    /// Creates a bond helper from a clean price quote.
    #[must_use]
    pub fn new(quote: Quote, bond: Bond) -> Self {
        Self { quote, bond }
    }

    /// The underlying bond.
    #[must_use]
    pub fn bond(&self) -> &Bond {
        &self.bond
    }
}

impl RateHelper for FixedRateBondHelper {
    fn pillar_date(&self) -> Date {
        self.bond.maturity_date()
    }

    fn quote(&self) -> f64 {
        self.quote.value()
    }

    /// Model clean price per 100 face off the trial curve, settled per
    /// the bond's own settlement rule applied to the curve's reference
    /// date.
    fn implied_quote(&self, curve: &TermStructure) -> CurveResult<f64> {
        let settlement = self.bond.settlement_date(curve.reference_date());
        if !self.bond.is_tradable(settlement) {
            return Err(CurveError::invalid_helper(format!(
                "bond maturing {} is not tradable at settlement {settlement}",
                self.bond.maturity_date()
            )));
        }
        let notional = self
            .bond
            .notional(settlement)
            .to_f64()
            .unwrap_or_default();
        if notional <= 0.0 {
            return Err(CurveError::invalid_helper(format!(
                "bond maturing {} has no outstanding notional at {settlement}",
                self.bond.maturity_date()
            )));
        }

        let dirty = cashflows::npv(self.bond.schedule(), curve, settlement) * 100.0 / notional;
        let accrued = self
            .bond
            .accrued_amount(settlement)
            .to_f64()
            .unwrap_or_default();
        Ok(dirty - accrued)
    }

    fn quote_version(&self) -> u64 {
        self.quote.version()
    }

    fn description(&self) -> String {
        format!(
            "bond maturing {} quoted {:.4}",
            self.bond.maturity_date(),
            self.quote.value()
        )
    }
}
