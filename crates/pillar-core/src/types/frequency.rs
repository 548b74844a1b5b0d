//! Coupon frequency and compounding conventions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment or compounding frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    /// Single payment at maturity (zero coupon).
    Once,
    /// Annual payments.
    Annual,
    /// Semi-annual payments (US Treasury standard).
    #[default]
    SemiAnnual,
    /// Quarterly payments.
    Quarterly,
    /// Monthly payments.
    Monthly,
}

impl Frequency {
    /// Returns the number of periods per year.
    ///
    /// `Once` counts as a single annual period for compounding purposes.
    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Once | Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
        }
    }

    /// Returns the number of months in one period.
    #[must_use]
    pub fn months_per_period(&self) -> u32 {
        12 / self.periods_per_year()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Once => "Once",
            Frequency::Annual => "Annual",
            Frequency::SemiAnnual => "Semi-Annual",
            Frequency::Quarterly => "Quarterly",
            Frequency::Monthly => "Monthly",
        };
        write!(f, "{name}")
    }
}

/// Interest compounding convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Compounding {
    /// Simple interest: `1 + r·t`.
    Simple,
    /// Periodic compounding: `(1 + r/f)^(f·t)`.
    #[default]
    Compounded,
    /// Continuous compounding: `e^(r·t)`.
    Continuous,
    /// Simple up to the first period, compounded thereafter.
    SimpleThenCompounded,
}

impl Compounding {
    /// Growth factor for rate `r` over `t` years at frequency `freq`.
    #[must_use]
    pub fn compound_factor(&self, rate: f64, t: f64, freq: Frequency) -> f64 {
        let f = f64::from(freq.periods_per_year());
        match self {
            Compounding::Simple => 1.0 + rate * t,
            Compounding::Compounded => (1.0 + rate / f).powf(f * t),
            Compounding::Continuous => (rate * t).exp(),
            Compounding::SimpleThenCompounded => {
                if t <= 1.0 / f {
                    1.0 + rate * t
                } else {
                    (1.0 + rate / f).powf(f * t)
                }
            }
        }
    }

    /// Discount factor for rate `r` over `t` years at frequency `freq`.
    ///
    /// Reciprocal of [`compound_factor`](Self::compound_factor).
    #[must_use]
    pub fn discount_factor(&self, rate: f64, t: f64, freq: Frequency) -> f64 {
        1.0 / self.compound_factor(rate, t, freq)
    }

    /// Rate implied by a compound factor over `t` years.
    ///
    /// Inverse of [`compound_factor`](Self::compound_factor). Returns 0 for
    /// non-positive `t`.
    #[must_use]
    pub fn implied_rate(&self, compound: f64, t: f64, freq: Frequency) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        let f = f64::from(freq.periods_per_year());
        match self {
            Compounding::Simple => (compound - 1.0) / t,
            Compounding::Compounded => (compound.powf(1.0 / (f * t)) - 1.0) * f,
            Compounding::Continuous => compound.ln() / t,
            Compounding::SimpleThenCompounded => {
                if t <= 1.0 / f {
                    (compound - 1.0) / t
                } else {
                    (compound.powf(1.0 / (f * t)) - 1.0) * f
                }
            }
        }
    }
}

impl fmt::Display for Compounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Compounding::Simple => "Simple",
            Compounding::Compounded => "Compounded",
            Compounding::Continuous => "Continuous",
            Compounding::SimpleThenCompounded => "Simple-Then-Compounded",
        };
        write!(f, "{name}")
    }
}
