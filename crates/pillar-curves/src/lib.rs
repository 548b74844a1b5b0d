//! # Pillar Curves
//!
//! Discount curve bootstrapping for the Pillar fixed income analytics
//! library.
//!
//! This crate provides:
//!
//! - **Term structure**: An immutable interpolated discount curve with
//!   discount, forward, and zero rate queries
//! - **Helpers**: Deposits and par swaps as calibration instruments
//!   behind the [`RateHelper`](helpers::RateHelper) trait
//! - **Bootstrap**: Sequential pillar solving, with an outer fixed-point
//!   loop when the interpolation is non-local
//! - **Piecewise curve**: A quote-observing wrapper that rebuilds lazily
//!   when market data moves
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pillar_curves::prelude::*;
//!
//! let curve = Bootstrapper::new(reference_date)
//!     .add_helper(Box::new(DepositRateHelper::new(
//!         Quote::new(0.0460), reference_date, in_6m, DayCountConvention::Act360,
//!     )?))
//!     .add_helper(Box::new(SwapRateHelper::new(
//!         Quote::new(0.0410), reference_date, in_5y,
//!         Frequency::Annual, DayCountConvention::Thirty360US,
//!     )?))
//!     .bootstrap()?;
//!
//! let df = curve.discount_factor(in_5y);
//! let zero = curve.zero_rate(in_5y, Compounding::Continuous, Frequency::Annual)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::similar_names)]
#![allow(clippy::unreadable_literal)]

pub mod bootstrap;
pub mod error;
pub mod helpers;
pub mod interpolation;
pub mod piecewise;
pub mod term_structure;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bootstrap::{BootstrapConfig, Bootstrapper};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::helpers::{DepositRateHelper, RateHelper, SwapRateHelper};
    pub use crate::interpolation::InterpolationMethod;
    pub use crate::piecewise::PiecewiseCurve;
    pub use crate::term_structure::TermStructure;
}

pub use error::{CurveError, CurveResult};
