//! # Pillar Bonds
//!
//! Bond instruments and analytics for the Pillar fixed income analytics
//! library.
//!
//! This crate provides:
//!
//! - **Bond**: Bullet, zero coupon, and sinking-fund bonds over an
//!   immutable cash flow schedule
//! - **Cash flow analytics**: NPV, yield solving, duration, convexity,
//!   z-spread, basis-point sensitivity, and accrued interest against a
//!   flat yield or a discount curve
//! - **Bond functions**: A settlement-aware adapter turning schedule
//!   values into clean and dirty prices per 100 face
//! - **Curve helper**: Quoted bond prices as bootstrap calibration
//!   instruments
//! - **Batch**: A rayon fan-out over independent analytics requests
//!   with per-item failure isolation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pillar_bonds::prelude::*;
//!
//! let bond = Bond::fixed_rate(
//!     issue_date, 2, dec!(100), schedule, DayCountConvention::Act365Fixed,
//! )?;
//!
//! let functions = BondFunctions::new(evaluation_date);
//! let solved = functions.bond_yield(
//!     &bond, 98.25, Compounding::Compounded, Frequency::Annual,
//!     None, DEFAULT_ACCURACY, DEFAULT_MAX_ITERATIONS, 0.05,
//! )?;
//! let duration = functions.duration(&bond, &solved, DurationType::Modified, None)?;
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

pub mod batch;
pub mod bond;
pub mod cashflows;
pub mod curve_helpers;
pub mod error;
pub mod functions;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::batch::{
        AccruedRequest, BondAnalyticsRequest, DurationRequest, WalRequest, YieldRequest,
    };
    pub use crate::bond::Bond;
    pub use crate::cashflows::DurationType;
    pub use crate::curve_helpers::FixedRateBondHelper;
    pub use crate::error::{BondError, BondResult};
    pub use crate::functions::{BondFunctions, DEFAULT_ACCURACY, DEFAULT_MAX_ITERATIONS};
}

pub use error::{BondError, BondResult};
