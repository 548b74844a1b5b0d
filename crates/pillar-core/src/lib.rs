//! # Pillar Core
//!
//! Core types and conventions for the Pillar fixed income analytics library.
//!
//! This crate provides the foundational building blocks used throughout
//! Pillar:
//!
//! - **Types**: `Date`, `CashFlow`/`Schedule`, `InterestRate`, `Quote`
//! - **Day Count Conventions**: pluggable year-fraction calculations
//! - **Compounding**: Simple, Compounded, Continuous, Simple-Then-Compounded
//!
//! ## Design Philosophy
//!
//! - **Validated at the boundary**: schedules reject unordered dates at
//!   construction, so the analytics never re-check
//! - **Immutable values**: cash flows and rates never mutate after creation;
//!   the only observable state is the `Quote`
//!
//! ## Example
//!
//! ```rust
//! use pillar_core::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let schedule = Schedule::new(vec![
//!     CashFlow::simple(Date::from_ymd(2026, 6, 15).unwrap(), dec!(102.5)),
//! ]).unwrap();
//! assert_eq!(schedule.maturity_date(), Date::from_ymd(2026, 6, 15).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod daycounts;
pub mod error;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use types::Date;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{
        CashFlow, Compounding, Date, Frequency, InterestRate, Quote, Schedule,
    };
}
