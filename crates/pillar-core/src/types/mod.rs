//! Core value types.

mod cashflow;
mod date;
mod frequency;
mod interest_rate;
mod quote;

pub use cashflow::{CashFlow, Schedule};
pub use date::Date;
pub use frequency::{Compounding, Frequency};
pub use interest_rate::InterestRate;
pub use quote::Quote;
