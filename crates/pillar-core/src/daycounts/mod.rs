//! Day count conventions.
//!
//! A day count convention turns a pair of dates into a year fraction. The
//! analytics consume the [`DayCount`] trait, so conventions are pluggable;
//! the enum form [`DayCountConvention`] selects one at runtime.
//!
//! # Supported Conventions
//!
//! - [`Act360`]: Actual/360 - money market convention
//! - [`Act365Fixed`]: Actual/365 Fixed - UK Gilts, WAL weighting
//! - [`Thirty360US`]: 30/360 US Bond Basis - US corporate bonds
//! - [`ActActIsda`]: Actual/Actual ISDA - year-basis split
//!
//! # Usage
//!
//! ```rust
//! use pillar_core::daycounts::{Act360, DayCount};
//! use pillar_core::types::Date;
//!
//! let dc = Act360;
//! let start = Date::from_ymd(2025, 1, 1).unwrap();
//! let end = Date::from_ymd(2025, 4, 1).unwrap();
//! assert_eq!(dc.day_count(start, end), 90);
//! ```

mod act360;
mod act365;
mod actact;
mod thirty360;

pub use act360::Act360;
pub use act365::Act365Fixed;
pub use actact::ActActIsda;
pub use thirty360::Thirty360US;

use crate::types::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Trait for day count conventions.
///
/// Implementations must be thread-safe (`Send + Sync`); the year fraction
/// can be negative when `end < start`.
pub trait DayCount: Send + Sync {
    /// Returns the convention's market name (e.g., "ACT/360").
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates.
    fn year_fraction(&self, start: Date, end: Date) -> Decimal;

    /// Calculates the day count between two dates.
    ///
    /// Actual calendar days for ACT conventions; the 30-day-month count for
    /// 30/360 conventions.
    fn day_count(&self, start: Date, end: Date) -> i64;
}

/// Runtime-selectable day count convention.
///
/// # Example
///
/// ```rust
/// use pillar_core::daycounts::DayCountConvention;
///
/// let dc: DayCountConvention = "ACT/365F".parse().unwrap();
/// assert_eq!(dc, DayCountConvention::Act365Fixed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DayCountConvention {
    /// Actual/360.
    Act360,
    /// Actual/365 Fixed.
    #[default]
    Act365Fixed,
    /// 30/360 US Bond Basis.
    Thirty360US,
    /// Actual/Actual ISDA.
    ActActIsda,
}

impl DayCountConvention {
    /// Converts to a boxed trait object.
    #[must_use]
    pub fn to_day_count(&self) -> Box<dyn DayCount> {
        match self {
            Self::Act360 => Box::new(Act360),
            Self::Act365Fixed => Box::new(Act365Fixed),
            Self::Thirty360US => Box::new(Thirty360US),
            Self::ActActIsda => Box::new(ActActIsda),
        }
    }

    /// Returns the convention's market name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Act360 => "ACT/360",
            Self::Act365Fixed => "ACT/365F",
            Self::Thirty360US => "30/360 US",
            Self::ActActIsda => "ACT/ACT ISDA",
        }
    }
}

impl FromStr for DayCountConvention {
    type Err = DayCountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace(' ', "").as_str() {
            "ACT/360" => Ok(Self::Act360),
            "ACT/365" | "ACT/365F" | "ACT/365FIXED" => Ok(Self::Act365Fixed),
            "30/360" | "30/360US" => Ok(Self::Thirty360US),
            "ACT/ACT" | "ACT/ACTISDA" => Ok(Self::ActActIsda),
            _ => Err(DayCountParseError(s.to_string())),
        }
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error parsing a day count convention name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCountParseError(pub String);

impl std::fmt::Display for DayCountParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown day count convention: {}", self.0)
    }
}

impl std::error::Error for DayCountParseError {}
