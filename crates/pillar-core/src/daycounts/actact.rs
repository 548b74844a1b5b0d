//! Actual/Actual ISDA day count convention.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// Actual/Actual ISDA day count convention.
///
/// The period is split at calendar year boundaries; each piece is divided
/// by the actual length of its year (365 or 366).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIsda;

fn days_in_year(year: i32) -> i64 {
    if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 {
        366
    } else {
        365
    }
}

impl DayCount for ActActIsda {
    fn name(&self) -> &'static str {
        "ACT/ACT ISDA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        if start == end {
            return Decimal::ZERO;
        }
        if end < start {
            return -self.year_fraction(end, start);
        }

        let y1 = start.year();
        let y2 = end.year();

        if y1 == y2 {
            return Decimal::from(start.days_between(&end)) / Decimal::from(days_in_year(y1));
        }

        // Stub in the start year
        let start_year_end = Date::from_ymd(y1 + 1, 1, 1).expect("jan 1 is always valid");
        let mut fraction =
            Decimal::from(start.days_between(&start_year_end)) / Decimal::from(days_in_year(y1));

        // Whole years between
        fraction += Decimal::from(y2 - y1 - 1);

        // Stub in the end year
        let end_year_start = Date::from_ymd(y2, 1, 1).expect("jan 1 is always valid");
        fraction +=
            Decimal::from(end_year_start.days_between(&end)) / Decimal::from(days_in_year(y2));

        fraction
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal_macros::dec;

    #[test]
    fn test_same_year() {
        let dc = ActActIsda;
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2025, 7, 1).unwrap();

        assert_eq!(dc.year_fraction(start, end), dec!(181) / dec!(365));
    }

    #[test]
    fn test_whole_years() {
        let dc = ActActIsda;
        let start = Date::from_ymd(2023, 1, 1).unwrap();
        let end = Date::from_ymd(2026, 1, 1).unwrap();

        assert_eq!(dc.year_fraction(start, end), dec!(3));
    }

    #[test]
    fn test_spanning_leap_year() {
        let dc = ActActIsda;
        let start = Date::from_ymd(2023, 7, 1).unwrap();
        let end = Date::from_ymd(2024, 7, 1).unwrap();

        // 184 days of 2023 over 365, 182 days of 2024 over 366
        let expected = 184.0 / 365.0 + 182.0 / 366.0;
        let yf = dc.year_fraction(start, end).to_f64().unwrap();
        assert!((yf - expected).abs() < 1e-12);
    }

    #[test]
    fn test_reversed_is_negative() {
        let dc = ActActIsda;
        let start = Date::from_ymd(2024, 7, 1).unwrap();
        let end = Date::from_ymd(2023, 7, 1).unwrap();

        assert!(dc.year_fraction(start, end) < Decimal::ZERO);
    }
}
