//! 30/360 US day count convention.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// Checks if a date is the last day of February.
#[inline]
fn is_last_day_of_february(date: Date) -> bool {
    date.month() == 2 && date.day() == if date.is_leap_year() { 29 } else { 28 }
}

/// 30/360 US day count convention (Bond Basis).
///
/// Assumes 30-day months and a 360-day year, with the US month-end rules:
///
/// 1. If D1 is the last day of February, or 31, set D1 = 30.
/// 2. If D2 is the last day of February and D1 was, set D2 = 30.
/// 3. If D2 is 31 and D1 >= 30, set D2 = 30.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360US;

impl DayCount for Thirty360US {
    fn name(&self) -> &'static str {
        "30/360 US"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(self.day_count(start, end)) / Decimal::from(360)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let y1 = i64::from(start.year());
        let y2 = i64::from(end.year());
        let m1 = i64::from(start.month());
        let m2 = i64::from(end.month());
        let mut d1 = i64::from(start.day());
        let mut d2 = i64::from(end.day());

        let d1_was_feb_eom = is_last_day_of_february(start);

        if d1_was_feb_eom || d1 == 31 {
            d1 = 30;
        }

        if is_last_day_of_february(end) && d1_was_feb_eom {
            d2 = 30;
        } else if d2 == 31 && d1 >= 30 {
            d2 = 30;
        }

        360 * (y2 - y1) + 30 * (m2 - m1) + (d2 - d1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_regular_half_year() {
        let dc = Thirty360US;
        let start = Date::from_ymd(2025, 1, 15).unwrap();
        let end = Date::from_ymd(2025, 7, 15).unwrap();

        assert_eq!(dc.day_count(start, end), 180);
        assert_eq!(dc.year_fraction(start, end), dec!(0.5));
    }

    #[test]
    fn test_month_end_31_rule() {
        let dc = Thirty360US;
        let start = Date::from_ymd(2025, 1, 31).unwrap();
        let end = Date::from_ymd(2025, 7, 31).unwrap();

        // Both 31s collapse to 30
        assert_eq!(dc.day_count(start, end), 180);
    }

    #[test]
    fn test_feb_eom_rule() {
        let dc = Thirty360US;
        let start = Date::from_ymd(2025, 2, 28).unwrap();
        let end = Date::from_ymd(2025, 8, 31).unwrap();

        // D1 (Feb EOM) -> 30; D2 = 31 with D1 >= 30 -> 30
        assert_eq!(dc.day_count(start, end), 180);
    }
}
