//! Property tests for schedule validation and the price/yield
//! round trip.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use pillar_bonds::bond::Bond;
use pillar_bonds::functions::{BondFunctions, DEFAULT_ACCURACY, DEFAULT_MAX_ITERATIONS};
use pillar_core::daycounts::DayCountConvention;
use pillar_core::types::{CashFlow, Compounding, Date, Frequency, Schedule};

fn issue_date() -> Date {
    Date::from_ymd(2026, 1, 15).unwrap()
}

fn annual_bond(coupon_bp: u32, years: i32) -> Bond {
    let rate = Decimal::new(i64::from(coupon_bp), 4);
    let face = dec!(100);
    let issue = issue_date();
    let mut flows = Vec::new();
    for year in 1..=years {
        let start = issue.add_years(year - 1).unwrap();
        let end = issue.add_years(year).unwrap();
        let mut amount = face * rate;
        if year == years {
            amount += face;
        }
        flows.push(CashFlow::coupon(end, amount, start, end, rate));
    }
    Bond::fixed_rate(
        issue,
        0,
        face,
        Schedule::new(flows).unwrap(),
        DayCountConvention::Act365Fixed,
    )
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Strictly increasing flow dates are accepted; duplicating any
    /// date breaks the schedule invariant and must be rejected.
    #[test]
    fn schedule_rejects_duplicated_dates(
        offsets in proptest::collection::vec(1i64..200, 2..8),
        dup_index in 0usize..6,
    ) {
        let mut date = issue_date();
        let mut flows = Vec::new();
        for step in &offsets {
            date = date.add_days(*step);
            flows.push(CashFlow::simple(date, dec!(1)));
        }
        prop_assert!(Schedule::new(flows.clone()).is_ok());

        let dup_index = dup_index % flows.len();
        let duplicate = flows[dup_index].clone();
        flows.insert(dup_index, duplicate);
        prop_assert!(Schedule::new(flows).is_err());
    }

    /// Pricing at a yield and solving the yield back from that price
    /// is the identity, across coupons, maturities, and compounding
    /// conventions.
    #[test]
    fn yield_price_round_trip(
        coupon_bp in 50u32..1200,
        years in 2i32..15,
        level in 0.002f64..0.15,
        compounding in prop_oneof![
            Just(Compounding::Compounded),
            Just(Compounding::Continuous),
            Just(Compounding::SimpleThenCompounded),
        ],
    ) {
        let bond = annual_bond(coupon_bp, years);
        let functions = BondFunctions::new(issue_date());
        let settlement = Some(issue_date());
        let rate = pillar_core::types::InterestRate::new(
            level,
            DayCountConvention::Act365Fixed,
            compounding,
            Frequency::Annual,
        );

        let clean = functions
            .clean_price_from_yield(&bond, &rate, settlement)
            .unwrap();
        let solved = functions
            .bond_yield(
                &bond,
                clean,
                compounding,
                Frequency::Annual,
                settlement,
                DEFAULT_ACCURACY,
                DEFAULT_MAX_ITERATIONS,
                0.05,
            )
            .unwrap();

        prop_assert!(
            (solved.rate() - level).abs() < 1e-7,
            "{compounding}: {level} -> {clean} -> {}",
            solved.rate()
        );
    }
}
