//! End-to-end bond analytics scenarios: pricing off bootstrapped
//! curves, yield round trips, and the settlement edge cases.

use approx::assert_relative_eq;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

use pillar_bonds::bond::Bond;
use pillar_bonds::cashflows::DurationType;
use pillar_bonds::curve_helpers::FixedRateBondHelper;
use pillar_bonds::error::BondError;
use pillar_bonds::functions::{BondFunctions, DEFAULT_ACCURACY, DEFAULT_MAX_ITERATIONS};
use pillar_core::daycounts::DayCountConvention;
use pillar_core::types::{CashFlow, Compounding, Date, Frequency, Quote, Schedule};
use pillar_curves::bootstrap::Bootstrapper;
use pillar_curves::helpers::DepositRateHelper;

fn d(y: i32, m: u32, day: u32) -> Date {
    Date::from_ymd(y, m, day).unwrap()
}

/// Annual coupon bond; the final period pays coupon plus redemption in
/// one flow.
fn coupon_bond(issue: Date, coupon: f64, years: i32) -> Bond {
    let rate = rust_decimal::Decimal::try_from(coupon).unwrap();
    let face = dec!(100);
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
        2,
        face,
        Schedule::new(flows).unwrap(),
        DayCountConvention::Act365Fixed,
    )
    .unwrap()
}

#[test]
fn yield_round_trips_through_clean_price() {
    let bond = coupon_bond(d(2026, 1, 15), 0.05, 10);
    let functions = BondFunctions::new(d(2026, 9, 10));
    let settlement = Some(d(2026, 9, 14));

    for clean in [88.0, 95.5, 100.0, 104.25, 112.0] {
        let solved = functions
            .bond_yield(
                &bond,
                clean,
                Compounding::Compounded,
                Frequency::Annual,
                settlement,
                DEFAULT_ACCURACY,
                DEFAULT_MAX_ITERATIONS,
                0.05,
            )
            .unwrap();
        let reprice = functions
            .clean_price_from_yield(&bond, &solved, settlement)
            .unwrap();
        assert_relative_eq!(reprice, clean, epsilon = 1e-7);
    }
}

#[test]
fn premium_zero_coupon_solves_to_a_negative_yield() {
    // Face 100, issued 2003-08-15, maturing 2013-08-15, quoted at a
    // clean 116.92 for settlement 2008-09-15. A zero above par can only
    // come from a negative yield; the identity dirty == clean + accrued
    // (accrued being zero for a zero coupon) must still hold.
    let bond = Bond::zero_coupon(
        d(2003, 8, 15),
        2,
        dec!(100),
        d(2013, 8, 15),
        DayCountConvention::Act365Fixed,
    )
    .unwrap();
    let functions = BondFunctions::new(d(2008, 9, 11));
    let settlement = Some(d(2008, 9, 15));
    let clean = 116.92;

    let accrued = functions.accrued_amount(&bond, settlement).unwrap();
    assert_eq!(accrued, rust_decimal::Decimal::ZERO);

    let solved = functions
        .bond_yield(
            &bond,
            clean,
            Compounding::Compounded,
            Frequency::Annual,
            settlement,
            DEFAULT_ACCURACY,
            DEFAULT_MAX_ITERATIONS,
            0.02,
        )
        .unwrap();
    assert!(solved.rate() < 0.0, "solved yield {}", solved.rate());

    let dirty = functions
        .dirty_price_from_yield(&bond, &solved, settlement)
        .unwrap();
    assert_relative_eq!(dirty, clean + accrued.to_f64().unwrap(), epsilon = 1e-7);
}

#[test]
fn expired_bond_fails_every_analytics_call() {
    let bond = coupon_bond(d(2020, 3, 2), 0.04, 5);
    let functions = BondFunctions::new(d(2026, 6, 12));

    assert!(!functions.is_tradable(&bond, None));

    let rate = pillar_core::types::InterestRate::new(
        0.04,
        DayCountConvention::Act365Fixed,
        Compounding::Compounded,
        Frequency::Annual,
    );
    assert!(matches!(
        functions.clean_price_from_yield(&bond, &rate, None),
        Err(BondError::NotTradable { .. })
    ));
    assert!(matches!(
        functions.duration(&bond, &rate, DurationType::Modified, None),
        Err(BondError::NotTradable { .. })
    ));
    assert!(matches!(
        functions.accrued_amount(&bond, None),
        Err(BondError::NotTradable { .. })
    ));
}

#[test]
fn quoted_bond_reprices_on_its_bootstrapped_curve() {
    let reference = d(2026, 1, 15);
    let bond = coupon_bond(reference, 0.045, 5);

    // Pin the short end with a deposit, then let the bond quote set the
    // 5y pillar.
    let deposit = DepositRateHelper::new(
        Quote::new(0.0440),
        reference,
        d(2026, 7, 15),
        DayCountConvention::Act360,
    )
    .unwrap();
    let bond_quote = Quote::new(99.10);
    let helper = FixedRateBondHelper::new(bond_quote.clone(), bond.clone());

    let curve = Bootstrapper::new(reference)
        .add_helper(Box::new(deposit))
        .add_helper(Box::new(helper))
        .bootstrap()
        .unwrap();

    let functions = BondFunctions::new(reference);
    let clean = functions.clean_price(&bond, &curve, None).unwrap();
    assert_relative_eq!(clean, 99.10, epsilon = 1e-6);
}

#[test]
fn z_spread_reprices_the_shifted_npv() {
    let reference = d(2026, 1, 15);
    let bond = coupon_bond(reference, 0.05, 7);

    let deposit = DepositRateHelper::new(
        Quote::new(0.0450),
        reference,
        d(2026, 7, 15),
        DayCountConvention::Act360,
    )
    .unwrap();
    let helper = FixedRateBondHelper::new(Quote::new(101.0), bond.clone());
    let curve = Bootstrapper::new(reference)
        .add_helper(Box::new(deposit))
        .add_helper(Box::new(helper))
        .bootstrap()
        .unwrap();

    let functions = BondFunctions::new(reference);
    let settlement = Some(bond.settlement_date(reference));

    // A clean price below the curve price demands a positive spread.
    let discounted_clean = functions.clean_price(&bond, &curve, settlement).unwrap() - 2.5;
    let spread = functions
        .z_spread(
            &bond,
            discounted_clean,
            &curve,
            Compounding::Continuous,
            Frequency::Annual,
            settlement,
            DEFAULT_ACCURACY,
            DEFAULT_MAX_ITERATIONS,
            0.0,
        )
        .unwrap();
    assert!(spread > 0.0, "spread {spread}");

    let reprice = functions
        .clean_price_with_spread(
            &bond,
            &curve,
            spread,
            Compounding::Continuous,
            Frequency::Annual,
            settlement,
        )
        .unwrap();
    assert_relative_eq!(reprice, discounted_clean, epsilon = 1e-6);
}

#[test]
fn sinker_duration_is_shorter_than_bullet() {
    let reference = d(2026, 1, 15);
    let issue = reference;
    let bullet = coupon_bond(issue, 0.05, 5);

    // Same schedule, but half the face returns after year 3.
    let sinker = coupon_bond(issue, 0.05, 5)
        .with_notionals(vec![
            (d(2029, 1, 15), dec!(100)),
            (d(2031, 1, 15), dec!(50)),
        ])
        .unwrap();

    let (bullet_dates, bullet_amounts): (Vec<_>, Vec<_>) =
        bullet.redemptions().into_iter().unzip();
    let (sinker_dates, sinker_amounts): (Vec<_>, Vec<_>) =
        sinker.redemptions().into_iter().unzip();

    let bullet_wal =
        BondFunctions::weighted_average_life(reference, &bullet_amounts, &bullet_dates).unwrap();
    let sinker_wal =
        BondFunctions::weighted_average_life(reference, &sinker_amounts, &sinker_dates).unwrap();

    assert!(sinker_wal < bullet_wal, "{sinker_wal} !< {bullet_wal}");
    assert_eq!(bullet_wal, d(2031, 1, 15));
}
