//! Property tests for compounding arithmetic.

use proptest::prelude::*;

use pillar_core::types::{Compounding, Frequency};

fn compoundings() -> impl Strategy<Value = Compounding> {
    prop_oneof![
        Just(Compounding::Simple),
        Just(Compounding::Compounded),
        Just(Compounding::Continuous),
        Just(Compounding::SimpleThenCompounded),
    ]
}

fn frequencies() -> impl Strategy<Value = Frequency> {
    prop_oneof![
        Just(Frequency::Annual),
        Just(Frequency::SemiAnnual),
        Just(Frequency::Quarterly),
        Just(Frequency::Monthly),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// `implied_rate` inverts `compound_factor` for every convention.
    #[test]
    fn implied_rate_inverts_compounding(
        rate in 0.0005f64..0.25,
        t in 0.05f64..40.0,
        compounding in compoundings(),
        frequency in frequencies(),
    ) {
        let factor = compounding.compound_factor(rate, t, frequency);
        let recovered = compounding.implied_rate(factor, t, frequency);
        prop_assert!(
            (recovered - rate).abs() < 1e-10,
            "{compounding} at {frequency}: {rate} -> {factor} -> {recovered}"
        );
    }

    /// Discounting then compounding over the same period is the
    /// identity.
    #[test]
    fn discount_factor_is_reciprocal(
        rate in 0.0005f64..0.25,
        t in 0.05f64..40.0,
        compounding in compoundings(),
        frequency in frequencies(),
    ) {
        let product = compounding.compound_factor(rate, t, frequency)
            * compounding.discount_factor(rate, t, frequency);
        prop_assert!((product - 1.0).abs() < 1e-12);
    }

    /// Growth factors are strictly increasing in the rate.
    #[test]
    fn compounding_is_monotone_in_rate(
        rate in 0.0005f64..0.2,
        bump in 0.0001f64..0.05,
        t in 0.05f64..40.0,
        compounding in compoundings(),
        frequency in frequencies(),
    ) {
        let low = compounding.compound_factor(rate, t, frequency);
        let high = compounding.compound_factor(rate + bump, t, frequency);
        prop_assert!(high > low);
    }
}
