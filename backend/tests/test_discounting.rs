//! Present-value discounting tests

use cohort_simulator_core_rs::{pv, DiscountRate, ModelError};
use proptest::prelude::*;

#[test]
fn test_stroke_cost_first_cycle() {
    // One cycle in STROKE, credited at the end of cycle 0
    assert_eq!(pv(5196.0, 0.03, 1), 5196.0 / (1.0 + 0.03));
}

#[test]
fn test_later_periods_are_worth_less() {
    let mut previous = pv(200.0, 0.03, 0);
    for period in 1..50 {
        let current = pv(200.0, 0.03, period);
        assert!(current < previous, "period {} not discounted", period);
        previous = current;
    }
}

#[test]
fn test_negative_rate_rejected() {
    assert_eq!(
        DiscountRate::new(-0.5),
        Err(ModelError::InvalidDiscountRate(-0.5))
    );
}

#[test]
fn test_rate_deserializes_through_validation() {
    let rate: DiscountRate = serde_json::from_str("0.05").unwrap();
    assert_eq!(rate.value(), 0.05);
    assert!(serde_json::from_str::<DiscountRate>("-1.0").is_err());
}

proptest! {
    #[test]
    fn prop_pv_matches_closed_form(
        amount in -1.0e6f64..1.0e6,
        rate in 0.0f64..0.5,
        period in 0u32..200,
    ) {
        let expected = amount / (1.0 + rate).powf(period as f64);
        prop_assert_eq!(pv(amount, rate, period), expected);
    }

    #[test]
    fn prop_zero_rate_is_identity(amount in -1.0e6f64..1.0e6, period in 0u32..1000) {
        prop_assert_eq!(pv(amount, 0.0, period), amount);
    }

    #[test]
    fn prop_present_value_agrees_with_pv(rate in 0.0f64..0.5, period in 0u32..100) {
        let discount = DiscountRate::new(rate).unwrap();
        prop_assert_eq!(discount.present_value(1.0, period), pv(1.0, rate, period));
    }
}
