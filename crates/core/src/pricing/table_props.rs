//! Property-based tests for the fee table.
//!
//! - Fees never go down as year or age goes up within one report type
//! - Fees are never negative
//! - Any descriptor at all yields a fee (no panics)

use proptest::prelude::*;

use super::table::calculate_price;
use super::types::{DeviceType, ReportDescriptor};
use crate::report::ReportKind;

fn arb_kind() -> impl Strategy<Value = ReportKind> {
    prop::sample::select(ReportKind::ALL.to_vec())
}

fn arb_device() -> impl Strategy<Value = DeviceType> {
    prop_oneof![
        Just(DeviceType::MobilePhone),
        Just(DeviceType::Laptop),
        Just(DeviceType::Tablet),
        Just(DeviceType::Desktop),
        Just(DeviceType::Smartwatch),
        Just(DeviceType::Camera),
        Just(DeviceType::Other),
    ]
}

fn arb_brand() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("Apple".to_string())),
        Just(Some("Samsung".to_string())),
        "[a-zA-Z ]{0,12}".prop_map(Some),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_vehicle_fee_non_decreasing_in_year(a in 1950i32..2040, b in 1950i32..2040) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let base = ReportDescriptor::for_kind(ReportKind::Vehicle);
        prop_assert!(
            calculate_price(&base.clone().with_year(lo))
                <= calculate_price(&base.with_year(hi))
        );
    }

    #[test]
    fn prop_person_fee_non_decreasing_in_age(a in 0i32..120, b in 0i32..120) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let base = ReportDescriptor::for_kind(ReportKind::Person);
        prop_assert!(
            calculate_price(&base.clone().with_age(lo))
                <= calculate_price(&base.with_age(hi))
        );
    }

    #[test]
    fn prop_device_fee_non_decreasing_in_year(
        device in arb_device(),
        brand in arb_brand(),
        a in 1990i32..2040,
        b in 1990i32..2040,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let mut base = ReportDescriptor::for_kind(ReportKind::Device).with_device(device);
        base.brand = brand;
        prop_assert!(
            calculate_price(&base.clone().with_year(lo))
                <= calculate_price(&base.with_year(hi))
        );
    }

    #[test]
    fn prop_fee_is_never_negative(
        kind in arb_kind(),
        year in proptest::option::of(-5000i32..5000),
        age in proptest::option::of(-50i32..200),
        device in proptest::option::of("[a-z_]{0,14}"),
        brand in arb_brand(),
    ) {
        let descriptor = ReportDescriptor {
            report_type: kind.as_str().to_string(),
            device_type: device,
            year,
            age,
            brand,
        };
        prop_assert!(calculate_price(&descriptor) >= 0);
    }

    #[test]
    fn prop_arbitrary_tags_never_panic(tag in ".{0,24}", year in any::<Option<i32>>()) {
        let descriptor = ReportDescriptor {
            report_type: tag,
            year,
            ..ReportDescriptor::default()
        };
        let fee = calculate_price(&descriptor);
        prop_assert!(fee >= 0);
    }
}
