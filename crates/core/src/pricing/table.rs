//! The fee table.
//!
//! Every report type maps to a flat set of inclusive brackets. Every branch
//! has an explicit default, so pricing never fails.

use super::types::{DeviceType, PriceQuote, ReportDescriptor};
use crate::report::ReportKind;

/// Fee for a report type tag nobody recognises.
pub const DEFAULT_FEE_CENTS: i64 = 500;

/// Fee for a device whose type is missing or unknown.
pub const DEFAULT_DEVICE_FEE_CENTS: i64 = 250;

const HOUSEHOLD_ITEM_FEE_CENTS: i64 = 250;
const PERSONAL_BELONGING_FEE_CENTS: i64 = 200;
const HACKED_ACCOUNT_FEE_CENTS: i64 = 300;
const BUSINESS_REPUTATION_FEE_CENTS: i64 = 1000;

/// Device year brackets: before 2018, 2018 to 2020, 2021 onwards.
type YearTiers = [i64; 3];

const APPLE_PHONE: YearTiers = [350, 450, 600];
const OTHER_PHONE: YearTiers = [200, 300, 400];
const LAPTOP: YearTiers = [300, 400, 500];
const TABLET: YearTiers = [250, 350, 450];

/// Computes the fee for a submission descriptor, in cents.
#[must_use]
pub fn calculate_price(descriptor: &ReportDescriptor) -> i64 {
    let Some(kind) = ReportKind::parse(&descriptor.report_type) else {
        return DEFAULT_FEE_CENTS;
    };

    match kind {
        ReportKind::Vehicle => vehicle_fee(descriptor.year),
        ReportKind::Person => person_fee(descriptor.age),
        ReportKind::Device => device_fee(
            descriptor.device_type.as_deref(),
            descriptor.brand.as_deref(),
            descriptor.year,
        ),
        ReportKind::HouseholdItem => HOUSEHOLD_ITEM_FEE_CENTS,
        ReportKind::PersonalBelonging => PERSONAL_BELONGING_FEE_CENTS,
        ReportKind::HackedAccount => HACKED_ACCOUNT_FEE_CENTS,
        ReportKind::BusinessReputation => BUSINESS_REPUTATION_FEE_CENTS,
    }
}

/// Computes the fee and wraps it as a USD quote.
#[must_use]
pub fn quote(descriptor: &ReportDescriptor) -> PriceQuote {
    PriceQuote::usd(calculate_price(descriptor))
}

fn vehicle_fee(year: Option<i32>) -> i64 {
    match year {
        None => 450,
        Some(y) if y < 2010 => 300,
        Some(2010..=2015) => 350,
        Some(2016..=2020) => 450,
        Some(_) => 640,
    }
}

fn person_fee(age: Option<i32>) -> i64 {
    match age {
        None => 500,
        Some(a) if a <= 7 => 0,
        Some(8..=17) => 400,
        Some(18..=59) => 500,
        Some(_) => 550,
    }
}

fn device_fee(device_type: Option<&str>, brand: Option<&str>, year: Option<i32>) -> i64 {
    let tiers = match device_type.and_then(DeviceType::parse) {
        Some(DeviceType::MobilePhone) if is_apple(brand) => APPLE_PHONE,
        Some(DeviceType::MobilePhone) => OTHER_PHONE,
        Some(DeviceType::Laptop) => LAPTOP,
        Some(DeviceType::Tablet) => TABLET,
        Some(
            DeviceType::Desktop | DeviceType::Smartwatch | DeviceType::Camera | DeviceType::Other,
        )
        | None => return DEFAULT_DEVICE_FEE_CENTS,
    };

    match year {
        None => tiers[1],
        Some(y) if y < 2018 => tiers[0],
        Some(2018..=2020) => tiers[1],
        Some(_) => tiers[2],
    }
}

fn is_apple(brand: Option<&str>) -> bool {
    brand.is_some_and(|b| {
        let b = b.to_lowercase();
        b.contains("apple") || b.contains("iphone")
    })
}
