//! Pricing input and output types.

use serde::{Deserialize, Serialize};
use yaracheck_shared::types::{Currency, Money};

use crate::report::ReportKind;

/// Kind of device named on a device report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    /// Mobile phone; priced by brand class and year.
    MobilePhone,
    /// Laptop computer.
    Laptop,
    /// Tablet.
    Tablet,
    /// Desktop computer.
    Desktop,
    /// Smartwatch.
    Smartwatch,
    /// Camera.
    Camera,
    /// Anything else.
    Other,
}

impl DeviceType {
    /// Parses a device type tag; unknown tags yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "mobile_phone" | "phone" | "mobile" | "smartphone" => Some(Self::MobilePhone),
            "laptop" => Some(Self::Laptop),
            "tablet" => Some(Self::Tablet),
            "desktop" => Some(Self::Desktop),
            "smartwatch" | "watch" => Some(Self::Smartwatch),
            "camera" => Some(Self::Camera),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Returns the canonical tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MobilePhone => "mobile_phone",
            Self::Laptop => "laptop",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
            Self::Smartwatch => "smartwatch",
            Self::Camera => "camera",
            Self::Other => "other",
        }
    }
}

/// Report submission descriptor: everything the fee depends on.
///
/// Tags are kept as free text so that an unrecognised value falls back to a
/// default fee instead of failing the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDescriptor {
    /// Report type tag (`vehicle`, `person`, ...).
    pub report_type: String,
    /// Device type tag, for device reports.
    #[serde(default)]
    pub device_type: Option<String>,
    /// Manufacture year, for devices and vehicles.
    #[serde(default)]
    pub year: Option<i32>,
    /// Age of a missing person.
    #[serde(default)]
    pub age: Option<i32>,
    /// Brand, for devices.
    #[serde(default)]
    pub brand: Option<String>,
}

impl ReportDescriptor {
    /// Creates a descriptor for a report kind with no attributes.
    #[must_use]
    pub fn for_kind(kind: ReportKind) -> Self {
        Self {
            report_type: kind.as_str().to_string(),
            ..Self::default()
        }
    }

    /// Sets the manufacture year.
    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Sets the age.
    #[must_use]
    pub fn with_age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    /// Sets the device type tag.
    #[must_use]
    pub fn with_device(mut self, device_type: DeviceType) -> Self {
        self.device_type = Some(device_type.as_str().to_string());
        self
    }

    /// Sets the brand.
    #[must_use]
    pub fn with_brand(mut self, brand: &str) -> Self {
        self.brand = Some(brand.to_string());
        self
    }
}

/// A computed fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    /// Fee in cents.
    pub price_cents: i64,
    /// Same fee in major units with currency.
    pub amount: Money,
}

impl PriceQuote {
    /// Builds a USD quote from cents.
    #[must_use]
    pub fn usd(price_cents: i64) -> Self {
        Self {
            price_cents,
            amount: Money::from_minor(price_cents, Currency::Usd),
        }
    }

    /// Returns true if the report can be accepted without payment.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.price_cents == 0
    }
}
