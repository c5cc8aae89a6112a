//! Payment types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use crate::report::ReportKind;

/// Supported checkout providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Stripe Checkout sessions.
    Stripe,
    /// Paystack hosted payments.
    Paystack,
    /// Flutterwave Standard.
    Flutterwave,
}

impl Provider {
    /// Returns the string stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stripe => "stripe",
            Self::Paystack => "paystack",
            Self::Flutterwave => "flutterwave",
        }
    }

    /// Parses a provider name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "stripe" => Some(Self::Stripe),
            "paystack" => Some(Self::Paystack),
            "flutterwave" => Some(Self::Flutterwave),
            _ => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a row in `transactions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Checkout opened, not yet verified.
    Pending,
    /// Provider confirmed the full charge.
    Success,
    /// Provider reported the charge as not paid.
    Failed,
}

impl PaymentStatus {
    /// Returns the string stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    /// Parses a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generates a payment reference: `YCP-<32 hex chars>`.
#[must_use]
pub fn generate_reference() -> String {
    format!("YCP-{}", Uuid::new_v4().simple())
}

/// Everything a provider needs to open a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    /// Provider to charge through.
    pub provider: Provider,
    /// Our payment reference.
    pub reference: String,
    /// Kind of report being paid for.
    pub kind: ReportKind,
    /// Tracking code of the report.
    pub tracking_code: String,
    /// Fee in minor units.
    pub amount_cents: i64,
    /// ISO currency code.
    pub currency: String,
    /// Payer email.
    pub customer_email: String,
    /// Payer name.
    pub customer_name: String,
}

impl CheckoutRequest {
    /// Product line shown on the checkout page.
    #[must_use]
    pub fn product_name(&self) -> String {
        format!("YaraCheck {} report", self.kind.label())
    }
}

/// An opened checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkout {
    /// Page to send the payer to.
    pub checkout_url: String,
    /// Provider data needed later for verification.
    pub provider_payload: Option<Value>,
}

/// The charge a verification must match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedCharge {
    /// Fee in minor units.
    pub amount_cents: i64,
    /// ISO currency code.
    pub currency: String,
}

/// Outcome of asking a provider about a payment.
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    /// True when the provider reports the expected charge as settled.
    pub paid: bool,
    /// Raw provider response.
    pub provider_payload: Value,
}
