//! Report fee payments through Stripe, Paystack and Flutterwave.
//!
//! - `types` - Providers, statuses, checkout request/response
//! - `provider` - Per-provider request bodies and response parsing
//! - `gateway` - The [`PaymentGateway`] trait and its HTTP implementation

pub mod error;
pub mod gateway;
pub mod provider;
pub mod types;

pub use error::PaymentError;
pub use gateway::{HttpPaymentGateway, PaymentGateway, ProviderEndpoints};
pub use types::{
    Checkout, CheckoutRequest, ExpectedCharge, PaymentStatus, Provider, Verification,
    generate_reference,
};
