//! Shareholder ROI distributions and withdrawal requests.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::RoiError;
pub use service::RoiService;
pub use types::{DistributionInput, WithdrawalStatus};
