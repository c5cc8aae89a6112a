//! ROI error types.

use rust_decimal::Decimal;
use thiserror::Error;
use yaracheck_shared::AppError;

use super::types::WithdrawalStatus;

/// Errors raised by distribution and withdrawal rules.
#[derive(Debug, Error)]
pub enum RoiError {
    /// Percentage outside `(0, 100]`.
    #[error("Percentage must be greater than 0 and at most 100, got {0}")]
    InvalidPercentage(Decimal),

    /// Pool amount not positive.
    #[error("Pool amount must be positive, got {0}")]
    InvalidPoolAmount(Decimal),

    /// Period ends before it starts.
    #[error("Period start must not be after period end")]
    InvalidPeriod,

    /// Distribution is not open for withdrawals.
    #[error("Distribution is not enabled for withdrawals")]
    DistributionDisabled,

    /// Requested amount not positive.
    #[error("Withdrawal amount must be positive")]
    NonPositiveAmount,

    /// Requested amount exceeds what is left.
    #[error("Requested {requested} exceeds available balance {available}")]
    ExceedsAvailable {
        /// Amount asked for.
        requested: Decimal,
        /// Amount left on the distribution.
        available: Decimal,
    },

    /// Attempted to skip or reverse a withdrawal status.
    #[error("Invalid withdrawal transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: WithdrawalStatus,
        /// The attempted target status.
        to: WithdrawalStatus,
    },

    /// Withdrawal already completed.
    #[error("Withdrawal is already completed")]
    AlreadyCompleted,
}

impl RoiError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidPercentage(_)
            | Self::InvalidPoolAmount(_)
            | Self::InvalidPeriod
            | Self::NonPositiveAmount => 400,
            Self::DistributionDisabled
            | Self::ExceedsAvailable { .. }
            | Self::InvalidTransition { .. }
            | Self::AlreadyCompleted => 422,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPercentage(_)
            | Self::InvalidPoolAmount(_)
            | Self::InvalidPeriod
            | Self::NonPositiveAmount => "VALIDATION_ERROR",
            Self::DistributionDisabled => "DISTRIBUTION_DISABLED",
            Self::ExceedsAvailable { .. } => "INSUFFICIENT_BALANCE",
            Self::InvalidTransition { .. } | Self::AlreadyCompleted => "INVALID_TRANSITION",
        }
    }
}

impl From<RoiError> for AppError {
    fn from(e: RoiError) -> Self {
        match e {
            RoiError::InvalidPercentage(_)
            | RoiError::InvalidPoolAmount(_)
            | RoiError::InvalidPeriod
            | RoiError::NonPositiveAmount => Self::Validation(e.to_string()),
            RoiError::DistributionDisabled | RoiError::ExceedsAvailable { .. } => {
                Self::BusinessRule(e.to_string())
            }
            RoiError::InvalidTransition { .. } | RoiError::AlreadyCompleted => {
                Self::InvalidTransition(e.to_string())
            }
        }
    }
}
