//! Payment error types.

use thiserror::Error;
use yaracheck_shared::AppError;

use super::types::Provider;

/// Errors from payment providers and payment rules.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// No secret key configured for the provider.
    #[error("{0} provider not configured")]
    NotConfigured(Provider),

    /// Request could not be sent.
    #[error("{provider} request failed: {source}")]
    Http {
        /// Provider called.
        provider: Provider,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },

    /// Provider answered with a non-success status.
    #[error("{provider} returned HTTP {status}: {body}")]
    Api {
        /// Provider called.
        provider: Provider,
        /// HTTP status.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Provider answered with an unexpected body.
    #[error("{provider} returned an unexpected response: {message}")]
    InvalidResponse {
        /// Provider called.
        provider: Provider,
        /// What was missing or wrong.
        message: String,
    },

    /// Unknown provider name.
    #[error("Unknown payment provider: {0}")]
    UnknownProvider(String),

    /// Report does not need or no longer accepts payment.
    #[error("Report is not awaiting payment")]
    NotPayable,
}

impl PaymentError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotConfigured(_)
            | Self::Http { .. }
            | Self::Api { .. }
            | Self::InvalidResponse { .. } => 502,
            Self::UnknownProvider(_) => 400,
            Self::NotPayable => 422,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured(_)
            | Self::Http { .. }
            | Self::Api { .. }
            | Self::InvalidResponse { .. } => "EXTERNAL_SERVICE_ERROR",
            Self::UnknownProvider(_) => "VALIDATION_ERROR",
            Self::NotPayable => "BUSINESS_RULE_VIOLATION",
        }
    }
}

impl From<PaymentError> for AppError {
    fn from(e: PaymentError) -> Self {
        match e {
            PaymentError::NotConfigured(_) => Self::ExternalService(e.to_string()),
            // Provider bodies may carry account details; keep them out of responses.
            PaymentError::Http { provider, .. }
            | PaymentError::Api { provider, .. }
            | PaymentError::InvalidResponse { provider, .. } => {
                Self::ExternalService(format!("{provider} request failed"))
            }
            PaymentError::UnknownProvider(_) => Self::Validation(e.to_string()),
            PaymentError::NotPayable => Self::BusinessRule(e.to_string()),
        }
    }
}
