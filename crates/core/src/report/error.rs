//! Report error types.

use thiserror::Error;
use yaracheck_shared::AppError;

use super::status::ReportStatus;

/// Errors raised by report rules.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: ReportStatus,
        /// The attempted target status.
        to: ReportStatus,
    },

    /// Unknown report category tag.
    #[error("Unknown report kind: {0}")]
    UnknownKind(String),

    /// Unknown status tag.
    #[error("Unknown report status: {0}")]
    UnknownStatus(String),

    /// Submission payload failed validation.
    #[error("Invalid report: {0}")]
    Invalid(String),
}

impl ReportError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. } => 422,
            Self::UnknownKind(_) | Self::UnknownStatus(_) | Self::Invalid(_) => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::UnknownKind(_) => "UNKNOWN_REPORT_KIND",
            Self::UnknownStatus(_) => "UNKNOWN_REPORT_STATUS",
            Self::Invalid(_) => "VALIDATION_ERROR",
        }
    }
}

impl From<ReportError> for AppError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::InvalidTransition { .. } => Self::InvalidTransition(e.to_string()),
            ReportError::UnknownKind(_) | ReportError::UnknownStatus(_) | ReportError::Invalid(_) => {
                Self::Validation(e.to_string())
            }
        }
    }
}
