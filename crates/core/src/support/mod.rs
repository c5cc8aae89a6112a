//! Support tickets and anonymous messages.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use yaracheck_shared::AppError;

const MAX_SUBJECT_LEN: usize = 200;
const MAX_MESSAGE_LEN: usize = 5_000;

/// Support ticket status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Waiting for staff.
    Open,
    /// Picked up by support.
    InProgress,
    /// Answered; may still be closed.
    Resolved,
    /// Done.
    Closed,
}

impl TicketStatus {
    /// Returns the string stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Parses a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "open" => Some(Self::Open),
            "in_progress" => Some(Self::InProgress),
            "resolved" => Some(Self::Resolved),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Support errors.
#[derive(Debug, Error)]
pub enum SupportError {
    /// Attempted an invalid status transition.
    #[error("Invalid ticket transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: TicketStatus,
        /// The attempted target status.
        to: TicketStatus,
    },

    /// Input failed validation.
    #[error("{0}")]
    Invalid(String),
}

impl SupportError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. } => 422,
            Self::Invalid(_) => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Invalid(_) => "VALIDATION_ERROR",
        }
    }
}

impl From<SupportError> for AppError {
    fn from(e: SupportError) -> Self {
        match e {
            SupportError::InvalidTransition { .. } => Self::InvalidTransition(e.to_string()),
            SupportError::Invalid(_) => Self::Validation(e.to_string()),
        }
    }
}

/// Stateless ticket rules.
pub struct TicketWorkflow;

impl TicketWorkflow {
    /// Checks if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Open → InProgress
    /// - InProgress → Resolved
    /// - Resolved → Closed
    /// - Open | InProgress → Closed
    #[must_use]
    pub fn is_valid_transition(from: TicketStatus, to: TicketStatus) -> bool {
        use TicketStatus::{Closed, InProgress, Open, Resolved};
        matches!(
            (from, to),
            (Open, InProgress) | (InProgress, Resolved) | (Open | InProgress | Resolved, Closed)
        )
    }

    /// Validates a status change.
    pub fn transition(from: TicketStatus, to: TicketStatus) -> Result<TicketStatus, SupportError> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(SupportError::InvalidTransition { from, to })
        }
    }

    /// Validates a new ticket.
    pub fn validate_ticket(subject: &str, message: &str) -> Result<(), SupportError> {
        if subject.trim().is_empty() {
            return Err(SupportError::Invalid("Subject is required".to_string()));
        }
        if subject.chars().count() > MAX_SUBJECT_LEN {
            return Err(SupportError::Invalid(format!(
                "Subject must be at most {MAX_SUBJECT_LEN} characters"
            )));
        }
        validate_message(message)
    }
}

/// Validates a message body (tickets and anonymous messages).
pub fn validate_message(message: &str) -> Result<(), SupportError> {
    if message.trim().is_empty() {
        return Err(SupportError::Invalid("Message is required".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(SupportError::Invalid(format!(
            "Message must be at most {MAX_MESSAGE_LEN} characters"
        )));
    }
    Ok(())
}
