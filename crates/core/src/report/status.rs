//! Report status lifecycle.
//!
//! Valid transitions:
//! - PendingPayment → Open (payment verified)
//! - Open → Investigating
//! - Investigating → Resolved
//! - Open | Investigating | Resolved → Closed

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ReportError;

/// Report status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Submitted, waiting for the fee.
    PendingPayment,
    /// Accepted and visible to staff.
    Open,
    /// Staff are working on it.
    Investigating,
    /// Found, recovered or otherwise settled.
    Resolved,
    /// Closed; no further changes.
    Closed,
}

impl ReportStatus {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PendingPayment => "pending_payment",
            Self::Open => "open",
            Self::Investigating => "investigating",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending_payment" => Some(Self::PendingPayment),
            "open" => Some(Self::Open),
            "investigating" => Some(Self::Investigating),
            "resolved" => Some(Self::Resolved),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    /// Returns the status a new report starts in.
    #[must_use]
    pub const fn initial(is_free: bool) -> Self {
        if is_free {
            Self::Open
        } else {
            Self::PendingPayment
        }
    }

    /// Returns true once nothing can change any more.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stateless transition rules for reports.
pub struct ReportWorkflow;

impl ReportWorkflow {
    /// Checks if a status transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: ReportStatus, to: ReportStatus) -> bool {
        use ReportStatus::{Closed, Investigating, Open, PendingPayment, Resolved};
        matches!(
            (from, to),
            (PendingPayment, Open)
                | (Open, Investigating)
                | (Investigating, Resolved)
                | (Open | Investigating | Resolved, Closed)
        )
    }

    /// Validates a staff-initiated status change.
    ///
    /// Staff cannot mark a report as paid; that only happens through
    /// [`ReportWorkflow::activate`].
    pub fn transition(from: ReportStatus, to: ReportStatus) -> Result<ReportStatus, ReportError> {
        if from == ReportStatus::PendingPayment || !Self::is_valid_transition(from, to) {
            return Err(ReportError::InvalidTransition { from, to });
        }
        Ok(to)
    }

    /// Moves a report out of `PendingPayment` after its fee was paid.
    pub fn activate(from: ReportStatus) -> Result<ReportStatus, ReportError> {
        if from == ReportStatus::PendingPayment {
            Ok(ReportStatus::Open)
        } else {
            Err(ReportError::InvalidTransition {
                from,
                to: ReportStatus::Open,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReportStatus::{Closed, Investigating, Open, PendingPayment, Resolved};

    const ALL: [ReportStatus; 5] = [PendingPayment, Open, Investigating, Resolved, Closed];

    #[test]
    fn test_parse_round_trip() {
        for s in ALL {
            assert_eq!(ReportStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(ReportStatus::parse("OPEN"), Some(Open));
        assert_eq!(ReportStatus::parse("found"), None);
    }

    #[test]
    fn test_initial_status() {
        assert_eq!(ReportStatus::initial(true), Open);
        assert_eq!(ReportStatus::initial(false), PendingPayment);
    }

    #[test]
    fn test_staff_transitions() {
        assert_eq!(ReportWorkflow::transition(Open, Investigating).unwrap(), Investigating);
        assert_eq!(ReportWorkflow::transition(Investigating, Resolved).unwrap(), Resolved);
        assert_eq!(ReportWorkflow::transition(Resolved, Closed).unwrap(), Closed);
        assert_eq!(ReportWorkflow::transition(Open, Closed).unwrap(), Closed);
    }

    #[test]
    fn test_staff_cannot_skip_or_reverse() {
        assert!(ReportWorkflow::transition(Open, Resolved).is_err());
        assert!(ReportWorkflow::transition(Resolved, Investigating).is_err());
        assert!(ReportWorkflow::transition(Closed, Open).is_err());
        assert!(ReportWorkflow::transition(Open, Open).is_err());
    }

    #[test]
    fn test_staff_cannot_activate_unpaid_report() {
        let err = ReportWorkflow::transition(PendingPayment, Open).unwrap_err();
        assert!(matches!(
            err,
            ReportError::InvalidTransition {
                from: PendingPayment,
                to: Open
            }
        ));
        assert!(ReportWorkflow::transition(PendingPayment, Closed).is_err());
    }

    #[test]
    fn test_activate() {
        assert_eq!(ReportWorkflow::activate(PendingPayment).unwrap(), Open);
        assert!(ReportWorkflow::activate(Open).is_err());
        assert!(ReportWorkflow::activate(Closed).is_err());
    }

    #[test]
    fn test_no_transition_leaves_closed() {
        for to in ALL {
            assert!(!ReportWorkflow::is_valid_transition(Closed, to));
        }
        assert!(Closed.is_terminal());
        assert!(!Resolved.is_terminal());
    }
}
