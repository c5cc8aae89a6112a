//! ROI distribution and withdrawal types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use yaracheck_shared::types::ProfileId;

/// Withdrawal request status. Progression is strictly linear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    /// Requested by the shareholder.
    Pending,
    /// Approved by management.
    Approved,
    /// Funds sent.
    Sent,
    /// Receipt confirmed.
    Completed,
}

impl WithdrawalStatus {
    /// Every status in progression order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Approved, Self::Sent, Self::Completed];

    /// Returns the string representation stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Sent => "sent",
            Self::Completed => "completed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "sent" => Some(Self::Sent),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Returns the next status, or `None` once completed.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Approved),
            Self::Approved => Some(Self::Sent),
            Self::Sent => Some(Self::Completed),
            Self::Completed => None,
        }
    }
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for a new distribution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DistributionInput {
    /// Receiving shareholder or investor.
    pub shareholder_id: ProfileId,
    /// Pool the percentage applies to.
    pub pool_amount: Decimal,
    /// Share of the pool, `0 < pct <= 100`.
    pub percentage: Decimal,
    /// First day of the period.
    pub period_start: NaiveDate,
    /// Last day of the period.
    pub period_end: NaiveDate,
    /// Free text.
    #[serde(default)]
    pub notes: Option<String>,
}
