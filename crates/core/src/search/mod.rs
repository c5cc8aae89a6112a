//! Tracking-code search.
//!
//! The database layer runs one OR'd query per report table; this module
//! validates the input, decides which columns are searched and merges the
//! per-table batches.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use yaracheck_shared::AppError;

use crate::report::ReportKind;

#[cfg(test)]
mod merge_props;

/// Longest accepted query, in characters.
pub const MAX_QUERY_LEN: usize = 100;

/// Maximum hits returned per report table.
pub const PER_TABLE_LIMIT: u64 = 50;

/// A validated search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    /// Trimmed query text.
    pub text: String,
    /// `%text%` with LIKE wildcards escaped.
    pub pattern: String,
    /// Set when the query is a UUID, to match row IDs exactly.
    pub id: Option<Uuid>,
}

impl SearchTerm {
    /// Parses raw user input.
    ///
    /// Returns `Ok(None)` for a blank query; callers answer with an empty
    /// result without touching the database.
    pub fn parse(raw: &str) -> Result<Option<Self>, AppError> {
        let text = raw.trim();
        if text.is_empty() {
            return Ok(None);
        }
        if text.chars().count() > MAX_QUERY_LEN {
            return Err(AppError::Validation(format!(
                "Search query must be at most {MAX_QUERY_LEN} characters"
            )));
        }
        Ok(Some(Self {
            text: text.to_string(),
            pattern: format!("%{}%", escape_like(text)),
            id: Uuid::parse_str(text).ok(),
        }))
    }
}

/// Escapes `\`, `%` and `_` for use inside a LIKE pattern.
#[must_use]
pub fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Identifier columns matched with ILIKE, besides the tracking code.
#[must_use]
pub const fn identifier_columns(kind: ReportKind) -> &'static [&'static str] {
    match kind {
        ReportKind::Person => &["full_name"],
        ReportKind::Device => &["imei", "serial_number", "brand", "model"],
        ReportKind::Vehicle => &["chassis_number", "plate_number", "brand", "model"],
        ReportKind::HouseholdItem => &["item_name", "serial_number", "brand", "model"],
        ReportKind::PersonalBelonging => &["item_name", "brand"],
        ReportKind::HackedAccount => &["account_identifier", "platform"],
        ReportKind::BusinessReputation => &["business_name", "reported_name"],
    }
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    /// Row ID.
    pub id: Uuid,
    /// Report kind.
    pub kind: ReportKind,
    /// Category label, e.g. "Missing Person".
    pub category: &'static str,
    /// Public tracking code.
    pub tracking_code: String,
    /// Current status.
    pub status: String,
    /// Short title.
    pub title: String,
    /// Submission time.
    pub created_at: DateTime<Utc>,
}

/// Merges per-table batches, newest first, ties broken by tracking code.
#[must_use]
pub fn merge(batches: Vec<Vec<SearchHit>>) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = batches.into_iter().flatten().collect();
    hits.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.tracking_code.cmp(&b.tracking_code))
    });
    hits
}

/// Public view of a report, returned by the tracking lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingStatus {
    /// Public tracking code.
    pub tracking_code: String,
    /// Category label.
    pub category: &'static str,
    /// Current status.
    pub status: String,
    /// Submission time.
    pub created_at: DateTime<Utc>,
}
