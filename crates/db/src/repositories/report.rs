//! Report repository.
//!
//! Every report kind has its own table. Inserts go through the typed
//! entities; reads that work across kinds (listings, status changes,
//! tracking lookup, search) use raw statements over the shared columns,
//! with the table name taken from [`ReportKind::table_name`].

use std::sync::Arc;

use futures::future::try_join_all;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr, FromQueryResult, Set,
    SqlErr, Statement, Value,
};
use serde::Serialize;
use uuid::Uuid;

use yaracheck_core::access::GeoScope;
use yaracheck_core::report::{ReportDetails, ReportKind, ReportStatus, tracking};
use yaracheck_core::search::{self, PER_TABLE_LIMIT, SearchHit, SearchTerm, TrackingStatus};
use yaracheck_shared::types::PageRequest;

use crate::entities::{
    business_reputation_reports, devices, hacked_accounts, household_items, personal_belongings,
    persons, vehicles,
};

/// Attempts at drawing a fresh tracking code before giving up.
const MAX_CODE_ATTEMPTS: usize = 3;

/// Columns shared by every report table, set at submission.
#[derive(Debug, Clone)]
pub struct NewReport {
    /// Submitting user.
    pub reporter_id: Uuid,
    /// Country of the incident.
    pub country_id: Option<Uuid>,
    /// Province of the incident.
    pub province_id: Option<Uuid>,
    /// Fee charged, in cents.
    pub price_cents: i64,
    /// ISO 4217 code of the fee.
    pub currency: String,
    /// Initial status.
    pub status: ReportStatus,
}

/// A freshly stored report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedReport {
    /// Row ID.
    pub id: Uuid,
    /// Report kind.
    pub kind: ReportKind,
    /// Public tracking code.
    pub tracking_code: String,
    /// Initial status.
    pub status: ReportStatus,
    /// Fee charged, in cents.
    pub price_cents: i64,
    /// Fee currency.
    pub currency: String,
}

/// A report of any kind, with its kind-specific columns under `details`.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct ReportRow {
    /// Row ID within its table.
    pub id: Uuid,
    /// Report kind, e.g. `vehicle`.
    pub kind: String,
    /// Public tracking code.
    pub tracking_code: String,
    /// Lifecycle status.
    pub status: String,
    /// Submitting profile.
    pub reporter_id: Uuid,
    /// Country of the incident.
    pub country_id: Option<Uuid>,
    /// Province of the incident.
    pub province_id: Option<Uuid>,
    /// Fee charged, in cents.
    pub price_cents: i64,
    /// Fee currency.
    pub currency: String,
    /// Short label built from the details.
    pub title: String,
    /// Kind-specific columns.
    pub details: serde_json::Value,
    /// Submission time.
    pub created_at: DateTimeWithTimeZone,
    /// Last change.
    pub updated_at: DateTimeWithTimeZone,
}

impl ReportRow {
    /// Parses the stored status.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::Type` for a value outside the lifecycle.
    pub fn status(&self) -> Result<ReportStatus, DbErr> {
        parse_status(&self.status)
    }
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    total: i64,
}

#[derive(Debug, FromQueryResult)]
struct StatusRow {
    status: String,
}

#[derive(Debug, FromQueryResult)]
struct TrackingRow {
    tracking_code: String,
    status: String,
    created_at: DateTimeWithTimeZone,
}

#[derive(Debug, FromQueryResult)]
struct SearchRow {
    id: Uuid,
    tracking_code: String,
    status: String,
    title: String,
    created_at: DateTimeWithTimeZone,
}

/// Positional filters for a raw statement.
#[derive(Debug, Default)]
struct Filters {
    clauses: Vec<String>,
    values: Vec<Value>,
}

impl Filters {
    fn eq(&mut self, column: &str, value: impl Into<Value>) {
        self.values.push(value.into());
        self.clauses.push(format!("{column} = ${}", self.values.len()));
    }

    /// Adds the country filter for a scope. Returns false if the scope
    /// admits no rows.
    fn scope(&mut self, scope: GeoScope) -> bool {
        match scope {
            GeoScope::Unrestricted => true,
            GeoScope::Country(country) => {
                self.eq("country_id", country.into_inner());
                true
            }
            GeoScope::Nothing => false,
        }
    }

    fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

fn parse_status(s: &str) -> Result<ReportStatus, DbErr> {
    ReportStatus::parse(s).ok_or_else(|| DbErr::Type(format!("unknown report status '{s}'")))
}

/// SQL expression for a row's short title.
const fn title_expr(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Person => "full_name",
        ReportKind::Device | ReportKind::Vehicle => "brand || ' ' || model",
        ReportKind::HouseholdItem | ReportKind::PersonalBelonging => "item_name",
        ReportKind::HackedAccount => "platform || ': ' || account_identifier",
        ReportKind::BusinessReputation => "business_name",
    }
}

fn select_sql(kind: ReportKind) -> String {
    format!(
        "SELECT id, '{kind}' AS kind, tracking_code, status, reporter_id, country_id, \
         province_id, price_cents, currency, {title} AS title, to_jsonb(t) AS details, \
         created_at, updated_at FROM {table} t",
        kind = kind.as_str(),
        title = title_expr(kind),
        table = kind.table_name(),
    )
}

/// Builds the count and page statements for an admin listing, or `None`
/// when the scope admits no rows.
fn list_statements(
    kind: ReportKind,
    scope: GeoScope,
    status: Option<ReportStatus>,
    page: &PageRequest,
) -> Option<(Statement, Statement)> {
    let mut filters = Filters::default();
    if !filters.scope(scope) {
        return None;
    }
    if let Some(status) = status {
        filters.eq("status", status.as_str());
    }

    let where_sql = filters.where_sql();
    let count = Statement::from_sql_and_values(
        DbBackend::Postgres,
        format!("SELECT COUNT(*) AS total FROM {} t{where_sql}", kind.table_name()),
        filters.values.clone(),
    );
    let rows = Statement::from_sql_and_values(
        DbBackend::Postgres,
        format!(
            "{}{where_sql} ORDER BY created_at DESC, tracking_code LIMIT {} OFFSET {}",
            select_sql(kind),
            page.limit(),
            page.offset()
        ),
        filters.values,
    );
    Some((count, rows))
}

/// Builds the OR'd search statement for one table, or `None` when the
/// scope admits no rows.
fn search_statement(kind: ReportKind, term: &SearchTerm, scope: GeoScope) -> Option<Statement> {
    let mut values: Vec<Value> = vec![term.pattern.clone().into()];
    let mut matches: Vec<String> = std::iter::once("tracking_code")
        .chain(search::identifier_columns(kind).iter().copied())
        .map(|column| format!("{column} ILIKE $1"))
        .collect();
    if let Some(id) = term.id {
        values.push(id.into());
        matches.push(format!("id = ${}", values.len()));
    }

    let mut sql = format!(
        "SELECT id, tracking_code, status, {title} AS title, created_at FROM {table} \
         WHERE ({matches})",
        title = title_expr(kind),
        table = kind.table_name(),
        matches = matches.join(" OR "),
    );
    match scope {
        GeoScope::Unrestricted => {}
        GeoScope::Country(country) => {
            values.push(country.into_inner().into());
            sql.push_str(&format!(" AND country_id = ${}", values.len()));
        }
        GeoScope::Nothing => return None,
    }
    sql.push_str(&format!(" ORDER BY created_at DESC LIMIT {PER_TABLE_LIMIT}"));

    Some(Statement::from_sql_and_values(
        DbBackend::Postgres,
        sql,
        values,
    ))
}

/// Reads a report's status with a row lock. Must run inside a transaction.
pub(crate) async fn lock_status<C: ConnectionTrait>(
    conn: &C,
    kind: ReportKind,
    id: Uuid,
) -> Result<Option<ReportStatus>, DbErr> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        format!("SELECT status FROM {} WHERE id = $1 FOR UPDATE", kind.table_name()),
        [id.into()],
    );
    StatusRow::find_by_statement(stmt)
        .one(conn)
        .await?
        .map(|row| parse_status(&row.status))
        .transpose()
}

/// Moves a report from `from` to `to`. Returns false if the row was not in
/// `from` any more.
pub(crate) async fn set_status<C: ConnectionTrait>(
    conn: &C,
    kind: ReportKind,
    id: Uuid,
    from: ReportStatus,
    to: ReportStatus,
) -> Result<bool, DbErr> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        format!(
            "UPDATE {} SET status = $1 WHERE id = $2 AND status = $3",
            kind.table_name()
        ),
        [to.as_str().into(), id.into(), from.as_str().into()],
    );
    Ok(conn.execute(stmt).await?.rows_affected() == 1)
}

fn text(value: &str) -> String {
    value.trim().to_string()
}

fn opt_text(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

macro_rules! insert_report {
    ($entity:ident, $db:expr, $new:expr, $code:expr, { $($field:ident: $value:expr),* $(,)? }) => {{
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        $entity::ActiveModel {
            id: Set(Uuid::now_v7()),
            tracking_code: Set($code.to_string()),
            status: Set($new.status.as_str().to_string()),
            reporter_id: Set($new.reporter_id),
            country_id: Set($new.country_id),
            province_id: Set($new.province_id),
            price_cents: Set($new.price_cents),
            currency: Set($new.currency.clone()),
            $($field: Set($value),)*
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert($db)
        .await
        .map(|m| m.id)
    }};
}

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Stores a submission under a fresh tracking code, drawing a new code
    /// if the first one collides.
    pub async fn create(
        &self,
        details: &ReportDetails,
        new: &NewReport,
    ) -> Result<CreatedReport, DbErr> {
        let kind = details.kind();
        let mut attempt = 0;
        loop {
            attempt += 1;
            let code = tracking::generate(kind);
            match self.insert(details, new, &code).await {
                Ok(id) => {
                    tracing::info!(
                        report_id = %id,
                        kind = %kind,
                        tracking_code = %code,
                        status = %new.status,
                        "Report created"
                    );
                    return Ok(CreatedReport {
                        id,
                        kind,
                        tracking_code: code,
                        status: new.status,
                        price_cents: new.price_cents,
                        currency: new.currency.clone(),
                    });
                }
                Err(err)
                    if attempt < MAX_CODE_ATTEMPTS
                        && matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
                {
                    tracing::warn!(tracking_code = %code, attempt, "Tracking code collision");
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn insert(
        &self,
        details: &ReportDetails,
        new: &NewReport,
        code: &str,
    ) -> Result<Uuid, DbErr> {
        let db = self.db.as_ref();
        match details {
            ReportDetails::Person(d) => insert_report!(persons, db, new, code, {
                full_name: text(&d.full_name),
                age: d.age,
                gender: opt_text(d.gender.as_ref()),
                last_seen_location: opt_text(d.last_seen_location.as_ref()),
                description: opt_text(d.description.as_ref()),
            }),
            ReportDetails::Device(d) => insert_report!(devices, db, new, code, {
                device_type: text(&d.device_type),
                brand: text(&d.brand),
                model: text(&d.model),
                imei: opt_text(d.imei.as_ref()),
                serial_number: opt_text(d.serial_number.as_ref()),
                year: d.year,
            }),
            ReportDetails::Vehicle(d) => insert_report!(vehicles, db, new, code, {
                vehicle_type: text(&d.vehicle_type),
                brand: text(&d.brand),
                model: text(&d.model),
                year: d.year,
                chassis_number: opt_text(d.chassis_number.as_ref()),
                plate_number: opt_text(d.plate_number.as_ref()),
                color: opt_text(d.color.as_ref()),
            }),
            ReportDetails::HouseholdItem(d) => insert_report!(household_items, db, new, code, {
                item_name: text(&d.item_name),
                brand: opt_text(d.brand.as_ref()),
                model: opt_text(d.model.as_ref()),
                serial_number: opt_text(d.serial_number.as_ref()),
            }),
            ReportDetails::PersonalBelonging(d) => {
                insert_report!(personal_belongings, db, new, code, {
                    item_name: text(&d.item_name),
                    brand: opt_text(d.brand.as_ref()),
                    description: opt_text(d.description.as_ref()),
                })
            }
            ReportDetails::HackedAccount(d) => insert_report!(hacked_accounts, db, new, code, {
                platform: text(&d.platform),
                account_identifier: text(&d.account_identifier),
                description: opt_text(d.description.as_ref()),
            }),
            ReportDetails::BusinessReputation(d) => {
                insert_report!(business_reputation_reports, db, new, code, {
                    business_name: text(&d.business_name),
                    reported_name: opt_text(d.reported_name.as_ref()),
                    description: opt_text(d.description.as_ref()),
                })
            }
        }
    }

    /// Finds a report by kind and ID.
    pub async fn find(&self, kind: ReportKind, id: Uuid) -> Result<Option<ReportRow>, DbErr> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            format!("{} WHERE id = $1", select_sql(kind)),
            [id.into()],
        );
        ReportRow::find_by_statement(stmt).one(self.db.as_ref()).await
    }

    /// Lists one kind's reports visible under `scope`, newest first.
    pub async fn list(
        &self,
        kind: ReportKind,
        scope: GeoScope,
        status: Option<ReportStatus>,
        page: &PageRequest,
    ) -> Result<(Vec<ReportRow>, u64), DbErr> {
        let Some((count, rows)) = list_statements(kind, scope, status, page) else {
            return Ok((Vec::new(), 0));
        };

        let total = CountRow::find_by_statement(count)
            .one(self.db.as_ref())
            .await?
            .map_or(0, |row| u64::try_from(row.total).unwrap_or(0));
        let items = ReportRow::find_by_statement(rows).all(self.db.as_ref()).await?;
        Ok((items, total))
    }

    /// Lists every report a user submitted, across kinds, newest first.
    pub async fn list_by_reporter(&self, reporter_id: Uuid) -> Result<Vec<ReportRow>, DbErr> {
        let batches = try_join_all(ReportKind::ALL.iter().map(|&kind| {
            let stmt = Statement::from_sql_and_values(
                DbBackend::Postgres,
                format!(
                    "{} WHERE reporter_id = $1 ORDER BY created_at DESC",
                    select_sql(kind)
                ),
                [reporter_id.into()],
            );
            ReportRow::find_by_statement(stmt).all(self.db.as_ref())
        }))
        .await?;

        let mut rows: Vec<ReportRow> = batches.into_iter().flatten().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    /// Moves a report from `from` to `to`. Returns false if the report was
    /// changed concurrently.
    pub async fn update_status(
        &self,
        kind: ReportKind,
        id: Uuid,
        from: ReportStatus,
        to: ReportStatus,
    ) -> Result<bool, DbErr> {
        let updated = set_status(self.db.as_ref(), kind, id, from, to).await?;
        if updated {
            tracing::info!(report_id = %id, kind = %kind, from = %from, to = %to, "Report status changed");
        }
        Ok(updated)
    }

    /// Public status lookup by tracking code. The code's prefix names the
    /// table, so only that table is queried.
    pub async fn find_by_tracking_code(
        &self,
        code: &str,
    ) -> Result<Option<TrackingStatus>, DbErr> {
        let code = tracking::normalize(code);
        let Some(kind) = tracking::parse(&code) else {
            return Ok(None);
        };

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            format!(
                "SELECT tracking_code, status, created_at FROM {} WHERE tracking_code = $1",
                kind.table_name()
            ),
            [code.into()],
        );
        Ok(TrackingRow::find_by_statement(stmt)
            .one(self.db.as_ref())
            .await?
            .map(|row| TrackingStatus {
                tracking_code: row.tracking_code,
                category: kind.label(),
                status: row.status,
                created_at: row.created_at.with_timezone(&chrono::Utc),
            }))
    }

    /// Searches every report table concurrently and merges the hits.
    pub async fn search(
        &self,
        term: &SearchTerm,
        scope: GeoScope,
    ) -> Result<Vec<SearchHit>, DbErr> {
        let statements: Vec<(ReportKind, Statement)> = ReportKind::ALL
            .iter()
            .filter_map(|&kind| search_statement(kind, term, scope).map(|stmt| (kind, stmt)))
            .collect();
        if statements.is_empty() {
            return Ok(Vec::new());
        }

        let batches = try_join_all(statements.into_iter().map(|(kind, stmt)| async move {
            let rows = SearchRow::find_by_statement(stmt).all(self.db.as_ref()).await?;
            Ok::<_, DbErr>(
                rows.into_iter()
                    .map(|row| SearchHit {
                        id: row.id,
                        kind,
                        category: kind.label(),
                        tracking_code: row.tracking_code,
                        status: row.status,
                        title: row.title,
                        created_at: row.created_at.with_timezone(&chrono::Utc),
                    })
                    .collect::<Vec<_>>(),
            )
        }))
        .await?;

        let hits = search::merge(batches);
        tracing::debug!(query = %term.text, hits = hits.len(), "Report search");
        Ok(hits)
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
