use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{FixedOffset, TimeZone};
use sea_orm::{DatabaseBackend, MockDatabase, Value};
use uuid::Uuid;

use yaracheck_core::access::GeoScope;
use yaracheck_core::report::{ReportKind, ReportStatus};
use yaracheck_core::search::SearchTerm;
use yaracheck_shared::types::{CountryId, PageRequest};

use super::*;

fn ts(minute: u32) -> DateTimeWithTimeZone {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2026, 10, 1, 12, minute, 0)
        .unwrap()
}

fn term(raw: &str) -> SearchTerm {
    SearchTerm::parse(raw).unwrap().unwrap()
}

fn search_row(code: &str, minute: u32) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([
        ("id", Value::from(Uuid::new_v4())),
        ("tracking_code", Value::from(code.to_string())),
        ("status", Value::from("open".to_string())),
        ("title", Value::from("Apple iPhone 15".to_string())),
        ("created_at", Value::from(ts(minute))),
    ])
}

#[test]
fn test_search_statement_ors_identifier_columns() {
    let stmt = search_statement(ReportKind::Device, &term("355"), GeoScope::Unrestricted).unwrap();

    assert!(stmt.sql.contains("FROM devices"));
    assert!(stmt.sql.contains("tracking_code ILIKE $1 OR imei ILIKE $1"));
    assert!(stmt.sql.contains("serial_number ILIKE $1"));
    assert!(stmt.sql.contains("LIMIT 50"));
    assert!(!stmt.sql.contains("country_id"));
    assert_eq!(stmt.values.map(|v| v.0.len()), Some(1));
}

#[test]
fn test_search_statement_matches_uuid_and_scope() {
    let id = Uuid::new_v4();
    let country = CountryId::new();
    let stmt = search_statement(
        ReportKind::Vehicle,
        &term(&id.to_string()),
        GeoScope::Country(country),
    )
    .unwrap();

    assert!(stmt.sql.contains("OR id = $2"));
    assert!(stmt.sql.contains("AND country_id = $3"));
    let values = stmt.values.unwrap().0;
    assert_eq!(values[1], Value::from(id));
    assert_eq!(values[2], Value::from(country.into_inner()));
}

#[test]
fn test_search_statement_empty_scope() {
    assert!(search_statement(ReportKind::Person, &term("ada"), GeoScope::Nothing).is_none());
}

#[test]
fn test_list_statements_filter_and_page() {
    let country = CountryId::new();
    let page = PageRequest {
        page: 3,
        per_page: 10,
    };
    let (count, rows) = list_statements(
        ReportKind::HackedAccount,
        GeoScope::Country(country),
        Some(ReportStatus::Open),
        &page,
    )
    .unwrap();

    assert!(count.sql.starts_with("SELECT COUNT(*) AS total FROM hacked_accounts t"));
    assert!(count.sql.contains("WHERE country_id = $1 AND status = $2"));
    assert!(rows.sql.contains("'hacked_account' AS kind"));
    assert!(rows.sql.contains("platform || ': ' || account_identifier AS title"));
    assert!(rows.sql.ends_with("LIMIT 10 OFFSET 20"));
    assert_eq!(rows.values.unwrap().0.len(), 2);
}

#[test]
fn test_list_statements_unrestricted_has_no_where() {
    let (count, _) = list_statements(
        ReportKind::Person,
        GeoScope::Unrestricted,
        None,
        &PageRequest::default(),
    )
    .unwrap();
    assert!(!count.sql.contains("WHERE"));
}

#[tokio::test]
async fn test_search_merges_tables_newest_first() {
    let mut batches: Vec<Vec<BTreeMap<&'static str, Value>>> = vec![
        vec![search_row("YC-PER-AAAAAAAA", 5)],
        vec![search_row("YC-DEV-BBBBBBBB", 30), search_row("YC-DEV-CCCCCCCC", 1)],
    ];
    batches.extend((0..5).map(|_| Vec::new()));
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(batches)
        .into_connection();

    let hits = ReportRepository::new(Arc::new(db))
        .search(&term("a"), GeoScope::Unrestricted)
        .await
        .unwrap();

    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].tracking_code, "YC-DEV-BBBBBBBB");
    assert_eq!(hits[2].tracking_code, "YC-DEV-CCCCCCCC");
}

#[tokio::test]
async fn test_search_with_empty_scope_skips_database() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let hits = ReportRepository::new(Arc::new(db))
        .search(&term("a"), GeoScope::Nothing)
        .await
        .unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_tracking_lookup_normalizes_code() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![BTreeMap::from([
            ("tracking_code", Value::from("YC-VEH-ABCD2345".to_string())),
            ("status", Value::from("investigating".to_string())),
            ("created_at", Value::from(ts(0))),
        ])]])
        .into_connection();

    let status = ReportRepository::new(Arc::new(db))
        .find_by_tracking_code("  yc-veh-abcd2345 ")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(status.category, "Vehicle");
    assert_eq!(status.status, "investigating");
}

#[tokio::test]
async fn test_tracking_lookup_rejects_malformed_code() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let status = ReportRepository::new(Arc::new(db))
        .find_by_tracking_code("not-a-code")
        .await
        .unwrap();
    assert!(status.is_none());
}
