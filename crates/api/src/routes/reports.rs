//! Report submission, the reporter's own reports and admin report handling.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use crate::AppState;
use crate::access::{load_caller, require, scope};
use crate::error::{app_error_response, db_error, error_response};
use crate::middleware::AuthUser;
use crate::routes::{ListQuery, resolve_location};
use yaracheck_core::access::Capability;
use yaracheck_core::pricing::calculate_price;
use yaracheck_core::report::{ReportDetails, ReportError, ReportKind, ReportStatus, ReportWorkflow};
use yaracheck_core::search::SearchTerm;
use yaracheck_db::repositories::NewReport;
use yaracheck_db::ReportRepository;
use yaracheck_shared::types::{CountryId, PageResponse};

/// Currency every fee is computed in.
const FEE_CURRENCY: &str = "USD";

/// Creates the reporter-facing router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/mine", get(my_reports))
        .route("/reports/{kind}", post(submit_report))
}

/// Creates the admin report router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/reports/{kind}", get(list_reports))
        .route("/admin/reports/{kind}/{id}/status", patch(update_status))
        .route("/admin/search", get(search))
}

fn parse_kind(raw: &str) -> Result<ReportKind, Response> {
    ReportKind::parse(raw)
        .ok_or_else(|| app_error_response(ReportError::UnknownKind(raw.to_string()).into()))
}

/// Emails the tracking-code receipt. Failures are logged only.
pub(crate) fn send_receipt(
    state: &AppState,
    to_email: String,
    to_name: String,
    kind: ReportKind,
    tracking_code: String,
) {
    let email_service = state.email_service.clone();
    tokio::spawn(async move {
        if let Err(e) = email_service
            .send_report_receipt(&to_email, &to_name, kind.label(), &tracking_code)
            .await
        {
            warn!(error = %e, tracking_code = %tracking_code, "Failed to send report receipt");
        }
    });
}

/// Report submission body: location plus the kind-specific fields.
#[derive(Debug, Deserialize)]
pub struct SubmitReportRequest {
    /// Country of the incident.
    #[serde(default)]
    pub country_id: Option<Uuid>,
    /// Province of the incident.
    #[serde(default)]
    pub province_id: Option<Uuid>,
    /// Kind-specific fields.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// POST /reports/{kind} - Submit a report.
///
/// The fee is computed server side. Free reports open immediately and get
/// their receipt now; paid ones wait in `pending_payment`.
async fn submit_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(kind): Path<String>,
    Json(payload): Json<SubmitReportRequest>,
) -> impl IntoResponse {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(response) => return response,
    };
    let caller = match load_caller(&state, &auth).await {
        Ok(c) => c,
        Err(response) => return response,
    };

    let details = match ReportDetails::from_json(kind, Value::Object(payload.details))
        .and_then(|d| d.validate().map(|()| d))
    {
        Ok(d) => d,
        Err(e) => return app_error_response(e.into()),
    };

    let (country_id, province_id) =
        match resolve_location(&state, payload.country_id, payload.province_id).await {
            Ok(location) => location,
            Err(response) => return response,
        };

    let price_cents = calculate_price(&details.descriptor());
    let new = NewReport {
        reporter_id: caller.model.id,
        country_id,
        province_id,
        price_cents,
        currency: FEE_CURRENCY.to_string(),
        status: ReportStatus::initial(price_cents == 0),
    };

    let repo = ReportRepository::new(state.db.clone());
    let created = match repo.create(&details, &new).await {
        Ok(c) => c,
        Err(e) => return db_error("Failed to store report", &e),
    };

    info!(
        user_id = %caller.model.id,
        report_id = %created.id,
        kind = %kind,
        price_cents,
        "Report submitted"
    );

    if created.status == ReportStatus::Open {
        send_receipt(
            &state,
            caller.model.email,
            caller.model.full_name,
            kind,
            created.tracking_code.clone(),
        );
    }

    (
        StatusCode::CREATED,
        Json(json!({
            "report": created,
            "payment_required": created.status == ReportStatus::PendingPayment,
        })),
    )
        .into_response()
}

/// GET /reports/mine - Every report the caller submitted.
async fn my_reports(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let caller = match load_caller(&state, &auth).await {
        Ok(c) => c,
        Err(response) => return response,
    };

    let repo = ReportRepository::new(state.db.clone());
    match repo.list_by_reporter(caller.model.id).await {
        Ok(rows) => Json(json!({ "data": rows })).into_response(),
        Err(e) => db_error("Failed to list reports", &e),
    }
}

/// GET /admin/reports/{kind} - Paginated reports within the caller's scope.
async fn list_reports(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(kind): Path<String>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(response) => return response,
    };
    let caller = match require(&state, &auth, Capability::ViewReports).await {
        Ok(c) => c,
        Err(response) => return response,
    };
    let status = match query.status.as_deref().map(|s| {
        ReportStatus::parse(s).ok_or_else(|| ReportError::UnknownStatus(s.to_string()))
    }) {
        Some(Err(e)) => return app_error_response(e.into()),
        Some(Ok(s)) => Some(s),
        None => None,
    };
    let geo = match scope(&state, &caller).await {
        Ok(s) => s,
        Err(response) => return response,
    };

    let page = query.page_request();
    let repo = ReportRepository::new(state.db.clone());
    match repo.list(kind, geo, status, &page).await {
        Ok((rows, total)) => {
            Json(PageResponse::new(rows, page.page(), page.per_page(), total)).into_response()
        }
        Err(e) => db_error("Failed to list reports", &e),
    }
}

/// Status change body.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status.
    pub status: String,
}

/// PATCH /admin/reports/{kind}/{id}/status - Move a report along its lifecycle.
async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((kind, id)): Path<(String, Uuid)>,
    Json(payload): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(response) => return response,
    };
    let caller = match require(&state, &auth, Capability::ManageReports).await {
        Ok(c) => c,
        Err(response) => return response,
    };
    let Some(to) = ReportStatus::parse(&payload.status) else {
        return app_error_response(ReportError::UnknownStatus(payload.status).into());
    };
    let geo = match scope(&state, &caller).await {
        Ok(s) => s,
        Err(response) => return response,
    };

    let repo = ReportRepository::new(state.db.clone());
    let report = match repo.find(kind, id).await {
        Ok(Some(r)) if geo.allows(r.country_id.map(CountryId::from_uuid)) => r,
        Ok(_) => return error_response(StatusCode::NOT_FOUND, "not_found", "Report not found"),
        Err(e) => return db_error("Failed to load report", &e),
    };
    let from = match report.status() {
        Ok(s) => s,
        Err(e) => return db_error("Stored report status is invalid", &e),
    };
    if let Err(e) = ReportWorkflow::transition(from, to) {
        return app_error_response(e.into());
    }

    match repo.update_status(kind, id, from, to).await {
        Ok(true) => {
            info!(user_id = %caller.model.id, report_id = %id, from = %from, to = %to, "Report status updated by admin");
            Json(json!({
                "id": id,
                "tracking_code": report.tracking_code,
                "status": to,
            }))
            .into_response()
        }
        Ok(false) => error_response(
            StatusCode::CONFLICT,
            "conflict",
            "Report status changed concurrently, reload and retry",
        ),
        Err(e) => db_error("Failed to update report status", &e),
    }
}

/// Search query.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Free text: tracking code, ID, IMEI, plate, name...
    #[serde(default)]
    pub q: String,
}

/// GET /admin/search?q= - Search every report table within the caller's scope.
async fn search(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let caller = match require(&state, &auth, Capability::ViewReports).await {
        Ok(c) => c,
        Err(response) => return response,
    };
    let term = match SearchTerm::parse(&query.q) {
        Ok(Some(t)) => t,
        Ok(None) => return Json(json!({ "data": [] })).into_response(),
        Err(e) => return app_error_response(e),
    };
    let geo = match scope(&state, &caller).await {
        Ok(s) => s,
        Err(response) => return response,
    };

    let repo = ReportRepository::new(state.db.clone());
    match repo.search(&term, geo).await {
        Ok(hits) => Json(json!({ "data": hits })).into_response(),
        Err(e) => db_error("Search failed", &e),
    }
}
