//! Unauthenticated routes: fee quotes, tracking lookup, geography and
//! anonymous messages.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use crate::error::{app_error_response, db_error, error_response};
use yaracheck_core::pricing::{ReportDescriptor, quote};
use yaracheck_db::{GeographyRepository, ReportRepository, SupportRepository};

/// Creates the public router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pricing/quote", post(price_quote))
        .route("/track/{code}", get(track))
        .route("/messages/anonymous", post(anonymous_message))
        .route("/geography/countries", get(list_countries))
        .route("/geography/provinces", get(list_provinces))
}

/// POST /pricing/quote - Fee for a submission descriptor.
async fn price_quote(Json(descriptor): Json<ReportDescriptor>) -> impl IntoResponse {
    let quote = quote(&descriptor);
    Json(json!({
        "price_cents": quote.price_cents,
        "currency": quote.amount.currency.code(),
        "amount": quote.amount.amount,
        "is_free": quote.is_free(),
    }))
}

/// GET /track/{code} - Public status of a report.
async fn track(State(state): State<AppState>, Path(code): Path<String>) -> impl IntoResponse {
    let repo = ReportRepository::new(state.db.clone());
    match repo.find_by_tracking_code(&code).await {
        Ok(Some(status)) => Json(status).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "not_found",
            "No report with this tracking code",
        ),
        Err(e) => db_error("Database error during tracking lookup", &e),
    }
}

/// Anonymous message body.
#[derive(Debug, Deserialize)]
pub struct AnonymousMessageRequest {
    /// Message text.
    pub message: String,
    /// Optional way to reach the sender.
    #[serde(default)]
    pub contact: Option<String>,
}

/// POST /messages/anonymous - Leave a message without an account.
async fn anonymous_message(
    State(state): State<AppState>,
    Json(payload): Json<AnonymousMessageRequest>,
) -> impl IntoResponse {
    let repo = SupportRepository::new(state.db.clone());
    match repo
        .create_anonymous_message(&payload.message, payload.contact.as_deref())
        .await
    {
        Ok(message) => (
            StatusCode::CREATED,
            Json(json!({ "id": message.id, "created_at": message.created_at })),
        )
            .into_response(),
        Err(e) => app_error_response(e.into()),
    }
}

/// GET /geography/countries
async fn list_countries(State(state): State<AppState>) -> impl IntoResponse {
    let repo = GeographyRepository::new(state.db.clone());
    match repo.list_countries().await {
        Ok(rows) => Json(json!({ "data": rows })).into_response(),
        Err(e) => db_error("Failed to list countries", &e),
    }
}

/// Province filter.
#[derive(Debug, Deserialize)]
pub struct ProvincesQuery {
    /// Only provinces of this country.
    pub country_id: Option<Uuid>,
}

/// GET /geography/provinces?country_id=
async fn list_provinces(
    State(state): State<AppState>,
    Query(query): Query<ProvincesQuery>,
) -> impl IntoResponse {
    let repo = GeographyRepository::new(state.db.clone());
    match repo.list_provinces(query.country_id).await {
        Ok(rows) => Json(json!({ "data": rows })).into_response(),
        Err(e) => db_error("Failed to list provinces", &e),
    }
}
