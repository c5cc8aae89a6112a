//! ROI distributions and shareholder withdrawals.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::access::require;
use crate::error::{app_error_response, db_error, error_response};
use crate::middleware::AuthUser;
use yaracheck_core::access::{Capability, has};
use yaracheck_core::roi::DistributionInput;
use yaracheck_db::repositories::to_access_profile;
use yaracheck_db::{ProfileRepository, RoiRepository};

/// Creates the ROI router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/roi/distributions",
            get(list_distributions).post(create_distribution),
        )
        .route(
            "/admin/roi/distributions/{id}",
            axum::routing::patch(set_enabled).delete(delete_distribution),
        )
        .route(
            "/admin/roi/withdrawals",
            get(list_withdrawals).post(request_withdrawal),
        )
        .route("/admin/roi/withdrawals/{id}/advance", post(advance_withdrawal))
}

/// GET /admin/roi/distributions - All distributions for ROI managers, own
/// distributions otherwise.
async fn list_distributions(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let caller = match require(&state, &auth, Capability::ViewRoi).await {
        Ok(c) => c,
        Err(response) => return response,
    };
    let only = (!has(&caller.profile, Capability::ManageRoi)).then_some(caller.model.id);

    let repo = RoiRepository::new(state.db.clone());
    match repo.list_distributions(only).await {
        Ok(rows) => Json(json!({ "data": rows })).into_response(),
        Err(e) => db_error("Failed to list distributions", &e),
    }
}

/// POST /admin/roi/distributions - Allot a share of a pool to a shareholder.
async fn create_distribution(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<DistributionInput>,
) -> impl IntoResponse {
    let caller = match require(&state, &auth, Capability::ManageRoi).await {
        Ok(c) => c,
        Err(response) => return response,
    };

    let profiles = ProfileRepository::new(state.db.clone());
    let recipient = match profiles.find_by_id(payload.shareholder_id.into_inner()).await {
        Ok(Some(p)) => p,
        Ok(None) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Shareholder does not exist",
            );
        }
        Err(e) => return db_error("Failed to load shareholder", &e),
    };
    match to_access_profile(&recipient) {
        Ok(p) if has(&p, Capability::RequestWithdrawal) => {}
        Ok(_) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Recipient is not a shareholder or investor",
            );
        }
        Err(e) => return db_error("Stored profile is invalid", &e),
    }

    let repo = RoiRepository::new(state.db.clone());
    match repo.create_distribution(&payload, caller.model.id).await {
        Ok(distribution) => (StatusCode::CREATED, Json(distribution)).into_response(),
        Err(e) => app_error_response(e.into()),
    }
}

/// Enabled flag body.
#[derive(Debug, Deserialize)]
pub struct SetEnabledRequest {
    /// Whether withdrawals may be requested.
    pub enabled: bool,
}

/// PATCH /admin/roi/distributions/{id} - Open or close for withdrawals.
async fn set_enabled(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetEnabledRequest>,
) -> impl IntoResponse {
    let caller = match require(&state, &auth, Capability::ManageRoi).await {
        Ok(c) => c,
        Err(response) => return response,
    };

    let repo = RoiRepository::new(state.db.clone());
    match repo.set_enabled(id, payload.enabled).await {
        Ok(distribution) => {
            info!(user_id = %caller.model.id, distribution_id = %id, enabled = payload.enabled, "Distribution toggled");
            Json(distribution).into_response()
        }
        Err(e) => app_error_response(e.into()),
    }
}

/// DELETE /admin/roi/distributions/{id} - Remove with its withdrawal requests.
async fn delete_distribution(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let caller = match require(&state, &auth, Capability::ManageRoi).await {
        Ok(c) => c,
        Err(response) => return response,
    };

    let repo = RoiRepository::new(state.db.clone());
    match repo.delete_distribution(id).await {
        Ok(()) => {
            info!(user_id = %caller.model.id, distribution_id = %id, "Distribution deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => app_error_response(e.into()),
    }
}

/// GET /admin/roi/withdrawals - All requests for ROI managers, own otherwise.
async fn list_withdrawals(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let caller = match require(&state, &auth, Capability::ViewRoi).await {
        Ok(c) => c,
        Err(response) => return response,
    };
    let only = (!has(&caller.profile, Capability::ManageRoi)).then_some(caller.model.id);

    let repo = RoiRepository::new(state.db.clone());
    match repo.list_withdrawals(only).await {
        Ok(rows) => Json(json!({ "data": rows })).into_response(),
        Err(e) => db_error("Failed to list withdrawals", &e),
    }
}

/// Withdrawal request body.
#[derive(Debug, Deserialize)]
pub struct WithdrawalRequest {
    /// Distribution to draw from; must belong to the caller.
    pub distribution_id: Uuid,
    /// Amount requested.
    pub amount: Decimal,
}

/// POST /admin/roi/withdrawals - Request a payout from an own distribution.
async fn request_withdrawal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<WithdrawalRequest>,
) -> impl IntoResponse {
    let caller = match require(&state, &auth, Capability::RequestWithdrawal).await {
        Ok(c) => c,
        Err(response) => return response,
    };

    let repo = RoiRepository::new(state.db.clone());
    match repo
        .create_withdrawal(payload.distribution_id, caller.model.id, payload.amount)
        .await
    {
        Ok(request) => (StatusCode::CREATED, Json(request)).into_response(),
        Err(e) => app_error_response(e.into()),
    }
}

/// POST /admin/roi/withdrawals/{id}/advance - pending, approved, sent, completed.
async fn advance_withdrawal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let caller = match require(&state, &auth, Capability::ManageRoi).await {
        Ok(c) => c,
        Err(response) => return response,
    };

    let repo = RoiRepository::new(state.db.clone());
    match repo.advance_withdrawal(id).await {
        Ok(request) => {
            info!(user_id = %caller.model.id, withdrawal_id = %id, status = %request.status, "Withdrawal advanced by admin");
            Json(request).into_response()
        }
        Err(e) => app_error_response(e.into()),
    }
}
