//! Company asset register.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::access::require;
use crate::error::{db_error, error_response};
use crate::middleware::AuthUser;
use yaracheck_core::access::Capability;
use yaracheck_db::AssetRepository;
use yaracheck_db::repositories::{CreateAssetInput, UpdateAssetInput};

/// Creates the asset router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/assets", get(list_assets).post(create_asset))
        .route("/admin/assets/{id}", patch(update_asset).delete(delete_asset))
}

fn validate(name: Option<&str>, value: Option<rust_decimal::Decimal>) -> Option<&'static str> {
    if name.is_some_and(|n| n.trim().is_empty()) {
        return Some("Asset name must not be empty");
    }
    if value.is_some_and(|v| v.is_sign_negative()) {
        return Some("Asset value must not be negative");
    }
    None
}

/// GET /admin/assets
async fn list_assets(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = require(&state, &auth, Capability::ViewAssets).await {
        return response;
    }

    let repo = AssetRepository::new(state.db.clone());
    match repo.list().await {
        Ok(rows) => Json(json!({ "data": rows })).into_response(),
        Err(e) => db_error("Failed to list assets", &e),
    }
}

/// POST /admin/assets
async fn create_asset(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateAssetInput>,
) -> impl IntoResponse {
    let caller = match require(&state, &auth, Capability::ManageAssets).await {
        Ok(c) => c,
        Err(response) => return response,
    };
    if let Some(message) = validate(Some(&payload.name), Some(payload.value)) {
        return error_response(StatusCode::BAD_REQUEST, "validation_error", message);
    }

    let repo = AssetRepository::new(state.db.clone());
    match repo.create(payload).await {
        Ok(asset) => {
            info!(user_id = %caller.model.id, asset_id = %asset.id, "Asset created");
            (StatusCode::CREATED, Json(asset)).into_response()
        }
        Err(e) => db_error("Failed to create asset", &e),
    }
}

/// PATCH /admin/assets/{id}
async fn update_asset(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAssetInput>,
) -> impl IntoResponse {
    if let Err(response) = require(&state, &auth, Capability::ManageAssets).await {
        return response;
    }
    if let Some(message) = validate(payload.name.as_deref(), payload.value) {
        return error_response(StatusCode::BAD_REQUEST, "validation_error", message);
    }

    let repo = AssetRepository::new(state.db.clone());
    match repo.update(id, payload).await {
        Ok(Some(asset)) => Json(asset).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "not_found", "Asset not found"),
        Err(e) => db_error("Failed to update asset", &e),
    }
}

/// DELETE /admin/assets/{id}
async fn delete_asset(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let caller = match require(&state, &auth, Capability::ManageAssets).await {
        Ok(c) => c,
        Err(response) => return response,
    };

    let repo = AssetRepository::new(state.db.clone());
    match repo.delete(id).await {
        Ok(true) => {
            info!(user_id = %caller.model.id, asset_id = %id, "Asset deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => error_response(StatusCode::NOT_FOUND, "not_found", "Asset not found"),
        Err(e) => db_error("Failed to delete asset", &e),
    }
}
