//! The caller's own profile.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde_json::json;

use crate::AppState;
use crate::access::load_caller;
use crate::middleware::AuthUser;
use yaracheck_core::access::{landing_dashboard, resolve_all};

/// Creates the profile router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

/// GET /me - Profile, resolved capabilities and landing dashboard.
async fn me(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let caller = match load_caller(&state, &auth).await {
        Ok(c) => c,
        Err(response) => return response,
    };

    let model = &caller.model;
    Json(json!({
        "id": model.id,
        "email": model.email,
        "full_name": model.full_name,
        "role": model.role,
        "admin_role": model.admin_role,
        "country_id": model.country_id,
        "province_id": model.province_id,
        "capabilities": resolve_all(&caller.profile),
        "dashboard": landing_dashboard(&caller.profile),
    }))
    .into_response()
}
