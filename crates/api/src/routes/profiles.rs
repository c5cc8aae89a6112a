//! Staff account management.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::access::{Caller, require};
use crate::error::{app_error_response, db_error, error_response};
use crate::middleware::AuthUser;
use crate::routes::{ListQuery, resolve_location};
use yaracheck_core::access::Capability;
use yaracheck_core::auth::{AdminRole, Role, check_policy, hash_password};
use yaracheck_db::ProfileRepository;
use yaracheck_db::repositories::{CreateProfileInput, UpdateProfileInput};
use yaracheck_shared::types::PageResponse;

/// Creates the profile management router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/profiles", get(list_profiles).post(create_profile))
        .route("/admin/profiles/{id}", patch(update_profile))
}

/// Distinguishes an absent field from an explicit `null`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn forbid_super_admin_grant(caller: &Caller, role: Option<Role>) -> Result<(), Response> {
    if role == Some(Role::SuperAdmin) && !caller.profile.is_super_admin() {
        return Err(error_response(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Only super admins can grant the super_admin role",
        ));
    }
    Ok(())
}

/// GET /admin/profiles - Every account, newest first.
async fn list_profiles(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    if let Err(response) = require(&state, &auth, Capability::ManageAdmins).await {
        return response;
    }

    let page = query.page_request();
    let repo = ProfileRepository::new(state.db.clone());
    match repo.list(&page).await {
        Ok((rows, total)) => {
            Json(PageResponse::new(rows, page.page(), page.per_page(), total)).into_response()
        }
        Err(e) => db_error("Failed to list profiles", &e),
    }
}

/// New staff account body.
#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    /// Login email.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Display name.
    pub full_name: String,
    /// Coarse role.
    pub role: Role,
    /// Fine-grained staff role.
    #[serde(default)]
    pub admin_role: Option<AdminRole>,
    /// Explicit capability grants, e.g. `{"can_view_assets": true}`.
    #[serde(default)]
    pub permissions: Map<String, Value>,
    /// Assigned country.
    #[serde(default)]
    pub country_id: Option<Uuid>,
    /// Assigned province.
    #[serde(default)]
    pub province_id: Option<Uuid>,
}

/// POST /admin/profiles - Create an account with any role.
async fn create_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateProfileRequest>,
) -> impl IntoResponse {
    let caller = match require(&state, &auth, Capability::ManageAdmins).await {
        Ok(c) => c,
        Err(response) => return response,
    };
    if let Err(response) = forbid_super_admin_grant(&caller, Some(payload.role)) {
        return response;
    }
    if !payload.email.contains('@') || payload.full_name.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "A valid email and full name are required",
        );
    }
    if let Err(e) = check_policy(&payload.password) {
        return app_error_response(e.into());
    }
    let (country_id, province_id) =
        match resolve_location(&state, payload.country_id, payload.province_id).await {
            Ok(location) => location,
            Err(response) => return response,
        };

    let repo = ProfileRepository::new(state.db.clone());
    match repo.email_exists(&payload.email).await {
        Ok(true) => {
            return error_response(
                StatusCode::CONFLICT,
                "email_exists",
                "An account with this email already exists",
            );
        }
        Ok(false) => {}
        Err(e) => return db_error("Database error checking email", &e),
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => return app_error_response(e.into()),
    };

    match repo
        .create(CreateProfileInput {
            email: payload.email,
            password_hash,
            full_name: payload.full_name,
            role: payload.role,
            admin_role: payload.admin_role,
            permissions: payload.permissions,
            country_id,
            province_id,
        })
        .await
    {
        Ok(profile) => {
            info!(
                user_id = %caller.model.id,
                profile_id = %profile.id,
                role = %profile.role,
                "Profile created"
            );
            (StatusCode::CREATED, Json(profile)).into_response()
        }
        Err(e) => db_error("Failed to create profile", &e),
    }
}

/// Profile update body. Absent fields are left unchanged; `null` clears the
/// nullable ones.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    /// New display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// New coarse role.
    #[serde(default)]
    pub role: Option<Role>,
    /// New admin role.
    #[serde(default, deserialize_with = "double_option")]
    pub admin_role: Option<Option<AdminRole>>,
    /// Replacement grants.
    #[serde(default)]
    pub permissions: Option<Map<String, Value>>,
    /// New country assignment.
    #[serde(default, deserialize_with = "double_option")]
    pub country_id: Option<Option<Uuid>>,
    /// New province assignment.
    #[serde(default, deserialize_with = "double_option")]
    pub province_id: Option<Option<Uuid>>,
    /// Enable or disable the account.
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// PATCH /admin/profiles/{id} - Change role, assignment, grants or status.
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProfileRequest>,
) -> impl IntoResponse {
    let caller = match require(&state, &auth, Capability::ManageAdmins).await {
        Ok(c) => c,
        Err(response) => return response,
    };
    if let Err(response) = forbid_super_admin_grant(&caller, payload.role) {
        return response;
    }

    let repo = ProfileRepository::new(state.db.clone());
    match repo.find_by_id(id).await {
        Ok(Some(target))
            if target.role == Role::SuperAdmin.as_str() && !caller.profile.is_super_admin() =>
        {
            return error_response(
                StatusCode::FORBIDDEN,
                "forbidden",
                "Only super admins can modify a super admin",
            );
        }
        Ok(Some(_)) => {}
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "not_found", "Profile not found"),
        Err(e) => return db_error("Failed to load profile", &e),
    }

    // Only ids being set are checked; `null` clears and needs no lookup.
    let new_country = payload.country_id.flatten();
    let new_province = payload.province_id.flatten();
    if (new_country.is_some() || new_province.is_some())
        && let Err(response) = resolve_location(&state, new_country, new_province).await
    {
        return response;
    }

    let input = UpdateProfileInput {
        full_name: payload.full_name,
        role: payload.role,
        admin_role: payload.admin_role,
        permissions: payload.permissions,
        country_id: payload.country_id,
        province_id: payload.province_id,
        is_active: payload.is_active,
    };
    match repo.update(id, input).await {
        Ok(Some(profile)) => {
            info!(user_id = %caller.model.id, profile_id = %id, "Profile updated");
            Json(profile).into_response()
        }
        Ok(None) => error_response(StatusCode::NOT_FOUND, "not_found", "Profile not found"),
        Err(e) => db_error("Failed to update profile", &e),
    }
}
