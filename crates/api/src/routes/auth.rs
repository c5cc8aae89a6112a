//! Authentication routes for login, register, and token refresh.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use crate::error::{app_error_response, db_error, error_response, internal_error};
use yaracheck_core::auth::{check_policy, hash_password, verify_password};
use yaracheck_db::ProfileRepository;
use yaracheck_db::entities::profiles;
use yaracheck_shared::auth::{
    LoginRequest, LoginResponse, RefreshRequest, RegisterRequest, UserInfo,
};
use yaracheck_shared::{JwtError, TokenKind};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/refresh", post(refresh))
}

fn user_info(profile: &profiles::Model) -> UserInfo {
    UserInfo {
        id: profile.id,
        email: profile.email.clone(),
        full_name: profile.full_name.clone(),
        role: profile.role.clone(),
        admin_role: profile.admin_role.clone(),
    }
}

/// Issues a token pair for a profile and builds the login response.
fn login_response(
    state: &AppState,
    profile: &profiles::Model,
    status: StatusCode,
) -> axum::response::Response {
    match state.jwt_service.generate_pair(profile.id, &profile.role) {
        Ok(pair) => (
            status,
            Json(LoginResponse {
                user: user_info(profile),
                access_token: pair.access_token,
                refresh_token: pair.refresh_token,
                expires_in: pair.expires_in,
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to generate tokens");
            internal_error()
        }
    }
}

/// POST /auth/login - Authenticate and return tokens.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let repo = ProfileRepository::new(state.db.clone());

    let profile = match repo.find_by_email(&payload.email).await {
        Ok(Some(p)) => p,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent profile");
            return error_response(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid email or password",
            );
        }
        Err(e) => return db_error("Database error during login", &e),
    };

    if !profile.is_active {
        return error_response(
            StatusCode::UNAUTHORIZED,
            "account_disabled",
            "This account has been disabled",
        );
    }

    match verify_password(&payload.password, &profile.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %profile.id, "Failed login attempt - invalid password");
            return error_response(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid email or password",
            );
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error();
        }
    }

    info!(user_id = %profile.id, role = %profile.role, "User logged in");
    login_response(&state, &profile, StatusCode::OK)
}

/// POST /auth/register - Register a member of the public and log them in.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    let email = payload.email.trim();
    if email.is_empty() || !email.contains('@') {
        return error_response(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "A valid email is required",
        );
    }
    if payload.full_name.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "Full name is required",
        );
    }
    if let Err(e) = check_policy(&payload.password) {
        return app_error_response(e.into());
    }

    let repo = ProfileRepository::new(state.db.clone());
    match repo.email_exists(email).await {
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

    let profile = match repo
        .create_user(email, &password_hash, &payload.full_name)
        .await
    {
        Ok(p) => p,
        Err(e) => return db_error("Failed to create profile", &e),
    };

    info!(user_id = %profile.id, email = %profile.email, "New user registered");
    login_response(&state, &profile, StatusCode::CREATED)
}

/// POST /auth/refresh - Exchange a refresh token for a new pair.
///
/// The profile is re-read so a disabled account or changed role is picked up.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    let claims = match state
        .jwt_service
        .validate_kind(&payload.refresh_token, TokenKind::Refresh)
    {
        Ok(c) => c,
        Err(e) => {
            let (code, message) = match e {
                JwtError::Expired => ("token_expired", "Refresh token has expired"),
                _ => ("invalid_token", "Invalid refresh token"),
            };
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": code, "message": message })),
            )
                .into_response();
        }
    };

    let repo = ProfileRepository::new(state.db.clone());
    let profile = match repo.find_by_id(claims.user_id()).await {
        Ok(Some(p)) if p.is_active => p,
        Ok(_) => {
            return error_response(
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid refresh token",
            );
        }
        Err(e) => return db_error("Database error during refresh", &e),
    };

    login_response(&state, &profile, StatusCode::OK)
}
