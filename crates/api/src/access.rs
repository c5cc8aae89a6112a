//! Caller lookup and capability checks.
//!
//! Capabilities are derived from the stored profile on every request, so a
//! role change takes effect without re-issuing tokens.

use axum::{http::StatusCode, response::Response};

use yaracheck_core::access::{self, Capability, GeoScope, Profile};
use yaracheck_db::entities::profiles;
use yaracheck_db::repositories::to_access_profile;
use yaracheck_db::{GeographyRepository, ProfileRepository};

use crate::error::{app_error_response, db_error, error_response};
use crate::{AppState, middleware::AuthUser};

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct Caller {
    /// Stored profile row.
    pub model: profiles::Model,
    /// Access view of the profile.
    pub profile: Profile,
}

/// Loads the caller's profile, rejecting deleted or disabled accounts.
pub async fn load_caller(state: &AppState, auth: &AuthUser) -> Result<Caller, Response> {
    let repo = ProfileRepository::new(state.db.clone());
    let model = match repo.find_by_id(auth.user_id()).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            return Err(error_response(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Profile no longer exists",
            ));
        }
        Err(e) => return Err(db_error("Database error loading profile", &e)),
    };

    if !model.is_active {
        return Err(error_response(
            StatusCode::FORBIDDEN,
            "account_disabled",
            "This account has been disabled",
        ));
    }

    let profile =
        to_access_profile(&model).map_err(|e| db_error("Stored profile is invalid", &e))?;
    Ok(Caller { model, profile })
}

/// Loads the caller and requires a capability.
pub async fn require(
    state: &AppState,
    auth: &AuthUser,
    capability: Capability,
) -> Result<Caller, Response> {
    let caller = load_caller(state, auth).await?;
    access::require(&caller.profile, capability).map_err(app_error_response)?;
    Ok(caller)
}

/// Resolves the rows the caller may see.
pub async fn scope(state: &AppState, caller: &Caller) -> Result<GeoScope, Response> {
    GeographyRepository::new(state.db.clone())
        .resolve_scope(&caller.profile)
        .await
        .map_err(|e| db_error("Database error resolving scope", &e))
}
