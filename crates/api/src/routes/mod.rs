//! API route definitions.

use axum::{Router, http::StatusCode, middleware, response::Response};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{db_error, error_response};
use crate::{AppState, middleware::auth::auth_middleware};
use yaracheck_db::GeographyRepository;
use yaracheck_shared::types::PageRequest;

pub mod assets;
pub mod auth;
pub mod health;
pub mod me;
pub mod payments;
pub mod profiles;
pub mod public;
pub mod reports;
pub mod roi;
pub mod support;

/// Pagination and status filter shared by the admin listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Status filter.
    pub status: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

impl ListQuery {
    /// Returns the requested page, defaults filled in.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Checks a submitted country/province pair against the geography tables.
///
/// A province implies its country; a country given alongside it must match.
pub(crate) async fn resolve_location(
    state: &AppState,
    country_id: Option<Uuid>,
    province_id: Option<Uuid>,
) -> Result<(Option<Uuid>, Option<Uuid>), Response> {
    let geography = GeographyRepository::new(state.db.clone());

    let Some(province_id) = province_id else {
        if let Some(country_id) = country_id {
            match geography.country_exists(country_id).await {
                Ok(true) => {}
                Ok(false) => {
                    return Err(error_response(
                        StatusCode::BAD_REQUEST,
                        "validation_error",
                        "Unknown country",
                    ));
                }
                Err(e) => return Err(db_error("Database error resolving country", &e)),
            }
        }
        return Ok((country_id, None));
    };

    let province_country = match geography.country_of_province(province_id).await {
        Ok(Some(c)) => c,
        Ok(None) => {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Unknown province",
            ));
        }
        Err(e) => return Err(db_error("Database error resolving province", &e)),
    };

    if country_id.is_some_and(|c| c != province_country) {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "Province does not belong to the given country",
        ));
    }
    Ok((Some(province_country), Some(province_id)))
}

/// Creates the unauthenticated routes.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(public::routes())
}

/// Creates the full API router; everything outside [`public_routes`] sits
/// behind the auth middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(me::routes())
        .merge(reports::routes())
        .merge(payments::routes())
        .merge(support::routes())
        .merge(reports::admin_routes())
        .merge(payments::admin_routes())
        .merge(support::admin_routes())
        .merge(profiles::routes())
        .merge(roi::routes())
        .merge(assets::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new().merge(public_routes()).merge(protected_routes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let page = ListQuery::default().page_request();
        assert_eq!(page.page(), 1);
        assert_eq!(page.per_page(), 20);
    }

    #[test]
    fn test_list_query_clamps_page_size() {
        let query = ListQuery {
            status: None,
            page: Some(0),
            per_page: Some(1000),
        };
        let page = query.page_request();
        assert_eq!(page.page(), 1);
        assert_eq!(page.per_page(), PageRequest::MAX_PER_PAGE);
    }
}
