//! Support tickets and the anonymous message inbox.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::access::{load_caller, require};
use crate::error::{app_error_response, db_error};
use crate::middleware::AuthUser;
use crate::routes::ListQuery;
use yaracheck_core::access::Capability;
use yaracheck_core::support::{SupportError, TicketStatus};
use yaracheck_db::SupportRepository;
use yaracheck_shared::types::PageResponse;

/// Creates the user-facing support router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/support/tickets", post(create_ticket))
        .route("/support/tickets/mine", get(my_tickets))
}

/// Creates the admin support router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/support/tickets", get(list_tickets))
        .route("/admin/support/tickets/{id}/status", patch(update_ticket_status))
        .route("/admin/messages/anonymous", get(list_anonymous_messages))
}

/// New ticket body.
#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    /// Short summary.
    pub subject: String,
    /// Full message.
    pub message: String,
}

/// POST /support/tickets - Open a ticket.
async fn create_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateTicketRequest>,
) -> impl IntoResponse {
    let caller = match load_caller(&state, &auth).await {
        Ok(c) => c,
        Err(response) => return response,
    };

    let repo = SupportRepository::new(state.db.clone());
    match repo
        .create_ticket(caller.model.id, &payload.subject, &payload.message)
        .await
    {
        Ok(ticket) => {
            info!(user_id = %caller.model.id, ticket_id = %ticket.id, "Support ticket opened");
            (StatusCode::CREATED, Json(ticket)).into_response()
        }
        Err(e) => app_error_response(e.into()),
    }
}

/// GET /support/tickets/mine - The caller's tickets.
async fn my_tickets(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let caller = match load_caller(&state, &auth).await {
        Ok(c) => c,
        Err(response) => return response,
    };

    let repo = SupportRepository::new(state.db.clone());
    match repo.list_for_user(caller.model.id).await {
        Ok(rows) => Json(json!({ "data": rows })).into_response(),
        Err(e) => db_error("Failed to list tickets", &e),
    }
}

/// GET /admin/support/tickets - All tickets, optional `status` filter.
async fn list_tickets(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    if let Err(response) = require(&state, &auth, Capability::ManageSupport).await {
        return response;
    }
    let status = match query.status.as_deref() {
        Some(s) => match TicketStatus::parse(s) {
            Some(status) => Some(status),
            None => {
                return app_error_response(
                    SupportError::Invalid(format!("unknown ticket status '{s}'")).into(),
                );
            }
        },
        None => None,
    };

    let page = query.page_request();
    let repo = SupportRepository::new(state.db.clone());
    match repo.list(status, &page).await {
        Ok((rows, total)) => {
            Json(PageResponse::new(rows, page.page(), page.per_page(), total)).into_response()
        }
        Err(e) => db_error("Failed to list tickets", &e),
    }
}

/// Ticket status body.
#[derive(Debug, Deserialize)]
pub struct UpdateTicketStatusRequest {
    /// Target status.
    pub status: String,
}

/// PATCH /admin/support/tickets/{id}/status - Move a ticket along.
async fn update_ticket_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTicketStatusRequest>,
) -> impl IntoResponse {
    let caller = match require(&state, &auth, Capability::ManageSupport).await {
        Ok(c) => c,
        Err(response) => return response,
    };
    let Some(to) = TicketStatus::parse(&payload.status) else {
        return app_error_response(
            SupportError::Invalid(format!("unknown ticket status '{}'", payload.status)).into(),
        );
    };

    let repo = SupportRepository::new(state.db.clone());
    match repo.update_status(id, to).await {
        Ok(ticket) => {
            info!(user_id = %caller.model.id, ticket_id = %id, status = %to, "Ticket updated by admin");
            Json(ticket).into_response()
        }
        Err(e) => app_error_response(e.into()),
    }
}

/// GET /admin/messages/anonymous - The anonymous inbox, newest first.
async fn list_anonymous_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    if let Err(response) = require(&state, &auth, Capability::ViewMessages).await {
        return response;
    }

    let page = query.page_request();
    let repo = SupportRepository::new(state.db.clone());
    match repo.list_anonymous_messages(&page).await {
        Ok((rows, total)) => {
            Json(PageResponse::new(rows, page.page(), page.per_page(), total)).into_response()
        }
        Err(e) => db_error("Failed to list messages", &e),
    }
}
