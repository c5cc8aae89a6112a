//! Report fee checkout and verification.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::AppState;
use crate::access::{load_caller, require};
use crate::error::{app_error_response, db_error, error_response};
use crate::middleware::AuthUser;
use crate::routes::ListQuery;
use crate::routes::reports::send_receipt;
use yaracheck_core::access::Capability;
use yaracheck_core::payment::{
    CheckoutRequest, ExpectedCharge, PaymentError, PaymentStatus, Provider, generate_reference,
};
use yaracheck_core::report::{ReportError, ReportKind, ReportStatus};
use yaracheck_db::repositories::NewPayment;
use yaracheck_db::{PaymentRepository, ReportRepository};
use yaracheck_shared::{AppError, PaymentsConfig};
use yaracheck_shared::types::PageResponse;

/// Creates the payment router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments/initialize", post(initialize))
        .route("/payments/{reference}/verify", post(verify))
}

/// Creates the admin transactions router.
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/transactions", get(list_transactions))
}

/// Currency the provider account charges in.
fn provider_currency(config: &PaymentsConfig, provider: Provider) -> &str {
    match provider {
        Provider::Stripe => &config.stripe_currency,
        Provider::Paystack => &config.paystack_currency,
        Provider::Flutterwave => &config.flutterwave_currency,
    }
}

/// Checkout request body.
#[derive(Debug, Deserialize)]
pub struct InitializePaymentRequest {
    /// `stripe`, `paystack` or `flutterwave`.
    pub provider: String,
    /// Report kind.
    pub kind: String,
    /// Report ID.
    pub report_id: Uuid,
}

/// POST /payments/initialize - Open a checkout for one of the caller's reports.
///
/// The amount is the fee stored on the report, never a client value.
async fn initialize(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<InitializePaymentRequest>,
) -> impl IntoResponse {
    let Some(provider) = Provider::parse(&payload.provider) else {
        return app_error_response(PaymentError::UnknownProvider(payload.provider).into());
    };
    let Some(kind) = ReportKind::parse(&payload.kind) else {
        return app_error_response(ReportError::UnknownKind(payload.kind).into());
    };
    let caller = match load_caller(&state, &auth).await {
        Ok(c) => c,
        Err(response) => return response,
    };

    let reports = ReportRepository::new(state.db.clone());
    let report = match reports.find(kind, payload.report_id).await {
        Ok(Some(r)) if r.reporter_id == caller.model.id => r,
        Ok(_) => return error_response(StatusCode::NOT_FOUND, "not_found", "Report not found"),
        Err(e) => return db_error("Failed to load report", &e),
    };
    match report.status() {
        Ok(ReportStatus::PendingPayment) => {}
        Ok(_) => return app_error_response(PaymentError::NotPayable.into()),
        Err(e) => return db_error("Stored report status is invalid", &e),
    }

    let currency = provider_currency(&state.payments_config, provider);
    if !currency.eq_ignore_ascii_case(&report.currency) {
        return app_error_response(AppError::BusinessRule(format!(
            "{provider} charges in {currency}, but the fee is in {}",
            report.currency
        )));
    }

    let request = CheckoutRequest {
        provider,
        reference: generate_reference(),
        kind,
        tracking_code: report.tracking_code.clone(),
        amount_cents: report.price_cents,
        currency: currency.to_string(),
        customer_email: caller.model.email.clone(),
        customer_name: caller.model.full_name.clone(),
    };

    let checkout = match state.payments.initialize(&request).await {
        Ok(c) => c,
        Err(e) => return app_error_response(e.into()),
    };

    let payments = PaymentRepository::new(state.db.clone());
    let stored = match payments
        .create_pending(NewPayment {
            reference: request.reference.clone(),
            provider,
            kind,
            report_id: report.id,
            user_id: caller.model.id,
            amount_cents: request.amount_cents,
            currency: request.currency.clone(),
            checkout_url: checkout.checkout_url.clone(),
            provider_payload: checkout.provider_payload,
        })
        .await
    {
        Ok(t) => t,
        Err(e) => return db_error("Failed to record payment", &e),
    };

    info!(
        user_id = %caller.model.id,
        reference = %stored.reference,
        provider = %provider,
        amount_cents = stored.amount_cents,
        "Checkout opened"
    );
    (
        StatusCode::CREATED,
        Json(json!({
            "reference": stored.reference,
            "checkout_url": checkout.checkout_url,
        })),
    )
        .into_response()
}

/// POST /payments/{reference}/verify - Ask the provider and settle if paid.
async fn verify(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(reference): Path<String>,
) -> impl IntoResponse {
    let caller = match load_caller(&state, &auth).await {
        Ok(c) => c,
        Err(response) => return response,
    };

    let payments = PaymentRepository::new(state.db.clone());
    let transaction = match payments.find_by_reference(&reference).await {
        Ok(Some(t)) if t.user_id == caller.model.id => t,
        Ok(_) => return error_response(StatusCode::NOT_FOUND, "not_found", "Payment not found"),
        Err(e) => return db_error("Failed to load payment", &e),
    };

    if transaction.status == PaymentStatus::Success.as_str() {
        return Json(json!({ "reference": reference, "status": transaction.status }))
            .into_response();
    }

    let Some(provider) = Provider::parse(&transaction.provider) else {
        return app_error_response(AppError::Internal(format!(
            "stored payment has unknown provider '{}'",
            transaction.provider
        )));
    };

    let expected = ExpectedCharge {
        amount_cents: transaction.amount_cents,
        currency: transaction.currency.clone(),
    };
    let verification = match state
        .payments
        .verify(
            provider,
            &reference,
            &expected,
            transaction.provider_payload.as_ref(),
        )
        .await
    {
        Ok(v) => v,
        Err(e) => return app_error_response(e.into()),
    };

    if !verification.paid {
        return match payments
            .mark_failed(&reference, verification.provider_payload)
            .await
        {
            Ok(Some(t)) => Json(json!({ "reference": reference, "status": t.status })).into_response(),
            Ok(None) => error_response(StatusCode::NOT_FOUND, "not_found", "Payment not found"),
            Err(e) => db_error("Failed to update payment", &e),
        };
    }

    let settled = match payments.settle(&reference, verification.provider_payload).await {
        Ok(s) => s,
        Err(e) => return app_error_response(e.into()),
    };

    if settled.opened_report {
        match ReportKind::parse(&settled.transaction.report_kind) {
            Some(kind) => {
                let reports = ReportRepository::new(state.db.clone());
                match reports.find(kind, settled.transaction.report_id).await {
                    Ok(Some(report)) => send_receipt(
                        &state,
                        caller.model.email.clone(),
                        caller.model.full_name.clone(),
                        kind,
                        report.tracking_code,
                    ),
                    Ok(None) => warn!(reference = %reference, "Settled report disappeared"),
                    Err(e) => warn!(error = %e, reference = %reference, "Could not load report for receipt"),
                }
            }
            None => warn!(reference = %reference, "Settled payment has unknown report kind"),
        }
    }

    Json(json!({
        "reference": reference,
        "status": settled.transaction.status,
        "report_id": settled.transaction.report_id,
    }))
    .into_response()
}

/// GET /admin/transactions - Every payment, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    if let Err(response) = require(&state, &auth, Capability::ViewTransactions).await {
        return response;
    }

    let page = query.page_request();
    let repo = PaymentRepository::new(state.db.clone());
    match repo.list(&page).await {
        Ok((rows, total)) => {
            Json(PageResponse::new(rows, page.page(), page.per_page(), total)).into_response()
        }
        Err(e) => db_error("Failed to list transactions", &e),
    }
}
