//! Router tests against a mock database.
//!
//! Run with: `cargo test -p yaracheck-api --test api_test`

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Value};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use yaracheck_api::{AppState, create_router};
use yaracheck_core::payment::{
    Checkout, CheckoutRequest, ExpectedCharge, PaymentError, PaymentGateway, Provider,
    Verification,
};
use yaracheck_db::entities::{countries, profiles, provinces};
use yaracheck_shared::{EmailConfig, EmailService, JwtConfig, JwtService, PaymentsConfig};

struct FakeGateway;

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn initialize(&self, req: &CheckoutRequest) -> Result<Checkout, PaymentError> {
        Ok(Checkout {
            checkout_url: format!("https://pay.test/{}", req.reference),
            provider_payload: None,
        })
    }

    async fn verify(
        &self,
        _provider: Provider,
        _reference: &str,
        _expected: &ExpectedCharge,
        _provider_payload: Option<&serde_json::Value>,
    ) -> Result<Verification, PaymentError> {
        Ok(Verification {
            paid: true,
            provider_payload: json!({}),
        })
    }
}

fn state(db: DatabaseConnection) -> AppState {
    AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(JwtService::new(JwtConfig::default())),
        email_service: Arc::new(EmailService::new(EmailConfig::default())),
        payments: Arc::new(FakeGateway),
        payments_config: Arc::new(PaymentsConfig::default()),
    }
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn profile(role: &str, admin_role: Option<&str>) -> profiles::Model {
    let now = Utc::now().into();
    profiles::Model {
        id: Uuid::new_v4(),
        email: "ada@example.com".to_string(),
        full_name: "Ada Obi".to_string(),
        password_hash: "not-a-hash".to_string(),
        role: role.to_string(),
        admin_role: admin_role.map(str::to_string),
        permissions: json!({}),
        country_id: None,
        province_id: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

fn access_token(state: &AppState, profile: &profiles::Model) -> String {
    state
        .jwt_service
        .generate_access_token(profile.id, &profile.role)
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = create_router(state(empty_db()));
    let (status, body) = send(app, get_request("/api/v1/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn test_price_quote_is_public() {
    let app = create_router(state(empty_db()));
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/v1/pricing/quote",
            None,
            &json!({ "report_type": "vehicle", "year": 2012 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price_cents"], 350);
    assert_eq!(body["currency"], "USD");
    assert_eq!(body["is_free"], false);
}

#[tokio::test]
async fn test_young_child_report_is_free() {
    let app = create_router(state(empty_db()));
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/v1/pricing/quote",
            None,
            &json!({ "report_type": "person", "age": 6 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price_cents"], 0);
    assert_eq!(body["is_free"], true);
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = create_router(state(empty_db()));
    let (status, body) = send(app, get_request("/api/v1/me", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing_token");
}

#[tokio::test]
async fn test_refresh_token_is_not_an_access_token() {
    let state = state(empty_db());
    let refresh = state
        .jwt_service
        .generate_refresh_token(Uuid::new_v4(), "user")
        .unwrap();
    let app = create_router(state);

    let (status, body) = send(app, get_request("/api/v1/me", Some(&refresh))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_access_token_cannot_refresh() {
    let state = state(empty_db());
    let access = state
        .jwt_service
        .generate_access_token(Uuid::new_v4(), "user")
        .unwrap();
    let app = create_router(state);

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/v1/auth/refresh",
            None,
            &json!({ "refresh_token": access }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_me_resolves_capabilities_and_dashboard() {
    let shareholder = profile("admin", Some("shareholder"));
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![shareholder.clone()]])
        .into_connection();
    let state = state(db);
    let token = access_token(&state, &shareholder);
    let app = create_router(state);

    let (status, body) = send(app, get_request("/api/v1/me", Some(&token))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dashboard"], "shareholder");
    assert_eq!(body["capabilities"]["view_roi"], true);
    assert_eq!(body["capabilities"]["request_withdrawal"], true);
    assert_eq!(body["capabilities"]["view_reports"], false);
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_admin_route_rejects_missing_capability() {
    let user = profile("user", None);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user.clone()]])
        .into_connection();
    let state = state(db);
    let token = access_token(&state, &user);
    let app = create_router(state);

    let (status, body) = send(app, get_request("/api/v1/admin/assets", Some(&token))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn test_disabled_account_is_rejected() {
    let mut user = profile("user", None);
    user.is_active = false;
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user.clone()]])
        .into_connection();
    let state = state(db);
    let token = access_token(&state, &user);
    let app = create_router(state);

    let (status, body) = send(app, get_request("/api/v1/me", Some(&token))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "account_disabled");
}

#[tokio::test]
async fn test_malformed_tracking_code_is_not_found() {
    let app = create_router(state(empty_db()));
    let (status, body) = send(app, get_request("/api/v1/track/not-a-code", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_login_with_unknown_email() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<profiles::Model>::new()])
        .into_connection();
    let app = create_router(state(db));

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/v1/auth/login",
            None,
            &json!({ "email": "nobody@example.com", "password": "whatever1" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let app = create_router(state(empty_db()));
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/v1/auth/register",
            None,
            &json!({ "email": "ada@example.com", "password": "short", "full_name": "Ada" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_blank_anonymous_message_is_rejected() {
    let app = create_router(state(empty_db()));
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/v1/messages/anonymous",
            None,
            &json!({ "message": "   " }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_unknown_report_kind() {
    let state = state(empty_db());
    let token = access_token(&state, &profile("user", None));
    let app = create_router(state);

    let (status, body) = send(
        app,
        json_request("POST", "/api/v1/reports/spaceship", Some(&token), &json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_unknown_payment_provider() {
    let state = state(empty_db());
    let token = access_token(&state, &profile("user", None));
    let app = create_router(state);

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/v1/payments/initialize",
            Some(&token),
            &json!({ "provider": "paypal", "kind": "vehicle", "report_id": Uuid::new_v4() }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_closed_report_cannot_reopen() {
    let director = profile("admin", Some("director"));
    let report_id = Uuid::new_v4();
    let ts = Utc::now().fixed_offset();
    let row: BTreeMap<&str, Value> = BTreeMap::from([
        ("id", Value::from(report_id)),
        ("kind", Value::from("vehicle".to_string())),
        ("tracking_code", Value::from("YC-VEH-ABCD2345".to_string())),
        ("status", Value::from("closed".to_string())),
        ("reporter_id", Value::from(Uuid::new_v4())),
        ("country_id", Value::from(None::<Uuid>)),
        ("province_id", Value::from(None::<Uuid>)),
        ("price_cents", Value::from(350_i64)),
        ("currency", Value::from("USD".to_string())),
        ("title", Value::from("Toyota Corolla".to_string())),
        ("details", Value::from(json!({ "brand": "Toyota" }))),
        ("created_at", Value::from(ts)),
        ("updated_at", Value::from(ts)),
    ]);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![director.clone()]])
        .append_query_results([vec![row]])
        .into_connection();
    let state = state(db);
    let token = access_token(&state, &director);
    let app = create_router(state);

    let (status, body) = send(
        app,
        json_request(
            "PATCH",
            &format!("/api/v1/admin/reports/vehicle/{report_id}/status"),
            Some(&token),
            &json!({ "status": "open" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_transition");
}

#[tokio::test]
async fn test_empty_search_returns_no_hits() {
    let director = profile("admin", Some("director"));
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![director.clone()]])
        .into_connection();
    let state = state(db);
    let token = access_token(&state, &director);
    let app = create_router(state);

    let (status, body) = send(
        app,
        get_request("/api/v1/admin/search?q=%20%20", Some(&token)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_countries_are_public() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![countries::Model {
            id: Uuid::new_v4(),
            name: "Ghana".to_string(),
            iso_code: "GH".to_string(),
            created_at: Utc::now().into(),
        }]])
        .into_connection();
    let app = create_router(state(db));

    let (status, body) = send(app, get_request("/api/v1/geography/countries", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["iso_code"], "GH");
}

#[tokio::test]
async fn test_report_with_unknown_country_is_rejected() {
    let user = profile("user", None);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user.clone()]])
        .append_query_results([Vec::<countries::Model>::new()])
        .into_connection();
    let state = state(db);
    let token = access_token(&state, &user);
    let app = create_router(state);

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/v1/reports/device",
            Some(&token),
            &json!({
                "country_id": Uuid::new_v4(),
                "device_type": "phone",
                "brand": "Tecno",
                "model": "Spark 10"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["message"], "Unknown country");
}

#[tokio::test]
async fn test_staff_profile_with_unknown_province_is_rejected() {
    let super_admin = profile("super_admin", None);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![super_admin.clone()]])
        .append_query_results([Vec::<provinces::Model>::new()])
        .into_connection();
    let state = state(db);
    let token = access_token(&state, &super_admin);
    let app = create_router(state);

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/v1/admin/profiles",
            Some(&token),
            &json!({
                "email": "manager@example.com",
                "password": "kano-office-1",
                "full_name": "Musa Bello",
                "role": "admin",
                "admin_role": "province_manager",
                "province_id": Uuid::new_v4()
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Unknown province");
}

#[tokio::test]
async fn test_disabled_account_cannot_use_own_listings() {
    for uri in ["/api/v1/support/tickets/mine", "/api/v1/reports/mine"] {
        let mut user = profile("user", None);
        user.is_active = false;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user.clone()]])
            .into_connection();
        let state = state(db);
        let token = access_token(&state, &user);
        let app = create_router(state);

        let (status, body) = send(app, get_request(uri, Some(&token))).await;

        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body["error"], "account_disabled", "{uri}");
    }
}

#[tokio::test]
async fn test_deleted_account_cannot_open_ticket() {
    let user = profile("user", None);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<profiles::Model>::new()])
        .into_connection();
    let state = state(db);
    let token = access_token(&state, &user);
    let app = create_router(state);

    let (status, _) = send(
        app,
        json_request(
            "POST",
            "/api/v1/support/tickets",
            Some(&token),
            &json!({ "subject": "Refund", "message": "Charged twice" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
