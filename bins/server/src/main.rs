//! YaraCheck API Server
//!
//! Main entry point for the YaraCheck backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yaracheck_api::{AppState, create_router};
use yaracheck_core::payment::HttpPaymentGateway;
use yaracheck_db::connect;
use yaracheck_shared::{AppConfig, EmailService, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yaracheck=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await
    .context("Failed to connect to database")?;
    info!("Connected to database");

    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_minutes: i64::try_from(config.jwt.access_token_expiry_secs / 60)?,
        refresh_token_expires_days: i64::try_from(config.jwt.refresh_token_expiry_secs / 86_400)?,
    };
    let jwt_service = JwtService::new(jwt_config);

    let email_service = EmailService::new(config.email.clone());
    info!(
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        "Email service configured"
    );

    let payments = &config.payments;
    for (provider, key) in [
        ("stripe", &payments.stripe_secret_key),
        ("paystack", &payments.paystack_secret_key),
        ("flutterwave", &payments.flutterwave_secret_key),
    ] {
        if key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            warn!(provider, "Payment provider not configured");
        }
    }
    let gateway = HttpPaymentGateway::new(payments.clone())
        .context("Failed to build payment HTTP client")?;

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        email_service: Arc::new(email_service),
        payments: Arc::new(gateway),
        payments_config: Arc::new(config.payments.clone()),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
