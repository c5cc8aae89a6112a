//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Outgoing email configuration.
    #[serde(default)]
    pub email: EmailConfig,
    /// Payment provider configuration.
    #[serde(default)]
    pub payments: PaymentsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT settings as read from configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token expiration in seconds.
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> u64 {
    604_800 // 7 days
}

/// SMTP configuration for transactional email.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP relay host.
    pub smtp_host: String,
    /// SMTP port.
    pub smtp_port: u16,
    /// SMTP username.
    pub smtp_username: String,
    /// SMTP password.
    pub smtp_password: String,
    /// Sender address.
    pub from_email: String,
    /// Sender display name.
    pub from_name: String,
    /// Public frontend URL used in links.
    pub frontend_url: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@yaracheck.local".to_string(),
            from_name: "YaraCheck".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
        }
    }
}

/// Payment provider configuration.
///
/// A provider with no secret key is treated as disabled.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentsConfig {
    /// Base URL the providers redirect back to after checkout.
    #[serde(default = "default_app_url")]
    pub app_url: String,
    /// Stripe secret key.
    #[serde(default)]
    pub stripe_secret_key: Option<String>,
    /// Currency charged through Stripe.
    #[serde(default = "default_stripe_currency")]
    pub stripe_currency: String,
    /// Paystack secret key.
    #[serde(default)]
    pub paystack_secret_key: Option<String>,
    /// Currency charged through Paystack. Fees are quoted in this currency's
    /// minor units, so it must match the pricing currency.
    #[serde(default = "default_paystack_currency")]
    pub paystack_currency: String,
    /// Flutterwave secret key.
    #[serde(default)]
    pub flutterwave_secret_key: Option<String>,
    /// Currency charged through Flutterwave.
    #[serde(default = "default_flutterwave_currency")]
    pub flutterwave_currency: String,
    /// Timeout for provider HTTP calls, in seconds.
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

fn default_app_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_stripe_currency() -> String {
    "USD".to_string()
}

fn default_paystack_currency() -> String {
    "USD".to_string()
}

fn default_flutterwave_currency() -> String {
    "USD".to_string()
}

fn default_provider_timeout() -> u64 {
    20
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            app_url: default_app_url(),
            stripe_secret_key: None,
            stripe_currency: default_stripe_currency(),
            paystack_secret_key: None,
            paystack_currency: default_paystack_currency(),
            flutterwave_secret_key: None,
            flutterwave_currency: default_flutterwave_currency(),
            timeout_secs: default_provider_timeout(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("YARACHECK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("YARACHECK__DATABASE__URL", Some("postgres://localhost/yc")),
                ("YARACHECK__JWT__SECRET", Some("s3cret")),
                ("YARACHECK__SERVER__PORT", Some("9000")),
                ("YARACHECK__PAYMENTS__PAYSTACK_SECRET_KEY", Some("sk_test_x")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/yc");
                assert_eq!(config.jwt.secret, "s3cret");
                assert_eq!(config.server.port, 9000);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.jwt.access_token_expiry_secs, 900);
                assert_eq!(
                    config.payments.paystack_secret_key.as_deref(),
                    Some("sk_test_x")
                );
                assert!(config.payments.stripe_secret_key.is_none());
                assert_eq!(config.payments.stripe_currency, "USD");
                assert_eq!(config.email.smtp_port, 1025);
            },
        );
    }

    #[test]
    fn test_payments_defaults() {
        let payments = PaymentsConfig::default();
        assert_eq!(payments.paystack_currency, "USD");
        assert_eq!(payments.timeout_secs, 20);
        assert!(payments.flutterwave_secret_key.is_none());
    }
}
