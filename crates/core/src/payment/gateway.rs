//! HTTP gateway to the payment providers.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};
use yaracheck_shared::PaymentsConfig;

use super::error::PaymentError;
use super::provider::{
    flutterwave_payment_body, is_paid, parse_checkout, paystack_initialize_body,
    stripe_checkout_form, stripe_session_id,
};
use super::types::{Checkout, CheckoutRequest, ExpectedCharge, Provider, Verification};

/// Opens and verifies checkouts.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Opens a checkout for the request.
    async fn initialize(&self, req: &CheckoutRequest) -> Result<Checkout, PaymentError>;

    /// Asks the provider whether `reference` was paid in full. `provider_payload`
    /// is what [`PaymentGateway::initialize`] returned.
    async fn verify(
        &self,
        provider: Provider,
        reference: &str,
        expected: &ExpectedCharge,
        provider_payload: Option<&Value>,
    ) -> Result<Verification, PaymentError>;
}

/// Provider base URLs.
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    /// Stripe API base.
    pub stripe: String,
    /// Paystack API base.
    pub paystack: String,
    /// Flutterwave API base.
    pub flutterwave: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            stripe: "https://api.stripe.com".to_string(),
            paystack: "https://api.paystack.co".to_string(),
            flutterwave: "https://api.flutterwave.com".to_string(),
        }
    }
}

/// [`PaymentGateway`] over HTTPS with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    http: reqwest::Client,
    config: PaymentsConfig,
    endpoints: ProviderEndpoints,
}

impl HttpPaymentGateway {
    /// Creates a gateway talking to the production endpoints.
    pub fn new(config: PaymentsConfig) -> Result<Self, reqwest::Error> {
        Self::with_endpoints(config, ProviderEndpoints::default())
    }

    /// Creates a gateway with custom endpoints.
    pub fn with_endpoints(
        config: PaymentsConfig,
        endpoints: ProviderEndpoints,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            config,
            endpoints,
        })
    }

    fn secret(&self, provider: Provider) -> Result<&str, PaymentError> {
        let key = match provider {
            Provider::Stripe => self.config.stripe_secret_key.as_deref(),
            Provider::Paystack => self.config.paystack_secret_key.as_deref(),
            Provider::Flutterwave => self.config.flutterwave_secret_key.as_deref(),
        };
        key.filter(|k| !k.trim().is_empty())
            .ok_or(PaymentError::NotConfigured(provider))
    }

    async fn send(
        &self,
        provider: Provider,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, PaymentError> {
        let resp = request
            .bearer_auth(self.secret(provider)?)
            .send()
            .await
            .map_err(|source| PaymentError::Http { provider, source })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            warn!(%provider, status = status.as_u16(), "Provider call failed");
            return Err(PaymentError::Api {
                provider,
                status: status.as_u16(),
                body,
            });
        }

        resp.json()
            .await
            .map_err(|e| PaymentError::InvalidResponse {
                provider,
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn initialize(&self, req: &CheckoutRequest) -> Result<Checkout, PaymentError> {
        let provider = req.provider;
        // Fail before building anything when the provider is off.
        self.secret(provider)?;

        let app_url = &self.config.app_url;
        let request = match provider {
            Provider::Stripe => self
                .http
                .post(format!("{}/v1/checkout/sessions", self.endpoints.stripe))
                .form(&stripe_checkout_form(req, app_url)),
            Provider::Paystack => self
                .http
                .post(format!("{}/transaction/initialize", self.endpoints.paystack))
                .json(&paystack_initialize_body(req, app_url)),
            Provider::Flutterwave => self
                .http
                .post(format!("{}/v3/payments", self.endpoints.flutterwave))
                .json(&flutterwave_payment_body(req, app_url)),
        };

        let body = self.send(provider, request).await?;
        debug!(%provider, reference = %req.reference, "Checkout opened");
        parse_checkout(provider, &body)
    }

    async fn verify(
        &self,
        provider: Provider,
        reference: &str,
        expected: &ExpectedCharge,
        provider_payload: Option<&Value>,
    ) -> Result<Verification, PaymentError> {
        self.secret(provider)?;

        let request = match provider {
            Provider::Stripe => {
                let session_id = stripe_session_id(provider_payload)?;
                self.http.get(format!(
                    "{}/v1/checkout/sessions/{session_id}",
                    self.endpoints.stripe
                ))
            }
            Provider::Paystack => self.http.get(format!(
                "{}/transaction/verify/{reference}",
                self.endpoints.paystack
            )),
            Provider::Flutterwave => self
                .http
                .get(format!(
                    "{}/v3/transactions/verify_by_reference",
                    self.endpoints.flutterwave
                ))
                .query(&[("tx_ref", reference)]),
        };

        let body = self.send(provider, request).await?;
        Ok(Verification {
            paid: is_paid(provider, &body, expected),
            provider_payload: body,
        })
    }
}
