//! Provider request bodies and response interpretation.
//!
//! Pure functions only; [`super::gateway`] does the I/O.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Value, json};

use super::error::PaymentError;
use super::types::{Checkout, CheckoutRequest, ExpectedCharge, Provider};

/// Converts minor units to a two-decimal major amount.
#[must_use]
pub fn major_units(amount_cents: i64) -> Decimal {
    Decimal::new(amount_cents, 2)
}

fn return_url(app_url: &str, outcome: &str, provider: Provider, reference: &str) -> String {
    format!(
        "{}/payment/{outcome}?provider={provider}&reference={reference}",
        app_url.trim_end_matches('/')
    )
}

/// Form fields for `POST /v1/checkout/sessions`.
#[must_use]
pub fn stripe_checkout_form(req: &CheckoutRequest, app_url: &str) -> Vec<(String, String)> {
    let pairs = [
        ("mode", "payment".to_string()),
        ("line_items[0][quantity]", "1".to_string()),
        ("line_items[0][price_data][currency]", req.currency.to_lowercase()),
        ("line_items[0][price_data][unit_amount]", req.amount_cents.to_string()),
        ("line_items[0][price_data][product_data][name]", req.product_name()),
        ("client_reference_id", req.reference.clone()),
        ("customer_email", req.customer_email.clone()),
        (
            "success_url",
            return_url(app_url, "success", Provider::Stripe, &req.reference),
        ),
        (
            "cancel_url",
            return_url(app_url, "cancelled", Provider::Stripe, &req.reference),
        ),
        ("metadata[tracking_code]", req.tracking_code.clone()),
        ("metadata[report_kind]", req.kind.as_str().to_string()),
    ];
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// JSON body for Paystack `transaction/initialize`.
#[must_use]
pub fn paystack_initialize_body(req: &CheckoutRequest, app_url: &str) -> Value {
    json!({
        "email": req.customer_email,
        "amount": req.amount_cents,
        "currency": req.currency.to_uppercase(),
        "reference": req.reference,
        "callback_url": return_url(app_url, "callback", Provider::Paystack, &req.reference),
        "metadata": {
            "tracking_code": req.tracking_code,
            "report_kind": req.kind.as_str(),
        },
    })
}

/// JSON body for Flutterwave `v3/payments`. The amount is in major units.
#[must_use]
pub fn flutterwave_payment_body(req: &CheckoutRequest, app_url: &str) -> Value {
    json!({
        "tx_ref": req.reference,
        "amount": major_units(req.amount_cents).to_string(),
        "currency": req.currency.to_uppercase(),
        "redirect_url": return_url(app_url, "callback", Provider::Flutterwave, &req.reference),
        "customer": {
            "email": req.customer_email,
            "name": req.customer_name,
        },
        "customizations": {
            "title": req.product_name(),
        },
        "meta": {
            "tracking_code": req.tracking_code,
            "report_kind": req.kind.as_str(),
        },
    })
}

fn field<'a>(provider: Provider, body: &'a Value, pointer: &str) -> Result<&'a str, PaymentError> {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .ok_or_else(|| PaymentError::InvalidResponse {
            provider,
            message: format!("missing {pointer}"),
        })
}

/// Reads a checkout-initialization response.
pub fn parse_checkout(provider: Provider, body: &Value) -> Result<Checkout, PaymentError> {
    match provider {
        Provider::Stripe => {
            let session_id = field(provider, body, "/id")?;
            let url = field(provider, body, "/url")?;
            Ok(Checkout {
                checkout_url: url.to_string(),
                provider_payload: Some(json!({ "session_id": session_id })),
            })
        }
        Provider::Paystack => {
            if body.get("status").and_then(Value::as_bool) != Some(true) {
                return Err(PaymentError::InvalidResponse {
                    provider,
                    message: "status is not true".to_string(),
                });
            }
            let url = field(provider, body, "/data/authorization_url")?;
            Ok(Checkout {
                checkout_url: url.to_string(),
                provider_payload: body
                    .pointer("/data/access_code")
                    .map(|code| json!({ "access_code": code })),
            })
        }
        Provider::Flutterwave => {
            if body.get("status").and_then(Value::as_str) != Some("success") {
                return Err(PaymentError::InvalidResponse {
                    provider,
                    message: "status is not success".to_string(),
                });
            }
            let url = field(provider, body, "/data/link")?;
            Ok(Checkout {
                checkout_url: url.to_string(),
                provider_payload: None,
            })
        }
    }
}

/// Returns true when a verification response reports a settled payment of
/// exactly the expected amount and currency.
#[must_use]
pub fn is_paid(provider: Provider, body: &Value, expected: &ExpectedCharge) -> bool {
    let (status, want_status, amount, currency) = match provider {
        Provider::Stripe => (
            "/payment_status",
            "paid",
            decimal_at(body, "/amount_total").map(|a| a == Decimal::from(expected.amount_cents)),
            "/currency",
        ),
        Provider::Paystack => (
            "/data/status",
            "success",
            decimal_at(body, "/data/amount").map(|a| a == Decimal::from(expected.amount_cents)),
            "/data/currency",
        ),
        Provider::Flutterwave => (
            "/data/status",
            "successful",
            decimal_at(body, "/data/amount").map(|a| a == major_units(expected.amount_cents)),
            "/data/currency",
        ),
    };

    if body.pointer(status).and_then(Value::as_str) != Some(want_status) {
        return false;
    }
    let currency_matches = body
        .pointer(currency)
        .and_then(Value::as_str)
        .is_some_and(|c| c.eq_ignore_ascii_case(&expected.currency));
    if amount == Some(true) && currency_matches {
        return true;
    }
    tracing::warn!(
        %provider,
        expected_cents = expected.amount_cents,
        expected_currency = %expected.currency,
        "Provider reports a charge that does not match the fee"
    );
    false
}

/// Reads a JSON number or numeric string without going through floats.
fn decimal_at(body: &Value, pointer: &str) -> Option<Decimal> {
    match body.pointer(pointer)? {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Extracts the Stripe session ID stored at initialization.
pub fn stripe_session_id(payload: Option<&Value>) -> Result<&str, PaymentError> {
    payload
        .and_then(|p| p.get("session_id"))
        .and_then(Value::as_str)
        .ok_or_else(|| PaymentError::InvalidResponse {
            provider: Provider::Stripe,
            message: "no checkout session recorded for this payment".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportKind;

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            provider: Provider::Stripe,
            reference: "YCP-abc".to_string(),
            kind: ReportKind::Vehicle,
            tracking_code: "YC-VEH-ABCDEFGH".to_string(),
            amount_cents: 640,
            currency: "USD".to_string(),
            customer_email: "ada@example.com".to_string(),
            customer_name: "Ada".to_string(),
        }
    }

    fn form_value<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_major_units() {
        assert_eq!(major_units(640).to_string(), "6.40");
        assert_eq!(major_units(0).to_string(), "0.00");
    }

    #[test]
    fn test_stripe_form() {
        let form = stripe_checkout_form(&request(), "https://app.example.com/");
        assert_eq!(form_value(&form, "mode"), Some("payment"));
        assert_eq!(form_value(&form, "line_items[0][price_data][unit_amount]"), Some("640"));
        assert_eq!(form_value(&form, "line_items[0][price_data][currency]"), Some("usd"));
        assert_eq!(
            form_value(&form, "line_items[0][price_data][product_data][name]"),
            Some("YaraCheck Vehicle report")
        );
        assert_eq!(form_value(&form, "client_reference_id"), Some("YCP-abc"));
        assert_eq!(
            form_value(&form, "success_url"),
            Some("https://app.example.com/payment/success?provider=stripe&reference=YCP-abc")
        );
        assert_eq!(form_value(&form, "metadata[tracking_code]"), Some("YC-VEH-ABCDEFGH"));
    }

    #[test]
    fn test_paystack_body_uses_minor_units() {
        let body = paystack_initialize_body(&request(), "https://app.example.com");
        assert_eq!(body["amount"], 640);
        assert_eq!(body["reference"], "YCP-abc");
        assert_eq!(body["email"], "ada@example.com");
    }

    #[test]
    fn test_flutterwave_body_uses_major_units() {
        let body = flutterwave_payment_body(&request(), "https://app.example.com");
        assert_eq!(body["amount"], "6.40");
        assert_eq!(body["tx_ref"], "YCP-abc");
        assert_eq!(body["customer"]["name"], "Ada");
        assert_eq!(body["customizations"]["title"], "YaraCheck Vehicle report");
    }

    #[test]
    fn test_parse_stripe_checkout() {
        let body = json!({"id": "cs_test_1", "url": "https://checkout.stripe.com/c/1"});
        let checkout = parse_checkout(Provider::Stripe, &body).unwrap();
        assert_eq!(checkout.checkout_url, "https://checkout.stripe.com/c/1");
        assert_eq!(
            stripe_session_id(checkout.provider_payload.as_ref()).unwrap(),
            "cs_test_1"
        );
    }

    #[test]
    fn test_parse_paystack_checkout() {
        let body = json!({"status": true, "data": {"authorization_url": "https://checkout.paystack.com/x", "access_code": "x"}});
        let checkout = parse_checkout(Provider::Paystack, &body).unwrap();
        assert_eq!(checkout.checkout_url, "https://checkout.paystack.com/x");

        let failed = json!({"status": false, "message": "Invalid key"});
        assert!(parse_checkout(Provider::Paystack, &failed).is_err());
    }

    #[test]
    fn test_parse_flutterwave_checkout() {
        let body = json!({"status": "success", "data": {"link": "https://checkout.flutterwave.com/v3/hosted/pay/1"}});
        let checkout = parse_checkout(Provider::Flutterwave, &body).unwrap();
        assert_eq!(checkout.checkout_url, "https://checkout.flutterwave.com/v3/hosted/pay/1");
        assert!(parse_checkout(Provider::Flutterwave, &json!({"status": "error"})).is_err());
    }

    fn usd(amount_cents: i64) -> ExpectedCharge {
        ExpectedCharge {
            amount_cents,
            currency: "USD".to_string(),
        }
    }

    #[test]
    fn test_is_paid() {
        let fee = usd(640);
        assert!(is_paid(
            Provider::Stripe,
            &json!({"payment_status": "paid", "amount_total": 640, "currency": "usd"}),
            &fee
        ));
        assert!(!is_paid(
            Provider::Stripe,
            &json!({"payment_status": "unpaid", "amount_total": 640, "currency": "usd"}),
            &fee
        ));
        assert!(is_paid(
            Provider::Paystack,
            &json!({"data": {"status": "success", "amount": 640, "currency": "USD"}}),
            &fee
        ));
        assert!(!is_paid(
            Provider::Paystack,
            &json!({"data": {"status": "abandoned", "amount": 640, "currency": "USD"}}),
            &fee
        ));
        assert!(is_paid(
            Provider::Flutterwave,
            &json!({"data": {"status": "successful", "amount": 6.4, "currency": "USD"}}),
            &fee
        ));
        assert!(!is_paid(
            Provider::Flutterwave,
            &json!({"data": {"status": "success", "amount": 6.4, "currency": "USD"}}),
            &fee
        ));
    }

    #[test]
    fn test_partial_or_foreign_charge_is_not_paid() {
        let fee = usd(640);
        assert!(!is_paid(
            Provider::Paystack,
            &json!({"data": {"status": "success", "amount": 100, "currency": "USD"}}),
            &fee
        ));
        assert!(!is_paid(
            Provider::Paystack,
            &json!({"data": {"status": "success", "amount": 640, "currency": "NGN"}}),
            &fee
        ));
        assert!(!is_paid(
            Provider::Flutterwave,
            &json!({"data": {"status": "successful", "amount": "6.39", "currency": "USD"}}),
            &fee
        ));
        assert!(!is_paid(
            Provider::Stripe,
            &json!({"payment_status": "paid", "currency": "usd"}),
            &fee
        ));
    }

    #[test]
    fn test_missing_stripe_session() {
        assert!(stripe_session_id(None).is_err());
        assert!(stripe_session_id(Some(&json!({}))).is_err());
    }
}
