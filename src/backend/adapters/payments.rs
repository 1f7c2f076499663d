//! Payment Processor Client
//!
//! Thin call/response client for the external payment processor. The only
//! operation the platform needs is creating a hosted checkout session for
//! an order; the processor redirects the buyer back to the configured
//! success/cancel URLs and the confirm endpoint marks the order.

use reqwest::Client;
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::server::config::PaymentConfig;

/// A checkout session created at the payment processor
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Processor-side session ID, stored on the order
    pub id: String,
    /// Hosted payment page the buyer is redirected to
    pub url: String,
}

/// Client for the payment processor API
#[derive(Clone)]
pub struct PaymentClient {
    http: Client,
    config: Option<PaymentConfig>,
}

impl PaymentClient {
    pub fn new(config: Option<PaymentConfig>) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Create a checkout session for an order total
    pub async fn create_checkout_session(
        &self,
        order_id: Uuid,
        amount_cents: i64,
        currency: &str,
    ) -> Result<CheckoutSession, ApiError> {
        let config = self
            .config
            .as_ref()
            .ok_or(ApiError::Unconfigured("payment processor"))?;

        let body = serde_json::json!({
            "amount": amount_cents,
            "currency": currency,
            "reference": order_id.to_string(),
            "success_url": config.success_url,
            "cancel_url": config.cancel_url,
        });

        let response = self
            .http
            .post(format!("{}/v1/checkout/sessions", config.api_url))
            .bearer_auth(&config.secret_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::upstream(format!("payment session request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(ApiError::upstream(format!(
                "payment processor returned {}: {}",
                status, detail
            )));
        }

        response
            .json::<CheckoutSession>()
            .await
            .map_err(|e| ApiError::upstream(format!("invalid payment session response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{bearer_token, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server_url: &str) -> PaymentClient {
        PaymentClient::new(Some(PaymentConfig {
            api_url: server_url.to_string(),
            secret_key: "sk_test_123".to_string(),
            success_url: "http://localhost/success".to_string(),
            cancel_url: "http://localhost/cancel".to_string(),
        }))
    }

    #[tokio::test]
    async fn test_create_checkout_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .and(bearer_token("sk_test_123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "cs_abc",
                "url": "https://pay.example/cs_abc"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let session = client
            .create_checkout_session(Uuid::new_v4(), 2500, "usd")
            .await
            .unwrap();

        assert_eq!(session.id, "cs_abc");
        assert_eq!(session.url, "https://pay.example/cs_abc");
    }

    #[tokio::test]
    async fn test_processor_error_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let result = client
            .create_checkout_session(Uuid::new_v4(), 2500, "usd")
            .await;

        assert!(matches!(result, Err(ApiError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_unconfigured_client() {
        let client = PaymentClient::new(None);
        assert!(!client.is_configured());
        let result = client
            .create_checkout_session(Uuid::new_v4(), 100, "usd")
            .await;
        assert!(matches!(result, Err(ApiError::Unconfigured(_))));
    }
}
