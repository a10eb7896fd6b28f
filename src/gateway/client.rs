use crate::gateway::error::{GatewayError, GatewayResult};
use crate::gateway::types::{PaymentRequestEnvelope, PaymentRequestObject, PaymentRequestParams};
use reqwest::Client;
use std::env;
use std::time::Duration;
use tracing::info;

const SANDBOX_BASE_URL: &str = "https://test.instamojo.com/api/1.1/";
const PRODUCTION_BASE_URL: &str = "https://www.instamojo.com/api/1.1/";

#[derive(Debug, Clone)]
pub struct InstamojoConfig {
    pub api_key: String,
    pub auth_token: String,
    pub sandbox: bool,
    pub webhook_salt: Option<String>,
    pub webhook_url: String,
    pub redirect_url: String,
    pub timeout_secs: u64,
}

impl InstamojoConfig {
    pub fn from_env() -> GatewayResult<Self> {
        let api_key = env::var("INSTAMOJO_API_KEY").map_err(|_| GatewayError::Configuration {
            message: "INSTAMOJO_API_KEY environment variable is required".to_string(),
        })?;
        let auth_token =
            env::var("INSTAMOJO_AUTH_TOKEN").map_err(|_| GatewayError::Configuration {
                message: "INSTAMOJO_AUTH_TOKEN environment variable is required".to_string(),
            })?;
        let webhook_url =
            env::var("PAYMENT_WEBHOOK_URL").map_err(|_| GatewayError::Configuration {
                message: "PAYMENT_WEBHOOK_URL environment variable is required".to_string(),
            })?;

        Ok(Self {
            api_key,
            auth_token,
            sandbox: env::var("INSTAMOJO_SANDBOX")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(false),
            webhook_salt: env::var("INSTAMOJO_SALT").ok().filter(|v| !v.is_empty()),
            webhook_url,
            redirect_url: env::var("PAYMENT_REDIRECT_URL")
                .unwrap_or_else(|_| "gymdesk://payment-status".to_string()),
            timeout_secs: env::var("GATEWAY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        })
    }

    fn base_url(&self) -> &'static str {
        if self.sandbox {
            SANDBOX_BASE_URL
        } else {
            PRODUCTION_BASE_URL
        }
    }
}

pub struct InstamojoClient {
    config: InstamojoConfig,
    http: Client,
}

impl InstamojoClient {
    pub fn new(config: InstamojoConfig) -> GatewayResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Network {
                message: format!("failed to initialize HTTP client: {}", e),
            })?;
        Ok(Self { config, http })
    }

    pub fn from_env() -> GatewayResult<Self> {
        Self::new(InstamojoConfig::from_env()?)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    /// Create a payment request against the gateway and return its
    /// payment-request object (carrying the redirect `longurl`).
    ///
    /// Creation is not idempotent on the gateway side, so transport errors
    /// are surfaced instead of retried.
    pub async fn create_payment_request(
        &self,
        params: PaymentRequestParams,
    ) -> GatewayResult<PaymentRequestObject> {
        let form = [
            ("purpose", params.purpose.as_str()),
            ("amount", params.amount.as_str()),
            ("buyer_name", params.buyer_name.as_str()),
            ("email", params.email.as_str()),
            ("phone", params.phone.as_str()),
            ("redirect_url", self.config.redirect_url.as_str()),
            ("webhook", self.config.webhook_url.as_str()),
            ("allow_repeated_payments", "False"),
        ];

        let response = self
            .http
            .post(self.endpoint("payment-requests/"))
            .header("X-Api-Key", &self.config.api_key)
            .header("X-Auth-Token", &self.config.auth_token)
            .form(&form)
            .send()
            .await
            .map_err(|e| GatewayError::Network {
                message: format!("payment request creation failed: {}", e),
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let envelope: PaymentRequestEnvelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(GatewayError::Rejected {
                    message: format!("HTTP {}: {}", status, body),
                });
            }
            Err(e) => {
                return Err(GatewayError::InvalidResponse {
                    message: format!("invalid gateway JSON ({}): {}", e, body),
                });
            }
        };

        if !envelope.success {
            let message = envelope
                .message
                .map(|m| m.to_string())
                .unwrap_or_else(|| body.clone());
            return Err(GatewayError::Rejected { message });
        }

        let request = envelope
            .payment_request
            .ok_or_else(|| GatewayError::InvalidResponse {
                message: format!("success envelope without payment_request: {}", body),
            })?;

        info!(payment_request_id = %request.id, "payment request created");
        Ok(request)
    }

    pub fn webhook_salt(&self) -> Option<&str> {
        self.config.webhook_salt.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(sandbox: bool) -> InstamojoConfig {
        InstamojoConfig {
            api_key: "key_test".to_string(),
            auth_token: "token_test".to_string(),
            sandbox,
            webhook_salt: Some("salt_test".to_string()),
            webhook_url: "https://api.example.com/webhooks/payment".to_string(),
            redirect_url: "gymdesk://payment-status".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn sandbox_flag_selects_test_base_url() {
        let client = InstamojoClient::new(config(true)).expect("client init should succeed");
        assert_eq!(
            client.endpoint("payment-requests/"),
            "https://test.instamojo.com/api/1.1/payment-requests/"
        );

        let client = InstamojoClient::new(config(false)).expect("client init should succeed");
        assert_eq!(
            client.endpoint("payment-requests/"),
            "https://www.instamojo.com/api/1.1/payment-requests/"
        );
    }

    #[test]
    fn webhook_salt_is_exposed() {
        let client = InstamojoClient::new(config(true)).expect("client init should succeed");
        assert_eq!(client.webhook_salt(), Some("salt_test"));
    }
}
