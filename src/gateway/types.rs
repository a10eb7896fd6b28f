use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Gateway status sentinel for a credited payment.
pub const CREDIT_STATUS: &str = "Credit";

/// Parameters for an outbound payment-request creation. The client adds the
/// redirect/webhook URLs and credentials from its own configuration.
#[derive(Debug, Clone)]
pub struct PaymentRequestParams {
    pub purpose: String,
    pub amount: String,
    pub buyer_name: String,
    pub email: String,
    pub phone: String,
}

/// The gateway's payment-request object. Fields the service relies on are
/// typed; everything else the gateway sends is carried through untouched so
/// the client response still contains the full object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequestObject {
    pub id: String,
    pub longurl: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Gateway response envelope for payment-request creation.
#[derive(Debug, Deserialize)]
pub struct PaymentRequestEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<serde_json::Value>,
    #[serde(default)]
    pub payment_request: Option<PaymentRequestObject>,
}

#[derive(Debug, Clone, Error)]
pub enum WebhookParseError {
    #[error("missing required webhook field: {0}")]
    MissingField(&'static str),
}

/// A parsed webhook delivery.
///
/// The required fields are typed; the full form payload is kept as received
/// because every field (known or not) participates in the MAC. Unknown
/// fields are otherwise ignored.
#[derive(Debug, Clone)]
pub struct WebhookNotification {
    pub status: String,
    pub payment_request_id: String,
    pub payment_id: String,
    pub mac: Option<String>,
    pub fields: BTreeMap<String, String>,
}

impl WebhookNotification {
    pub fn from_form_fields(
        fields: BTreeMap<String, String>,
    ) -> Result<Self, WebhookParseError> {
        let required = |name: &'static str| {
            fields
                .get(name)
                .filter(|v| !v.is_empty())
                .cloned()
                .ok_or(WebhookParseError::MissingField(name))
        };

        Ok(Self {
            status: required("status")?,
            payment_request_id: required("payment_request_id")?,
            payment_id: required("payment_id")?,
            mac: fields.get("mac").cloned(),
            fields,
        })
    }

    pub fn is_credit(&self) -> bool {
        self.status == CREDIT_STATUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn notification_parses_required_fields() {
        let n = WebhookNotification::from_form_fields(form(&[
            ("status", "Credit"),
            ("payment_request_id", "PR123"),
            ("payment_id", "PAY456"),
            ("mac", "abc123"),
            ("buyer", "owner@example.com"),
        ]))
        .expect("payload should parse");

        assert!(n.is_credit());
        assert_eq!(n.payment_request_id, "PR123");
        assert_eq!(n.payment_id, "PAY456");
        assert_eq!(n.mac.as_deref(), Some("abc123"));
        // Unknown fields stay available for signature verification.
        assert_eq!(n.fields.get("buyer").map(String::as_str), Some("owner@example.com"));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let err = WebhookNotification::from_form_fields(form(&[
            ("status", "Credit"),
            ("payment_id", "PAY456"),
        ]))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing required webhook field: payment_request_id"
        );
    }

    #[test]
    fn mac_is_optional_at_parse_time() {
        let n = WebhookNotification::from_form_fields(form(&[
            ("status", "Failed"),
            ("payment_request_id", "PR1"),
            ("payment_id", "PAY1"),
        ]))
        .expect("payload should parse");
        assert!(n.mac.is_none());
        assert!(!n.is_credit());
    }

    #[test]
    fn payment_request_envelope_deserializes_gateway_failure() {
        let body = r#"{"success": false, "message": {"amount": ["must be positive"]}}"#;
        let envelope: PaymentRequestEnvelope =
            serde_json::from_str(body).expect("envelope should parse");
        assert!(!envelope.success);
        assert!(envelope.payment_request.is_none());
        assert!(envelope.message.is_some());
    }

    #[test]
    fn payment_request_object_keeps_unknown_fields() {
        let body = r#"{
            "success": true,
            "payment_request": {
                "id": "PR123",
                "longurl": "https://pay.example.com/PR123",
                "status": "Pending",
                "shorturl": "https://imjo.in/abc",
                "purpose": "Subscription: Gold"
            }
        }"#;
        let envelope: PaymentRequestEnvelope =
            serde_json::from_str(body).expect("envelope should parse");
        let request = envelope.payment_request.expect("payment_request present");
        assert_eq!(request.id, "PR123");
        assert_eq!(request.longurl, "https://pay.example.com/PR123");
        assert_eq!(
            request.extra.get("shorturl").and_then(|v| v.as_str()),
            Some("https://imjo.in/abc")
        );

        let json = serde_json::to_value(&request).expect("serialization should succeed");
        assert_eq!(json["purpose"], "Subscription: Gold");
    }
}
