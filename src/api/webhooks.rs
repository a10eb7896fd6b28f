use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::gateway::types::WebhookNotification;
use crate::services::reconciler::{ReconcileError, ReconcileOutcome, WebhookReconciler};

pub struct WebhookState {
    pub reconciler: Arc<WebhookReconciler>,
}

/// POST /webhooks/payment
///
/// The gateway only sees the status code: 200 means handled (or ignored on
/// purpose) and stops its retries, anything else makes it redeliver.
pub async fn handle_payment_webhook(
    State(state): State<Arc<WebhookState>>,
    Form(fields): Form<BTreeMap<String, String>>,
) -> impl IntoResponse {
    info!(field_count = fields.len(), "Received payment webhook");

    let notification = match WebhookNotification::from_form_fields(fields) {
        Ok(notification) => notification,
        Err(e) => {
            warn!(error = %e, "Malformed webhook payload");
            return (StatusCode::BAD_REQUEST, "Malformed payload").into_response();
        }
    };

    match state.reconciler.process(&notification).await {
        Ok(ReconcileOutcome::Activated { owner_id, .. }) => {
            info!(owner_id = %owner_id, "Payment processed successfully");
            (StatusCode::OK, "Webhook received").into_response()
        }
        Ok(ReconcileOutcome::Ignored { .. }) => {
            (StatusCode::OK, "Webhook received").into_response()
        }
        Err(ReconcileError::InvalidSignature) => {
            (StatusCode::BAD_REQUEST, "Invalid MAC").into_response()
        }
        Err(ReconcileError::SubscriptionNotFound { .. }) => {
            (StatusCode::NOT_FOUND, "Subscription not found").into_response()
        }
        Err(e) => {
            error!(error = %e, "Webhook reconciliation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Update failed").into_response()
        }
    }
}
