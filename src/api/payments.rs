use axum::{
    extract::{FromRef, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::{AuthenticatedOwner, JwtSecret};
use crate::error::AppError;
use crate::gateway::types::PaymentRequestObject;
use crate::services::checkout::CheckoutService;

pub struct CheckoutState {
    pub service: Arc<CheckoutService>,
    pub jwt_secret: JwtSecret,
}

impl FromRef<Arc<CheckoutState>> for JwtSecret {
    fn from_ref(state: &Arc<CheckoutState>) -> JwtSecret {
        state.jwt_secret.clone()
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub plan_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CreatePaymentResponse {
    pub payment_request: PaymentRequestObject,
    pub url: String,
}

/// POST /api/payments/create
pub async fn create_payment(
    State(state): State<Arc<CheckoutState>>,
    owner: AuthenticatedOwner,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<Json<CreatePaymentResponse>, AppError> {
    info!(owner_id = %owner.id, plan_id = %payload.plan_id, "Received payment creation request");

    let outcome = state
        .service
        .create_payment_request(&owner, payload.plan_id)
        .await?;

    Ok(Json(CreatePaymentResponse {
        payment_request: outcome.payment_request,
        url: outcome.url,
    }))
}
