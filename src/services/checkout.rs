//! Payment request issuance.
//!
//! Turns an authenticated owner plus a plan choice into a gateway payment
//! request and a `pending` subscription row. The payment URL is the
//! deliverable: a local bookkeeping failure after the gateway call is
//! logged and swallowed so checkout is never blocked by it.

use chrono::{Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AuthenticatedOwner;
use crate::database::plan_repository::{PlanRepository, SubscriptionPlan};
use crate::database::subscription_repository::SubscriptionRepository;
use crate::error::AppError;
use crate::gateway::client::InstamojoClient;
use crate::gateway::types::{PaymentRequestObject, PaymentRequestParams};

/// Result of a successful checkout: the gateway's payment-request object
/// and the redirect URL the client opens to pay.
#[derive(Debug)]
pub struct CheckoutOutcome {
    pub payment_request: PaymentRequestObject,
    pub url: String,
}

pub struct CheckoutService {
    plans: PlanRepository,
    subscriptions: SubscriptionRepository,
    gateway: InstamojoClient,
}

impl CheckoutService {
    pub fn new(
        plans: PlanRepository,
        subscriptions: SubscriptionRepository,
        gateway: InstamojoClient,
    ) -> Self {
        Self {
            plans,
            subscriptions,
            gateway,
        }
    }

    pub async fn create_payment_request(
        &self,
        owner: &AuthenticatedOwner,
        plan_id: Uuid,
    ) -> Result<CheckoutOutcome, AppError> {
        let plan = self
            .plans
            .find_by_id(plan_id)
            .await?
            .ok_or(AppError::PlanNotFound { plan_id })?;

        let params = build_gateway_params(&plan, owner);
        let payment_request = self.gateway.create_payment_request(params).await?;

        // Provisional window; the reconciler recomputes it from the credit time.
        let end_date = Utc::now() + Duration::days(i64::from(plan.duration_days));

        match self
            .subscriptions
            .create_pending(
                owner.id,
                plan.id,
                &payment_request.id,
                plan.price,
                end_date,
            )
            .await
        {
            Ok(subscription) => {
                info!(
                    owner_id = %owner.id,
                    subscription_id = %subscription.id,
                    payment_request_id = %payment_request.id,
                    "Pending subscription recorded"
                );
            }
            Err(e) => {
                // Payment link already issued; bookkeeping failure must not block checkout.
                warn!(
                    owner_id = %owner.id,
                    payment_request_id = %payment_request.id,
                    error = %e,
                    retryable = e.is_retryable(),
                    "Pending subscription insert failed after payment request creation"
                );
            }
        }

        Ok(CheckoutOutcome {
            url: payment_request.longurl.clone(),
            payment_request,
        })
    }
}

fn build_gateway_params(
    plan: &SubscriptionPlan,
    owner: &AuthenticatedOwner,
) -> PaymentRequestParams {
    PaymentRequestParams {
        purpose: format!("Subscription: {}", plan.name),
        amount: plan.price.to_string(),
        buyer_name: owner
            .full_name
            .clone()
            .unwrap_or_else(|| "Gym Owner".to_string()),
        email: owner.email.clone().unwrap_or_default(),
        phone: owner.phone.clone().unwrap_or_default(),
    }
}
