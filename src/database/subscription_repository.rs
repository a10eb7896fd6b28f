use crate::database::error::DatabaseError;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Owner subscription row.
///
/// `payment_request_id` is the gateway payment-request id recorded at
/// creation and never rewritten; it is the key the webhook resolves by.
/// `payment_id` starts out equal to it and is replaced with the gateway's
/// definitive payment id when the subscription is activated.
#[derive(Debug, Clone, FromRow)]
pub struct OwnerSubscription {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub plan_id: Uuid,
    pub payment_request_id: String,
    pub payment_id: String,
    pub amount: i32,
    pub status: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Subscription states.
pub const SUBSCRIPTION_STATUS_PENDING: &str = "pending";
pub const SUBSCRIPTION_STATUS_ACTIVE: &str = "active";
pub const SUBSCRIPTION_STATUS_FAILED: &str = "failed";

/// Subscription row joined with the plan duration the reconciler needs to
/// compute the entitlement window.
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionWithPlan {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub plan_id: Uuid,
    pub payment_request_id: String,
    pub payment_id: String,
    pub amount: i32,
    pub status: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: DateTime<Utc>,
    pub plan_duration_days: i32,
}

pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a `pending` subscription for a freshly issued payment request.
    /// The provisional `payment_id` equals the payment-request id and the
    /// provisional `end_date` is overwritten on activation.
    pub async fn create_pending(
        &self,
        owner_id: Uuid,
        plan_id: Uuid,
        payment_request_id: &str,
        amount: i32,
        end_date: DateTime<Utc>,
    ) -> Result<OwnerSubscription, DatabaseError> {
        sqlx::query_as::<_, OwnerSubscription>(
            "INSERT INTO owner_subscriptions
             (owner_id, plan_id, payment_request_id, payment_id, amount, status, end_date)
             VALUES ($1, $2, $3, $3, $4, $5, $6)
             RETURNING id, owner_id, plan_id, payment_request_id, payment_id, amount,
                       status, start_date, end_date, created_at, updated_at",
        )
        .bind(owner_id)
        .bind(plan_id)
        .bind(payment_request_id)
        .bind(amount)
        .bind(SUBSCRIPTION_STATUS_PENDING)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    /// All subscriptions recorded against a gateway payment-request id,
    /// joined with their plan duration. The caller decides what zero or
    /// multiple matches mean; at most one is the documented invariant.
    pub async fn find_by_payment_request(
        &self,
        payment_request_id: &str,
    ) -> Result<Vec<SubscriptionWithPlan>, DatabaseError> {
        sqlx::query_as::<_, SubscriptionWithPlan>(
            "SELECT s.id, s.owner_id, s.plan_id, s.payment_request_id, s.payment_id,
                    s.amount, s.status, s.start_date, s.end_date,
                    p.duration_days AS plan_duration_days
             FROM owner_subscriptions s
             JOIN subscription_plans p ON p.id = s.plan_id
             WHERE s.payment_request_id = $1",
        )
        .bind(payment_request_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    /// Apply the credit transition: status, entitlement window and the
    /// definitive payment id, in one statement.
    pub async fn activate(
        &self,
        id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        payment_id: &str,
    ) -> Result<OwnerSubscription, DatabaseError> {
        sqlx::query_as::<_, OwnerSubscription>(
            "UPDATE owner_subscriptions
             SET status = $2, start_date = $3, end_date = $4, payment_id = $5,
                 updated_at = now()
             WHERE id = $1
             RETURNING id, owner_id, plan_id, payment_request_id, payment_id, amount,
                       status, start_date, end_date, created_at, updated_at",
        )
        .bind(id)
        .bind(SUBSCRIPTION_STATUS_ACTIVE)
        .bind(start_date)
        .bind(end_date)
        .bind(payment_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }
}
