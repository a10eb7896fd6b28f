use crate::database::error::DatabaseError;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Subscription plan reference data. Plans are administered out of band;
/// this service only reads them.
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionPlan {
    pub id: Uuid,
    pub name: String,
    pub price: i32,
    pub duration_days: i32,
    pub features: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub struct PlanRepository {
    pool: PgPool,
}

impl PlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SubscriptionPlan>, DatabaseError> {
        sqlx::query_as::<_, SubscriptionPlan>(
            "SELECT id, name, price, duration_days, features, created_at
             FROM subscription_plans
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }
}
