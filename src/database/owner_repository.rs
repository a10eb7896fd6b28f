use crate::database::error::DatabaseError;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Gym owner account row. The id matches the auth principal's subject.
#[derive(Debug, Clone, FromRow)]
pub struct GymOwner {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Approval states for a gym owner account.
pub const OWNER_STATUS_PENDING: &str = "pending";
pub const OWNER_STATUS_PENDING_VERIFICATION: &str = "pending_verification";
pub const OWNER_STATUS_APPROVED: &str = "approved";

pub struct OwnerRepository {
    pool: PgPool,
}

impl OwnerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Force the owner's approval status to `approved`. The update is
    /// idempotent: re-approving an already approved owner is a no-op write.
    pub async fn approve(&self, owner_id: Uuid) -> Result<GymOwner, DatabaseError> {
        sqlx::query_as::<_, GymOwner>(
            "UPDATE gym_owners
             SET status = $2, updated_at = now()
             WHERE id = $1
             RETURNING id, full_name, email, phone, status, created_at, updated_at",
        )
        .bind(owner_id)
        .bind(OWNER_STATUS_APPROVED)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }
}
