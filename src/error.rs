//! Request-level error handling for the checkout API.
//!
//! Errors on the payment-creation path surface to the mobile client as a
//! JSON `{ "error": ... }` envelope with a matching status code. Webhook
//! processing has its own error type ([`crate::services::reconciler`])
//! because its failures are only ever seen by the gateway as status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::database::error::DatabaseError;
use crate::gateway::error::GatewayError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("user is not authenticated")]
    Unauthenticated,

    #[error("plan {plan_id} not found")]
    PlanNotFound { plan_id: Uuid },

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::PlanNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Gateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the client-facing error envelope. Gateway messages
    /// are passed through raw so a rejected payment request is debuggable
    /// from the client alert; database internals are not.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthenticated => "User not authenticated".to_string(),
            AppError::PlanNotFound { .. } => "Plan not found".to_string(),
            AppError::Gateway(err) => err.to_string(),
            AppError::Database(_) => "Internal server error".to_string(),
        }
    }
}

/// Client-facing error envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, status = %status.as_u16(), "Server error occurred");
        } else {
            tracing::warn!(error = %self, status = %status.as_u16(), "Client error occurred");
        }

        let body = ErrorBody {
            error: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_mapping_is_correct() {
        assert_eq!(
            AppError::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::PlanNotFound {
                plan_id: Uuid::nil()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Gateway(GatewayError::Rejected {
                message: "bad amount".to_string()
            })
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn gateway_message_reaches_the_client() {
        let err = AppError::Gateway(GatewayError::Rejected {
            message: "amount must be positive".to_string(),
        });
        assert!(err.user_message().contains("amount must be positive"));
    }

    #[test]
    fn database_details_are_not_exposed() {
        let err = AppError::Database(DatabaseError::from_sqlx(sqlx::Error::PoolTimedOut));
        assert_eq!(err.user_message(), "Internal server error");
    }
}
