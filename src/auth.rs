//! Bearer-token principal resolution.
//!
//! The hosted auth service issues HS256 access tokens; this service
//! verifies them locally with the shared signing secret and resolves the
//! caller to an [`AuthenticatedOwner`]. Anything short of a valid token
//! with a UUID subject rejects with `Unauthenticated`.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header, request::Parts, HeaderMap};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;

/// Claims carried by the auth service's access tokens. Profile fields are
/// optional; `exp` is validated by the decoder.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    pub exp: i64,
}

/// Shared HS256 signing secret, provided through router state.
#[derive(Clone)]
pub struct JwtSecret(pub String);

/// The resolved caller identity.
#[derive(Debug, Clone)]
pub struct AuthenticatedOwner {
    pub id: Uuid,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub full_name: Option<String>,
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Resolve the `Authorization: Bearer` header to an authenticated owner.
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthenticatedOwner, AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthenticated)?;

    let claims = verify_token(token, secret).map_err(|e| {
        warn!(error = %e, "Rejecting request with invalid bearer token");
        AppError::Unauthenticated
    })?;

    let id = Uuid::parse_str(&claims.sub).map_err(|_| {
        warn!(sub = %claims.sub, "Token subject is not a UUID");
        AppError::Unauthenticated
    })?;

    Ok(AuthenticatedOwner {
        id,
        email: claims.email,
        phone: claims.phone,
        full_name: claims.full_name,
    })
}

impl<S> FromRequestParts<S> for AuthenticatedOwner
where
    JwtSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let JwtSecret(secret) = JwtSecret::from_ref(state);
        authenticate(&parts.headers, &secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-signing-secret";

    fn token_for(sub: &str, exp_offset_secs: i64) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            email: Some("owner@example.com".to_string()),
            phone: Some("+919999999999".to_string()),
            full_name: Some("Asha Rao".to_string()),
            exp: chrono::Utc::now().timestamp() + exp_offset_secs,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("token encoding should succeed")
    }

    fn bearer_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).expect("valid header"),
        );
        headers
    }

    #[test]
    fn valid_token_resolves_to_owner() {
        let owner_id = Uuid::new_v4();
        let headers = bearer_headers(&token_for(&owner_id.to_string(), 3600));

        let owner = authenticate(&headers, SECRET).expect("token should authenticate");
        assert_eq!(owner.id, owner_id);
        assert_eq!(owner.full_name.as_deref(), Some("Asha Rao"));
    }

    #[test]
    fn missing_header_is_unauthenticated() {
        let headers = HeaderMap::new();
        assert!(matches!(
            authenticate(&headers, SECRET),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let headers = bearer_headers(&token_for(&Uuid::new_v4().to_string(), -3600));
        assert!(matches!(
            authenticate(&headers, SECRET),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let headers = bearer_headers(&token_for(&Uuid::new_v4().to_string(), 3600));
        assert!(matches!(
            authenticate(&headers, "other-secret"),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let headers = bearer_headers(&token_for("not-a-uuid", 3600));
        assert!(matches!(
            authenticate(&headers, SECRET),
            Err(AppError::Unauthenticated)
        ));
    }
}
