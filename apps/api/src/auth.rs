//! JWT session verification.
//!
//! Tokens are issued by the identity provider that owns registration and
//! login; this server only checks the signature and expiry and reads the
//! tenant out of the claims.
//!
//! ```text
//! Authorization: Bearer <jwt>
//!        │
//!        ├── header missing ─────────────► 401 UNAUTHORIZED
//!        ├── not "Bearer ..." / bad sig ─► 403 FORBIDDEN
//!        ├── expired ────────────────────► 403 FORBIDDEN
//!        ▼
//! TenantContext { tenant_id, user_id } ──► handler
//! ```

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Tenant the user acts for
    pub tenant_id: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// JWT token manager.
#[derive(Debug, Clone)]
pub struct JwtManager {
    secret: String,
    access_lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: impl Into<String>, access_lifetime_secs: i64) -> Self {
        JwtManager {
            secret: secret.into(),
            access_lifetime_secs,
        }
    }

    /// Signs a token for `tenant_id`.
    ///
    /// Used by tests and local tooling; production tokens come from the
    /// identity provider holding the same secret.
    pub fn issue_token(&self, user_id: &str, tenant_id: &str) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_lifetime_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            tenant_id: tenant_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            warn!(error = %e, "Rejected session token");
            ApiError::forbidden("Invalid or expired token")
        })?;

        if token_data.claims.tenant_id.trim().is_empty() {
            return Err(ApiError::forbidden("Token carries no tenant"));
        }

        Ok(token_data.claims)
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The authenticated tenant of a request.
///
/// Handlers take this as an argument; nothing else in the server knows
/// who is calling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    pub tenant_id: String,
    pub user_id: String,
}

impl FromRequestParts<AppState> for TenantContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(ApiError::unauthorized)?;

        let token = header
            .to_str()
            .ok()
            .and_then(extract_bearer_token)
            .ok_or_else(|| ApiError::forbidden("Invalid authorization header"))?;

        let claims = state.jwt.validate_token(token)?;

        Ok(TenantContext {
            tenant_id: claims.tenant_id,
            user_id: claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret", 3600);

        let token = manager.issue_token("user-001", "tenant-001").unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "user-001");
        assert_eq!(claims.tenant_id, "tenant-001");
    }

    #[test]
    fn test_wrong_secret_is_forbidden() {
        let issuer = JwtManager::new("one-secret", 3600);
        let verifier = JwtManager::new("another-secret", 3600);

        let token = issuer.issue_token("user-001", "tenant-001").unwrap();
        let err = verifier.validate_token(&token).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[test]
    fn test_expired_token_is_forbidden() {
        // Well past the default 60 s leeway.
        let manager = JwtManager::new("test-secret", -3600);

        let token = manager.issue_token("user-001", "tenant-001").unwrap();
        assert!(manager.validate_token(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
    }
}
