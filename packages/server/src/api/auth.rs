//! Bearer token authentication
//!
//! Tokens are HS256 JWTs issued elsewhere; this server only verifies them.
//! The `sub` claim is the user id that scopes every structure operation.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use structree_core::UserContext;

use crate::api::{AppState, HttpError};

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Expiry as seconds since the Unix epoch
    pub exp: u64,
}

/// Verifies bearer tokens against a shared secret
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Check signature and expiry, returning the caller's identity
    pub fn verify(&self, token: &str) -> Result<UserContext, HttpError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            HttpError::unauthorized(format!("Invalid token: {}", e))
        })?;

        let user_id = data.claims.sub.trim();
        if user_id.is_empty() {
            return Err(HttpError::unauthorized("Token has an empty subject"));
        }
        Ok(UserContext::new(user_id))
    }
}

/// Extracts the caller's identity from `Authorization: Bearer <token>`
///
/// ```rust,ignore
/// async fn handler(AuthenticatedUser(ctx): AuthenticatedUser) { /* ... */ }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserContext);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| HttpError::unauthorized("Missing Authorization header"))?
            .to_str()
            .map_err(|_| HttpError::unauthorized("Malformed Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| HttpError::unauthorized("Expected a Bearer token"))?;

        state.tokens.verify(token).map(AuthenticatedUser)
    }
}
