use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// Account role carried in the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(alias = "regular", alias = "REGULAR")]
    Regular,
    #[serde(alias = "business", alias = "BUSINESS")]
    Business,
    #[serde(alias = "admin", alias = "ADMIN")]
    Admin,
}

/// Caller identity established by the auth middleware.
///
/// Handlers take it as an extractor; a request without one is rejected with
/// 401 before the handler runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    pub username: String,
    pub role: Role,
    pub expiry: DateTime<Utc>,
}

impl AuthenticatedPrincipal {
    pub fn new(username: impl Into<String>, role: Role, expiry: DateTime<Utc>) -> Self {
        Self {
            username: username.into(),
            role,
            expiry,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedPrincipal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedPrincipal>()
            .cloned()
            .ok_or(AuthError::AuthenticationRequired)
    }
}
