use crate::common::auth::{AuthError, AuthenticatedPrincipal, JwtService};
use axum::{
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

/// JWT authentication middleware
///
/// Extracts JWT token from Authorization header, verifies it, and adds the
/// `AuthenticatedPrincipal` to request extensions. Requests without an
/// Authorization header continue anonymously; handlers that need a caller
/// reject them. A header that is present but does not verify is rejected here.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    match extract_principal(&request, &jwt_service) {
        Ok(Some(principal)) => {
            debug!(username = %principal.username, role = ?principal.role, "Authenticated request");
            request.extensions_mut().insert(principal);
        }
        Ok(None) => debug!("No authentication token"),
        Err(e) => {
            debug!(error = %e, "Rejected authentication token");
            return e.into_response();
        }
    }

    next.run(request).await
}

/// Extract and verify JWT token from request
fn extract_principal(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Result<Option<AuthenticatedPrincipal>, AuthError> {
    let Some(auth_header) = request.headers().get("authorization") else {
        return Ok(None);
    };
    let auth_str = auth_header.to_str().map_err(|_| AuthError::InvalidToken)?;

    // Extract token (handle both "Bearer <token>" and raw token)
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    let claims = jwt_service
        .verify_token(token)
        .map_err(|_| AuthError::InvalidToken)?;
    Ok(Some(claims.into_principal()))
}
