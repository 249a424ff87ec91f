use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Authentication errors for the social graph API
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Invalid or expired token")]
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let code = match self {
            AuthError::AuthenticationRequired => "authentication_required",
            AuthError::InvalidToken => "invalid_token",
        };
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": code, "message": self.to_string() })),
        )
            .into_response()
    }
}
