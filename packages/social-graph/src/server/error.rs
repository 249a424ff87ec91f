use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::domains::social_graph::SocialGraphError;

impl SocialGraphError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SocialGraphError::NotFound(_) => StatusCode::NOT_FOUND,
            SocialGraphError::InvalidOperation(_) => StatusCode::BAD_REQUEST,
            SocialGraphError::DependencyUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            SocialGraphError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for SocialGraphError {
    fn into_response(self) -> Response {
        if let SocialGraphError::DependencyUnavailable(e) = &self {
            error!(error = ?e, "Request failed on a dependency");
        }
        (
            self.status_code(),
            Json(json!({ "error": self.code(), "message": self.to_string() })),
        )
            .into_response()
    }
}
