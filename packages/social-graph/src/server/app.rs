//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::common::auth::JwtService;
use crate::kernel::ServerDeps;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    create_follow_handler, decide_follow_request_handler, follow_exists_handler,
    follow_request_exists_handler, follow_requests_handler, followers_count_handler,
    followers_handler, following_count_handler, following_handler, health_handler,
    my_followers_handler, recommendations_handler, remove_follow_handler, target_group_handler,
    update_privacy_handler, visibility_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

/// HTTP-level settings for [`build_app`].
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Empty allows any origin.
    pub allowed_origins: Vec<String>,
    pub request_timeout: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps, jwt_service: Arc<JwtService>, options: HttpOptions) -> Router {
    let app_state = AppState {
        deps: Arc::new(deps),
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin(&options.allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .route(
            "/follows/:username",
            get(follow_exists_handler)
                .post(create_follow_handler)
                .delete(remove_follow_handler),
        )
        .route("/following/:username", get(following_handler))
        .route("/following/:username/count", get(following_count_handler))
        .route("/followers/:username", get(followers_handler))
        .route("/followers/:username/count", get(followers_count_handler))
        .route("/follow-requests", get(follow_requests_handler))
        .route(
            "/follow-requests/:username",
            get(follow_request_exists_handler).patch(decide_follow_request_handler),
        )
        .route("/recommendations", get(recommendations_handler))
        .route("/internal/target-group", post(target_group_handler))
        .route("/internal/visibility/:username", get(visibility_handler))
        .route("/internal/users/me", patch(update_privacy_handler))
        .route("/internal/followers", get(my_followers_handler))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }))
        .layer(Extension(app_state))
        .layer(TimeoutLayer::new(options.request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn allow_origin(origins: &[String]) -> AllowOrigin {
    if origins.is_empty() {
        return AllowOrigin::any();
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    AllowOrigin::list(parsed)
}
