use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};

use crate::common::auth::AuthenticatedPrincipal;
use crate::domains::social_graph::activities;
use crate::domains::social_graph::data::{CountResponse, ExistsResponse, FollowRequestDecision};
use crate::domains::social_graph::models::User;
use crate::domains::social_graph::SocialGraphResult;
use crate::server::app::AppState;

pub async fn create_follow_handler(
    Extension(state): Extension<AppState>,
    principal: AuthenticatedPrincipal,
    Path(username): Path<String>,
) -> SocialGraphResult<StatusCode> {
    activities::create_follow(&principal.username, &username, &state.deps).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_follow_handler(
    Extension(state): Extension<AppState>,
    principal: AuthenticatedPrincipal,
    Path(username): Path<String>,
) -> SocialGraphResult<StatusCode> {
    activities::remove_follow(&principal.username, &username, &state.deps).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Does the caller follow `username`?
pub async fn follow_exists_handler(
    Extension(state): Extension<AppState>,
    principal: AuthenticatedPrincipal,
    Path(username): Path<String>,
) -> SocialGraphResult<Json<ExistsResponse>> {
    let exists =
        activities::check_if_follow_exists(&principal.username, &username, &state.deps).await?;
    Ok(Json(ExistsResponse { exists }))
}

pub async fn following_handler(
    Extension(state): Extension<AppState>,
    _principal: AuthenticatedPrincipal,
    Path(username): Path<String>,
) -> SocialGraphResult<Json<Vec<User>>> {
    Ok(Json(activities::get_following(&username, &state.deps).await?))
}

pub async fn following_count_handler(
    Extension(state): Extension<AppState>,
    _principal: AuthenticatedPrincipal,
    Path(username): Path<String>,
) -> SocialGraphResult<Json<CountResponse>> {
    let count = activities::count_following(&username, &state.deps).await?;
    Ok(Json(CountResponse { count }))
}

pub async fn followers_handler(
    Extension(state): Extension<AppState>,
    _principal: AuthenticatedPrincipal,
    Path(username): Path<String>,
) -> SocialGraphResult<Json<Vec<User>>> {
    Ok(Json(activities::get_followers(&username, &state.deps).await?))
}

pub async fn followers_count_handler(
    Extension(state): Extension<AppState>,
    _principal: AuthenticatedPrincipal,
    Path(username): Path<String>,
) -> SocialGraphResult<Json<CountResponse>> {
    let count = activities::count_followers(&username, &state.deps).await?;
    Ok(Json(CountResponse { count }))
}

/// Pending requests addressed to the caller.
pub async fn follow_requests_handler(
    Extension(state): Extension<AppState>,
    principal: AuthenticatedPrincipal,
) -> SocialGraphResult<Json<Vec<User>>> {
    Ok(Json(
        activities::get_all_follow_requests(&principal.username, &state.deps).await?,
    ))
}

/// Has `username` asked to follow the caller?
pub async fn follow_request_exists_handler(
    Extension(state): Extension<AppState>,
    principal: AuthenticatedPrincipal,
    Path(username): Path<String>,
) -> SocialGraphResult<Json<ExistsResponse>> {
    let exists =
        activities::check_if_follow_request_exists(&username, &principal.username, &state.deps)
            .await?;
    Ok(Json(ExistsResponse { exists }))
}

/// The caller decides on `username`'s request.
pub async fn decide_follow_request_handler(
    Extension(state): Extension<AppState>,
    principal: AuthenticatedPrincipal,
    Path(username): Path<String>,
    Json(decision): Json<FollowRequestDecision>,
) -> SocialGraphResult<StatusCode> {
    activities::accept_reject_follow_request(
        &username,
        &principal.username,
        decision.approved,
        &state.deps,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
