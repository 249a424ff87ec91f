//! Service-to-service endpoints used by the feed service and the gateway.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};

use crate::common::auth::AuthenticatedPrincipal;
use crate::domains::social_graph::activities;
use crate::domains::social_graph::data::{
    FollowerNamesResponse, PrivacyUpdate, VisibilityResponse,
};
use crate::domains::social_graph::models::{TargetGroupFilter, User};
use crate::domains::social_graph::SocialGraphResult;
use crate::server::app::AppState;

pub async fn visibility_handler(
    Extension(state): Extension<AppState>,
    principal: AuthenticatedPrincipal,
    Path(owner): Path<String>,
) -> SocialGraphResult<Json<VisibilityResponse>> {
    let visible = activities::can_access(&principal.username, &owner, &state.deps).await?;
    Ok(Json(VisibilityResponse { visible }))
}

pub async fn my_followers_handler(
    Extension(state): Extension<AppState>,
    principal: AuthenticatedPrincipal,
) -> SocialGraphResult<Json<FollowerNamesResponse>> {
    let usernames = activities::get_followers(&principal.username, &state.deps)
        .await?
        .into_iter()
        .map(|user| user.username)
        .collect();
    Ok(Json(FollowerNamesResponse { usernames }))
}

pub async fn update_privacy_handler(
    Extension(state): Extension<AppState>,
    principal: AuthenticatedPrincipal,
    Json(update): Json<PrivacyUpdate>,
) -> SocialGraphResult<StatusCode> {
    activities::update_privacy(&principal.username, update.private, &state.deps).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn target_group_handler(
    Extension(state): Extension<AppState>,
    principal: AuthenticatedPrincipal,
    Json(filter): Json<TargetGroupFilter>,
) -> SocialGraphResult<Json<Vec<User>>> {
    Ok(Json(
        activities::get_target_group_users(&principal, filter, &state.deps).await?,
    ))
}
