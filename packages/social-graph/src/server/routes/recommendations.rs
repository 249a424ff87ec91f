use axum::{extract::Extension, Json};

use crate::common::auth::AuthenticatedPrincipal;
use crate::domains::social_graph::activities;
use crate::domains::social_graph::models::User;
use crate::domains::social_graph::SocialGraphResult;
use crate::server::app::AppState;

pub async fn recommendations_handler(
    Extension(state): Extension<AppState>,
    principal: AuthenticatedPrincipal,
) -> SocialGraphResult<Json<Vec<User>>> {
    Ok(Json(
        activities::get_recommendations_profile(&principal.username, &state.deps).await?,
    ))
}
