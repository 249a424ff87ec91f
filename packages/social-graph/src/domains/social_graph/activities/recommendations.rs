//! Profile recommendations and demographic audience selection.

use tracing::{debug, info};

use crate::common::auth::AuthenticatedPrincipal;
use crate::domains::social_graph::activities::follows::get_following;
use crate::domains::social_graph::error::{SocialGraphError, SocialGraphResult};
use crate::domains::social_graph::models::{TargetGroupFilter, User};
use crate::kernel::ServerDeps;

/// Cold-start suggestions are capped at this many users.
pub const FALLBACK_LIMIT: usize = 10;

/// Suggest profiles for `username` to follow.
///
/// Users reachable through two approved hops ("followed by someone you
/// follow") come first. When the requester follows nobody, or the two-hop set
/// is empty, fall back to anyone not yet followed or requested.
pub async fn get_recommendations_profile(
    username: &str,
    deps: &ServerDeps,
) -> SocialGraphResult<Vec<User>> {
    let following = get_following(username, deps).await?;

    if !following.is_empty() {
        let two_hop = deps
            .graph
            .two_hop_reachable(username, deps.two_hop_limit)
            .await?;
        if !two_hop.is_empty() {
            debug!(username = %username, count = two_hop.len(), "Two-hop recommendations");
            return Ok(two_hop);
        }
    }

    let mut fallback = deps.graph.users_excluding(username, FALLBACK_LIMIT).await?;
    fallback.truncate(FALLBACK_LIMIT);
    debug!(username = %username, count = fallback.len(), "Fallback recommendations");
    Ok(fallback)
}

/// Users a business account could target: matching demographics, not the
/// requester, and not already following the requester.
///
/// Returns an empty list when nothing matches.
pub async fn get_target_group_users(
    principal: &AuthenticatedPrincipal,
    filter: TargetGroupFilter,
    deps: &ServerDeps,
) -> SocialGraphResult<Vec<User>> {
    if filter.min_age < 0 || filter.min_age > filter.max_age {
        return Err(SocialGraphError::InvalidOperation(format!(
            "invalid age range {}..={}",
            filter.min_age, filter.max_age
        )));
    }

    let filter = filter.normalized();
    let current_year = chrono::Datelike::year(&chrono::Utc::now());

    let users = deps
        .graph
        .users_matching(&filter, current_year, &principal.username)
        .await?;

    info!(
        username = %principal.username,
        town = ?filter.town,
        gender = ?filter.gender,
        min_age = filter.min_age,
        max_age = filter.max_age,
        count = users.len(),
        "Target group resolved"
    );
    Ok(users)
}
