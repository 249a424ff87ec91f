//! Visibility rule shared with the other services.

use tracing::debug;

use crate::domains::social_graph::error::{SocialGraphError, SocialGraphResult};
use crate::domains::social_graph::models::EdgeKind;
use crate::kernel::ServerDeps;

/// Whether `viewer` may see `owner`'s posts and profile.
///
/// Owners always see themselves; public owners are visible to everyone;
/// private owners only to approved followers. Never cached, since approvals
/// and removals change the answer at any time.
pub async fn can_access(viewer: &str, owner: &str, deps: &ServerDeps) -> SocialGraphResult<bool> {
    if viewer == owner {
        return Ok(true);
    }

    let owner_user = deps
        .graph
        .get_user(owner)
        .await?
        .ok_or_else(|| SocialGraphError::NotFound(owner.to_string()))?;

    if !owner_user.is_private {
        return Ok(true);
    }

    let visible = deps
        .graph
        .edge_exists(EdgeKind::Approved, viewer, owner)
        .await?;
    debug!(viewer = %viewer, owner = %owner, visible, "Private profile access checked");
    Ok(visible)
}
