//! Follow workflow - the request/approval protocol for one ordered pair.
//!
//! Per pair `from -> to` the graph holds one of `NONE`, `REQUESTED` or
//! `APPROVED`. Every transition below is a single store call, and every
//! transition is safe to replay.

use tracing::{debug, info, warn, Instrument};

use crate::domains::social_graph::error::{SocialGraphError, SocialGraphResult};
use crate::domains::social_graph::models::{Direction, EdgeKind, User};
use crate::kernel::ServerDeps;

/// Start following `to`.
///
/// This action:
/// 1. Rejects self-follows
/// 2. Looks up the followee's privacy flag
/// 3. Private: records a pending request (no-op if any edge already exists)
/// 4. Public: records an approved follow and warms the follower's feed in the
///    background
pub async fn create_follow(from: &str, to: &str, deps: &ServerDeps) -> SocialGraphResult<()> {
    if from == to {
        return Err(SocialGraphError::InvalidOperation(
            "cannot follow yourself".to_string(),
        ));
    }

    let followee = deps
        .graph
        .get_user(to)
        .await?
        .ok_or_else(|| SocialGraphError::NotFound(to.to_string()))?;

    if followee.is_private {
        deps.graph.upsert_edge(EdgeKind::Requested, from, to).await?;
        info!(from = %from, to = %to, "Follow request recorded");
        return Ok(());
    }

    deps.graph.upsert_edge(EdgeKind::Approved, from, to).await?;
    info!(from = %from, to = %to, "Follow created");

    warm_feed(from, to, deps);
    Ok(())
}

/// Stop following `to`. No-op when there is no approved edge.
pub async fn remove_follow(from: &str, to: &str, deps: &ServerDeps) -> SocialGraphResult<()> {
    let removed = deps.graph.delete_edge(EdgeKind::Approved, from, to).await?;
    if removed {
        info!(from = %from, to = %to, "Follow removed");
    } else {
        debug!(from = %from, to = %to, "No follow to remove");
    }
    Ok(())
}

/// `to` decides on the pending request from `from`.
///
/// Only valid from `REQUESTED`; anything else (including a request that was
/// already handled by an earlier delivery) is a successful no-op. On accept the
/// feed update is issued on behalf of `to`, the accepting party.
pub async fn accept_reject_follow_request(
    from: &str,
    to: &str,
    approved: bool,
    deps: &ServerDeps,
) -> SocialGraphResult<()> {
    if !approved {
        if deps.graph.delete_edge(EdgeKind::Requested, from, to).await? {
            info!(from = %from, to = %to, "Follow request rejected");
        } else {
            debug!(from = %from, to = %to, "No pending request to reject");
        }
        return Ok(());
    }

    if !deps.graph.promote_request(from, to).await? {
        debug!(from = %from, to = %to, "No pending request to accept");
        return Ok(());
    }

    info!(from = %from, to = %to, "Follow request accepted");
    warm_feed(to, from, deps);
    Ok(())
}

pub async fn get_following(username: &str, deps: &ServerDeps) -> SocialGraphResult<Vec<User>> {
    Ok(deps
        .graph
        .neighbors(Direction::Outgoing, EdgeKind::Approved, username)
        .await?)
}

pub async fn get_followers(username: &str, deps: &ServerDeps) -> SocialGraphResult<Vec<User>> {
    Ok(deps
        .graph
        .neighbors(Direction::Incoming, EdgeKind::Approved, username)
        .await?)
}

pub async fn count_following(username: &str, deps: &ServerDeps) -> SocialGraphResult<usize> {
    get_following(username, deps).await.map(|users| users.len())
}

pub async fn count_followers(username: &str, deps: &ServerDeps) -> SocialGraphResult<usize> {
    get_followers(username, deps).await.map(|users| users.len())
}

/// Pending requests addressed to `username`.
pub async fn get_all_follow_requests(
    username: &str,
    deps: &ServerDeps,
) -> SocialGraphResult<Vec<User>> {
    Ok(deps
        .graph
        .neighbors(Direction::Incoming, EdgeKind::Requested, username)
        .await?)
}

pub async fn check_if_follow_exists(
    from: &str,
    to: &str,
    deps: &ServerDeps,
) -> SocialGraphResult<bool> {
    Ok(deps.graph.edge_exists(EdgeKind::Approved, from, to).await?)
}

pub async fn check_if_follow_request_exists(
    from: &str,
    to: &str,
    deps: &ServerDeps,
) -> SocialGraphResult<bool> {
    Ok(deps.graph.edge_exists(EdgeKind::Requested, from, to).await?)
}

/// Best-effort feed warm-up, detached from the caller. The edge is already
/// committed; a slow or failing feed service is only logged and the feed
/// catches up on its next rebuild.
fn warm_feed(auth_username: &str, username: &str, deps: &ServerDeps) {
    let notifier = deps.feed_notifier.clone();
    let auth_username = auth_username.to_string();
    let username = username.to_string();

    tokio::spawn(
        async move {
            if let Err(e) = notifier.update_feed(&auth_username, &username).await {
                warn!(
                    error = %e,
                    auth_username = %auth_username,
                    username = %username,
                    "Failed to notify feed service"
                );
            }
        }
        .in_current_span(),
    );
}
