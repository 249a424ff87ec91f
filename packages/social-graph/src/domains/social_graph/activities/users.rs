use tracing::info;

use crate::domains::social_graph::error::{SocialGraphError, SocialGraphResult};
use crate::domains::social_graph::models::User;
use crate::kernel::ServerDeps;

/// Flip the privacy flag of `username`.
///
/// Existing edges are left alone; going private does not demote current
/// followers, it only routes future follows through a request.
pub async fn update_privacy(
    username: &str,
    is_private: bool,
    deps: &ServerDeps,
) -> SocialGraphResult<()> {
    if !deps.graph.set_privacy(username, is_private).await? {
        return Err(SocialGraphError::NotFound(username.to_string()));
    }
    info!(username = %username, private = is_private, "Privacy updated");
    Ok(())
}

pub async fn get_user(username: &str, deps: &ServerDeps) -> SocialGraphResult<User> {
    deps.graph
        .get_user(username)
        .await?
        .ok_or_else(|| SocialGraphError::NotFound(username.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::social_graph::activities::follows::create_follow;
    use crate::domains::social_graph::models::FollowState;
    use crate::kernel::{InMemoryGraphStore, TestDependencies};

    #[tokio::test]
    async fn test_going_private_keeps_existing_followers() {
        let test = TestDependencies::with_store(
            InMemoryGraphStore::new().with_users([User::minimal("alice"), User::minimal("bob")]),
        );
        let server = test.server_deps();
        create_follow("alice", "bob", &server).await.unwrap();

        update_privacy("bob", true, &server).await.unwrap();

        assert!(get_user("bob", &server).await.unwrap().is_private);
        assert_eq!(test.graph.state_of("alice", "bob"), FollowState::Approved);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let test = TestDependencies::new();
        let err = update_privacy("ghost", true, &test.server_deps())
            .await
            .unwrap_err();
        assert!(matches!(err, SocialGraphError::NotFound(_)));
    }
}
