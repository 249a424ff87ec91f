//! Follow request/approval protocol.

mod common;

use crate::common::*;
use social_graph_core::domains::social_graph::activities::{
    accept_reject_follow_request, check_if_follow_exists, check_if_follow_request_exists,
    count_followers, count_following, create_follow, get_all_follow_requests, get_followers,
    get_following, remove_follow,
};
use social_graph_core::domains::social_graph::models::FollowState;
use social_graph_core::domains::social_graph::SocialGraphError;
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn public_follow_is_immediately_approved(ctx: &TestHarness) {
    ctx.seed([user("alice"), user("carol")]).await;
    let deps = ctx.server_deps();

    create_follow("alice", "carol", &deps).await.unwrap();

    assert!(check_if_follow_exists("alice", "carol", &deps).await.unwrap());
    assert!(!check_if_follow_request_exists("alice", "carol", &deps).await.unwrap());
    assert_eq!(
        ctx.deps.feed.wait_for_calls(1).await,
        vec![("alice".to_string(), "carol".to_string())]
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn private_follow_waits_for_approval(ctx: &TestHarness) {
    ctx.seed([user("alice"), private_user("bob")]).await;
    let deps = ctx.server_deps();

    create_follow("alice", "bob", &deps).await.unwrap();
    assert!(check_if_follow_request_exists("alice", "bob", &deps).await.unwrap());
    assert!(!check_if_follow_exists("alice", "bob", &deps).await.unwrap());
    assert!(ctx.deps.feed.calls().is_empty());

    accept_reject_follow_request("alice", "bob", true, &deps)
        .await
        .unwrap();
    assert!(!check_if_follow_request_exists("alice", "bob", &deps).await.unwrap());
    assert!(check_if_follow_exists("alice", "bob", &deps).await.unwrap());
    assert_eq!(
        ctx.deps.feed.wait_for_calls(1).await,
        vec![("bob".to_string(), "alice".to_string())]
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn alice_and_bob_round_trip(ctx: &TestHarness) {
    ctx.seed([user("alice"), private_user("bob")]).await;
    let deps = ctx.server_deps();

    create_follow("alice", "bob", &deps).await.unwrap();
    assert_eq!(ctx.deps.graph.state_of("alice", "bob"), FollowState::Requested);
    assert_eq!(
        usernames(&get_all_follow_requests("bob", &deps).await.unwrap()),
        vec!["alice"]
    );

    accept_reject_follow_request("alice", "bob", true, &deps)
        .await
        .unwrap();
    assert!(check_if_follow_exists("alice", "bob", &deps).await.unwrap());
    assert_eq!(usernames(&get_followers("bob", &deps).await.unwrap()), vec!["alice"]);
    assert_eq!(usernames(&get_following("alice", &deps).await.unwrap()), vec!["bob"]);

    remove_follow("alice", "bob", &deps).await.unwrap();
    assert_eq!(ctx.deps.graph.state_of("alice", "bob"), FollowState::None);
    assert_eq!(count_followers("bob", &deps).await.unwrap(), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn repeated_follow_is_idempotent(ctx: &TestHarness) {
    ctx.seed([user("alice"), user("carol")]).await;
    let deps = ctx.server_deps();

    create_follow("alice", "carol", &deps).await.unwrap();
    create_follow("alice", "carol", &deps).await.unwrap();

    assert_eq!(ctx.deps.graph.edge_count(), 1);
    assert_eq!(count_following("alice", &deps).await.unwrap(), 1);
    assert_eq!(count_followers("carol", &deps).await.unwrap(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn repeated_request_keeps_single_pending_edge(ctx: &TestHarness) {
    ctx.seed([user("alice"), private_user("bob")]).await;
    let deps = ctx.server_deps();

    create_follow("alice", "bob", &deps).await.unwrap();
    create_follow("alice", "bob", &deps).await.unwrap();

    assert_eq!(ctx.deps.graph.edge_count(), 1);
    assert_eq!(ctx.deps.graph.state_of("alice", "bob"), FollowState::Requested);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn follow_after_going_public_promotes_pending_request(ctx: &TestHarness) {
    ctx.seed([user("alice"), private_user("bob")]).await;
    let deps = ctx.server_deps();
    create_follow("alice", "bob", &deps).await.unwrap();

    social_graph_core::domains::social_graph::activities::update_privacy("bob", false, &deps)
        .await
        .unwrap();
    create_follow("alice", "bob", &deps).await.unwrap();

    assert_eq!(ctx.deps.graph.state_of("alice", "bob"), FollowState::Approved);
    assert_eq!(ctx.deps.graph.edge_count(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn deciding_a_missing_request_is_a_no_op(ctx: &TestHarness) {
    ctx.seed([user("alice"), private_user("bob")]).await;
    let deps = ctx.server_deps();

    accept_reject_follow_request("alice", "bob", true, &deps)
        .await
        .unwrap();
    accept_reject_follow_request("alice", "bob", false, &deps)
        .await
        .unwrap();

    assert_eq!(ctx.deps.graph.state_of("alice", "bob"), FollowState::None);
    assert!(ctx.deps.feed.calls().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn second_accept_does_not_notify_again(ctx: &TestHarness) {
    ctx.seed([user("alice"), private_user("bob")]).await;
    let deps = ctx.server_deps();
    create_follow("alice", "bob", &deps).await.unwrap();

    accept_reject_follow_request("alice", "bob", true, &deps)
        .await
        .unwrap();
    accept_reject_follow_request("alice", "bob", true, &deps)
        .await
        .unwrap();

    // Waiting for a second call times out with only the first one recorded.
    assert_eq!(ctx.deps.feed.wait_for_calls(2).await.len(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn rejecting_does_not_touch_an_approved_follow(ctx: &TestHarness) {
    ctx.seed([user("alice"), user("carol")]).await;
    let deps = ctx.server_deps();
    create_follow("alice", "carol", &deps).await.unwrap();

    accept_reject_follow_request("alice", "carol", false, &deps)
        .await
        .unwrap();

    assert_eq!(ctx.deps.graph.state_of("alice", "carol"), FollowState::Approved);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn self_follow_is_invalid(ctx: &TestHarness) {
    ctx.seed([user("alice"), private_user("bob")]).await;
    let deps = ctx.server_deps();

    for name in ["alice", "bob", "unknown"] {
        let err = create_follow(name, name, &deps).await.unwrap_err();
        assert!(matches!(err, SocialGraphError::InvalidOperation(_)));
    }
    assert_eq!(ctx.deps.graph.edge_count(), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unregistered_follower_is_materialized(ctx: &TestHarness) {
    ctx.seed([user("carol")]).await;
    let deps = ctx.server_deps();

    create_follow("newcomer", "carol", &deps).await.unwrap();

    assert_eq!(ctx.deps.graph.user_count(), 2);
    assert_eq!(usernames(&get_followers("carol", &deps).await.unwrap()), vec!["newcomer"]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn feed_outage_keeps_the_follow(ctx: &TestHarness) {
    ctx.seed([user("alice"), private_user("bob")]).await;
    ctx.deps.feed.set_failing(true);
    let deps = ctx.server_deps();

    create_follow("alice", "bob", &deps).await.unwrap();
    accept_reject_follow_request("alice", "bob", true, &deps)
        .await
        .unwrap();

    assert!(check_if_follow_exists("alice", "bob", &deps).await.unwrap());
    ctx.deps.feed.wait_for_calls(1).await;
    assert!(ctx.deps.feed.was_notified("bob", "alice"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn store_outage_surfaces_as_dependency_unavailable(ctx: &TestHarness) {
    ctx.seed([user("alice"), user("carol")]).await;
    ctx.deps.graph.set_fail_writes(true);

    let err = create_follow("alice", "carol", &ctx.server_deps())
        .await
        .unwrap_err();

    assert!(matches!(err, SocialGraphError::DependencyUnavailable(_)));
    assert!(ctx.deps.feed.calls().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn empty_reads_return_empty_lists(ctx: &TestHarness) {
    let deps = ctx.server_deps();

    assert!(get_following("nobody", &deps).await.unwrap().is_empty());
    assert!(get_followers("nobody", &deps).await.unwrap().is_empty());
    assert!(get_all_follow_requests("nobody", &deps).await.unwrap().is_empty());
    assert_eq!(count_following("nobody", &deps).await.unwrap(), 0);
}
