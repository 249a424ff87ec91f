mod common;

use crate::common::*;
use social_graph_core::domains::social_graph::activities::{
    accept_reject_follow_request, can_access, create_follow, remove_follow, update_privacy,
};
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn owner_always_sees_themselves(ctx: &TestHarness) {
    ctx.seed([user("alice"), private_user("bob")]).await;
    let deps = ctx.server_deps();

    assert!(can_access("alice", "alice", &deps).await.unwrap());
    assert!(can_access("bob", "bob", &deps).await.unwrap());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn private_visibility_tracks_the_approved_edge(ctx: &TestHarness) {
    ctx.seed([user("alice"), private_user("bob")]).await;
    let deps = ctx.server_deps();

    create_follow("alice", "bob", &deps).await.unwrap();
    assert!(!can_access("alice", "bob", &deps).await.unwrap());

    accept_reject_follow_request("alice", "bob", true, &deps)
        .await
        .unwrap();
    assert!(can_access("alice", "bob", &deps).await.unwrap());

    remove_follow("alice", "bob", &deps).await.unwrap();
    assert!(!can_access("alice", "bob", &deps).await.unwrap());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn reverse_edge_grants_nothing(ctx: &TestHarness) {
    ctx.seed([private_user("alice"), private_user("bob")]).await;
    let deps = ctx.server_deps();
    create_follow("bob", "alice", &deps).await.unwrap();
    accept_reject_follow_request("bob", "alice", true, &deps)
        .await
        .unwrap();

    assert!(can_access("bob", "alice", &deps).await.unwrap());
    assert!(!can_access("alice", "bob", &deps).await.unwrap());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn privacy_change_applies_immediately(ctx: &TestHarness) {
    ctx.seed([user("alice"), user("carol")]).await;
    let deps = ctx.server_deps();
    assert!(can_access("alice", "carol", &deps).await.unwrap());

    update_privacy("carol", true, &deps).await.unwrap();
    assert!(!can_access("alice", "carol", &deps).await.unwrap());

    update_privacy("carol", false, &deps).await.unwrap();
    assert!(can_access("alice", "carol", &deps).await.unwrap());
}
