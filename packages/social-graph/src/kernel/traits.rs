// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The follow protocol, access rules and recommendation policy live in
// domains/social_graph/activities and only talk to these traits.
//
// Naming convention: Base* for trait names (e.g., BaseGraphStore)

use anyhow::Result;
use async_trait::async_trait;

use crate::domains::social_graph::models::{Direction, EdgeKind, TargetGroupFilter, User};

// =============================================================================
// Graph Store Trait (Infrastructure - directed follow graph)
// =============================================================================

/// Directed graph of users keyed by username with typed follow edges.
///
/// Every mutation is a single atomic store call. Implementations must keep at
/// most one edge per ordered pair and must never store a self-edge.
#[async_trait]
pub trait BaseGraphStore: Send + Sync {
    /// Create the user or overwrite its attributes (idempotent merge).
    async fn upsert_user(&self, user: &User) -> Result<()>;

    async fn get_user(&self, username: &str) -> Result<Option<User>>;

    /// Set the privacy flag. Returns `false` when the user does not exist.
    async fn set_privacy(&self, username: &str, is_private: bool) -> Result<bool>;

    /// Remove the user together with every edge touching it.
    /// Returns `false` when there was nothing to remove.
    async fn delete_user(&self, username: &str) -> Result<bool>;

    /// Merge an edge, materializing a minimal `from` node if needed.
    ///
    /// `Requested` is a no-op when any edge already exists for the pair.
    /// `Approved` inserts, or upgrades an existing `Requested` edge.
    async fn upsert_edge(&self, kind: EdgeKind, from: &str, to: &str) -> Result<()>;

    /// Atomically turn a `Requested` edge into `Approved`.
    /// Returns `false` when no request existed.
    async fn promote_request(&self, from: &str, to: &str) -> Result<bool>;

    /// Delete the edge if it exists with the given kind.
    async fn delete_edge(&self, kind: EdgeKind, from: &str, to: &str) -> Result<bool>;

    async fn edge_exists(&self, kind: EdgeKind, from: &str, to: &str) -> Result<bool>;

    async fn neighbors(
        &self,
        direction: Direction,
        kind: EdgeKind,
        username: &str,
    ) -> Result<Vec<User>>;

    /// Users reached by exactly two approved hops, minus `username` itself and
    /// its direct follows. Ordered by username.
    async fn two_hop_reachable(&self, username: &str, limit: usize) -> Result<Vec<User>>;

    /// Users neither followed nor requested by `username`, minus itself.
    async fn users_excluding(&self, username: &str, limit: usize) -> Result<Vec<User>>;

    /// Users matching the demographic filter (ages relative to
    /// `current_year`), minus `username` and anyone already following it.
    async fn users_matching(
        &self,
        filter: &TargetGroupFilter,
        current_year: i32,
        username: &str,
    ) -> Result<Vec<User>>;

    /// Cheap connectivity probe for health checks.
    async fn ping(&self) -> Result<()>;
}

// =============================================================================
// Feed Notifier Trait (Infrastructure - tweet feed service)
// =============================================================================

/// Asks the feed service to refresh the cached feed of `auth_username`
/// against `username` after a follow between them becomes active.
#[async_trait]
pub trait BaseFeedNotifier: Send + Sync {
    async fn update_feed(&self, auth_username: &str, username: &str) -> Result<()>;
}
