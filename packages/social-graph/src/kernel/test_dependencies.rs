// TestDependencies - in-memory implementations for testing
//
// Provides fakes that honor the same contracts as the production adapters so
// domain activities can be exercised without Postgres, NATS or the feed
// service.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use super::{BaseFeedNotifier, BaseGraphStore, ServerDeps, TestNats};
use crate::domains::social_graph::models::{
    Direction, EdgeKind, FollowState, TargetGroupFilter, User,
};

// =============================================================================
// In-memory Graph Store
// =============================================================================

#[derive(Default)]
struct GraphState {
    // BTreeMap keeps "store order" stable: ascending username.
    users: BTreeMap<String, User>,
    edges: HashMap<(String, String), EdgeKind>,
}

impl GraphState {
    fn edge(&self, from: &str, to: &str) -> Option<EdgeKind> {
        self.edges
            .get(&(from.to_string(), to.to_string()))
            .copied()
    }

    fn approved_targets(&self, from: &str) -> BTreeSet<String> {
        self.edges
            .iter()
            .filter(|((f, _), kind)| f == from && **kind == EdgeKind::Approved)
            .map(|((_, t), _)| t.clone())
            .collect()
    }

    fn users_named<'a>(&self, names: impl IntoIterator<Item = &'a String>) -> Vec<User> {
        names
            .into_iter()
            .filter_map(|name| self.users.get(name).cloned())
            .collect()
    }
}

/// Graph store backed by process memory.
///
/// Failure injection lets tests exercise the `DependencyUnavailable` paths.
#[derive(Default)]
pub struct InMemoryGraphStore {
    state: RwLock<GraphState>,
    fail_reads: RwLock<bool>,
    fail_writes: RwLock<bool>,
    user_write_latency: RwLock<Option<Duration>>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed users (builder style).
    pub fn with_users(self, users: impl IntoIterator<Item = User>) -> Self {
        {
            let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
            for user in users {
                state.users.insert(user.username.clone(), user);
            }
        }
        self
    }

    /// Make every subsequent read fail.
    pub fn set_fail_reads(&self, fail: bool) {
        *self.fail_reads.write().unwrap_or_else(|e| e.into_inner()) = fail;
    }

    /// Make every subsequent write fail.
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.write().unwrap_or_else(|e| e.into_inner()) = fail;
    }

    /// Delay every user upsert, to drive caller deadlines.
    pub fn set_user_write_latency(&self, latency: Option<Duration>) {
        *self
            .user_write_latency
            .write()
            .unwrap_or_else(|e| e.into_inner()) = latency;
    }

    /// Current state of the ordered pair.
    pub fn state_of(&self, from: &str, to: &str) -> FollowState {
        self.read_state().edge(from, to).into()
    }

    pub fn user_count(&self) -> usize {
        self.read_state().users.len()
    }

    pub fn edge_count(&self) -> usize {
        self.read_state().edges.len()
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, GraphState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn check_read(&self) -> Result<std::sync::RwLockReadGuard<'_, GraphState>> {
        if *self.fail_reads.read().unwrap_or_else(|e| e.into_inner()) {
            anyhow::bail!("graph store unreachable");
        }
        Ok(self.read_state())
    }

    fn check_write(&self) -> Result<std::sync::RwLockWriteGuard<'_, GraphState>> {
        if *self.fail_writes.read().unwrap_or_else(|e| e.into_inner()) {
            anyhow::bail!("graph store unreachable");
        }
        Ok(self.state.write().unwrap_or_else(|e| e.into_inner()))
    }
}

#[async_trait]
impl BaseGraphStore for InMemoryGraphStore {
    async fn upsert_user(&self, user: &User) -> Result<()> {
        let latency = *self
            .user_write_latency
            .read()
            .unwrap_or_else(|e| e.into_inner());
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        let mut state = self.check_write()?;
        state.users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    async fn get_user(&self, username: &str) -> Result<Option<User>> {
        let state = self.check_read()?;
        Ok(state.users.get(username).cloned())
    }

    async fn set_privacy(&self, username: &str, is_private: bool) -> Result<bool> {
        let mut state = self.check_write()?;
        match state.users.get_mut(username) {
            Some(user) => {
                user.is_private = is_private;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, username: &str) -> Result<bool> {
        let mut state = self.check_write()?;
        state
            .edges
            .retain(|(from, to), _| from != username && to != username);
        Ok(state.users.remove(username).is_some())
    }

    async fn upsert_edge(&self, kind: EdgeKind, from: &str, to: &str) -> Result<()> {
        if from == to {
            anyhow::bail!("self-edge rejected by store: {}", from);
        }
        let mut state = self.check_write()?;
        if !state.users.contains_key(to) {
            anyhow::bail!("edge target {} does not exist", to);
        }
        state
            .users
            .entry(from.to_string())
            .or_insert_with(|| User::minimal(from));

        let key = (from.to_string(), to.to_string());
        match (kind, state.edges.get(&key).copied()) {
            (EdgeKind::Requested, Some(_)) => {}
            (EdgeKind::Approved, _) | (EdgeKind::Requested, None) => {
                state.edges.insert(key, kind);
            }
        }
        Ok(())
    }

    async fn promote_request(&self, from: &str, to: &str) -> Result<bool> {
        let mut state = self.check_write()?;
        match state.edges.get_mut(&(from.to_string(), to.to_string())) {
            Some(kind) if *kind == EdgeKind::Requested => {
                *kind = EdgeKind::Approved;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_edge(&self, kind: EdgeKind, from: &str, to: &str) -> Result<bool> {
        let mut state = self.check_write()?;
        let key = (from.to_string(), to.to_string());
        if state.edges.get(&key) == Some(&kind) {
            state.edges.remove(&key);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn edge_exists(&self, kind: EdgeKind, from: &str, to: &str) -> Result<bool> {
        let state = self.check_read()?;
        Ok(state.edge(from, to) == Some(kind))
    }

    async fn neighbors(
        &self,
        direction: Direction,
        kind: EdgeKind,
        username: &str,
    ) -> Result<Vec<User>> {
        let state = self.check_read()?;
        let names: BTreeSet<String> = state
            .edges
            .iter()
            .filter(|(_, k)| **k == kind)
            .filter_map(|((from, to), _)| match direction {
                Direction::Outgoing if from == username => Some(to.clone()),
                Direction::Incoming if to == username => Some(from.clone()),
                _ => None,
            })
            .collect();
        Ok(state.users_named(&names))
    }

    async fn two_hop_reachable(&self, username: &str, limit: usize) -> Result<Vec<User>> {
        let state = self.check_read()?;
        let direct = state.approved_targets(username);
        let reachable: BTreeSet<String> = direct
            .iter()
            .flat_map(|middle| state.approved_targets(middle))
            .filter(|candidate| candidate != username && !direct.contains(candidate))
            .collect();
        Ok(state
            .users_named(&reachable)
            .into_iter()
            .take(limit)
            .collect())
    }

    async fn users_excluding(&self, username: &str, limit: usize) -> Result<Vec<User>> {
        let state = self.check_read()?;
        Ok(state
            .users
            .values()
            .filter(|u| u.username != username && state.edge(username, &u.username).is_none())
            .take(limit)
            .cloned()
            .collect())
    }

    async fn users_matching(
        &self,
        filter: &TargetGroupFilter,
        current_year: i32,
        username: &str,
    ) -> Result<Vec<User>> {
        let state = self.check_read()?;
        let (born_from, born_to) = filter.birth_year_range(current_year);
        Ok(state
            .users
            .values()
            .filter(|u| u.username != username)
            .filter(|u| filter.town.as_ref().map_or(true, |t| &u.town == t))
            .filter(|u| filter.gender.as_ref().map_or(true, |g| &u.gender == g))
            .filter(|u| u.year_of_birth > 0 && (born_from..=born_to).contains(&u.year_of_birth))
            .filter(|u| state.edge(&u.username, username) != Some(EdgeKind::Approved))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        self.check_read().map(|_| ())
    }
}

// =============================================================================
// Mock Feed Notifier
// =============================================================================

/// Records every feed-warm call; can be told to fail or to stall.
#[derive(Default)]
pub struct MockFeedNotifier {
    calls: Arc<RwLock<Vec<(String, String)>>>,
    failing: RwLock<bool>,
    latency: RwLock<Option<Duration>>,
}

impl MockFeedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.write().unwrap_or_else(|e| e.into_inner()) = failing;
    }

    /// Delay every call after it has been recorded.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.write().unwrap_or_else(|e| e.into_inner()) = latency;
    }

    /// `(auth_username, username)` pairs in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn was_notified(&self, auth_username: &str, username: &str) -> bool {
        self.calls
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .any(|(a, u)| a == auth_username && u == username)
    }

    /// Feed warm-ups run in the background; wait (up to a second) until at
    /// least `count` calls have landed and return them.
    pub async fn wait_for_calls(&self, count: usize) -> Vec<(String, String)> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
        loop {
            let calls = self.calls();
            if calls.len() >= count || tokio::time::Instant::now() >= deadline {
                return calls;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl BaseFeedNotifier for MockFeedNotifier {
    async fn update_feed(&self, auth_username: &str, username: &str) -> Result<()> {
        self.calls
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push((auth_username.to_string(), username.to_string()));

        let latency = *self.latency.read().unwrap_or_else(|e| e.into_inner());
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if *self.failing.read().unwrap_or_else(|e| e.into_inner()) {
            anyhow::bail!("feed service unavailable");
        }
        Ok(())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Bundle of fakes plus the `ServerDeps` wired to them.
pub struct TestDependencies {
    pub graph: Arc<InMemoryGraphStore>,
    pub feed: Arc<MockFeedNotifier>,
    pub nats: Arc<TestNats>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self::with_store(InMemoryGraphStore::new())
    }

    pub fn with_store(store: InMemoryGraphStore) -> Self {
        Self {
            graph: Arc::new(store),
            feed: Arc::new(MockFeedNotifier::new()),
            nats: Arc::new(TestNats::new()),
        }
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(self.graph.clone(), self.feed.clone(), self.nats.clone())
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
