//! Server dependencies (using traits for testability)
//!
//! `ServerDeps` is built once at startup and handed to every HTTP handler and
//! saga task by `Arc`. It owns no mutable state of its own; the store and the
//! bus enforce their own atomicity.

use std::sync::Arc;

use crate::kernel::{BaseFeedNotifier, BaseGraphStore, NatsPublisher};

/// Upper bound on two-hop recommendations when none is configured.
pub const DEFAULT_TWO_HOP_LIMIT: usize = 50;

#[derive(Clone)]
pub struct ServerDeps {
    pub graph: Arc<dyn BaseGraphStore>,
    pub feed_notifier: Arc<dyn BaseFeedNotifier>,
    pub nats: Arc<dyn NatsPublisher>,
    /// Cap applied to the two-hop recommendation query.
    pub two_hop_limit: usize,
}

impl ServerDeps {
    pub fn new(
        graph: Arc<dyn BaseGraphStore>,
        feed_notifier: Arc<dyn BaseFeedNotifier>,
        nats: Arc<dyn NatsPublisher>,
    ) -> Self {
        Self {
            graph,
            feed_notifier,
            nats,
            two_hop_limit: DEFAULT_TWO_HOP_LIMIT,
        }
    }

    pub fn with_two_hop_limit(mut self, limit: usize) -> Self {
        self.two_hop_limit = limit;
        self
    }
}
