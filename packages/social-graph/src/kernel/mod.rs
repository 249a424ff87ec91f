//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod feed_client;
pub mod nats;
pub mod postgres_graph_store;
pub mod test_dependencies;
pub mod traits;

pub use deps::{ServerDeps, DEFAULT_TWO_HOP_LIMIT};
pub use feed_client::HttpFeedNotifier;
pub use nats::{
    headers_from_message, MessageHeaders, NatsClientPublisher, NatsPublisher, PublishedMessage,
    TestNats,
};
pub use postgres_graph_store::PostgresGraphStore;
pub use test_dependencies::{InMemoryGraphStore, MockFeedNotifier, TestDependencies};
pub use traits::*;
