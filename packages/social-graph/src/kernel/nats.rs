//! NATS client abstraction for production and testing.
//!
//! Provides a trait-based NATS implementation that allows swapping between
//! real NATS connections and test mocks. Headers travel with every message so
//! trace correlation survives the hop to the saga coordinator.

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Header name/value pairs attached to a message.
pub type MessageHeaders = BTreeMap<String, String>;

/// A published message.
#[derive(Debug, Clone)]
pub struct PublishedMessage {
    pub subject: String,
    pub headers: MessageHeaders,
    pub payload: Bytes,
}

/// Trait for NATS publish operations.
///
/// This allows swapping between real NATS and test mocks.
#[async_trait]
pub trait NatsPublisher: Send + Sync {
    /// Publish a message with headers to a subject.
    async fn publish(&self, subject: String, headers: MessageHeaders, payload: Bytes)
        -> Result<()>;
}

/// Real NATS client publisher.
pub struct NatsClientPublisher {
    client: async_nats::Client,
}

impl NatsClientPublisher {
    pub fn new(client: async_nats::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NatsPublisher for NatsClientPublisher {
    async fn publish(
        &self,
        subject: String,
        headers: MessageHeaders,
        payload: Bytes,
    ) -> Result<()> {
        let mut header_map = async_nats::HeaderMap::new();
        for (name, value) in &headers {
            header_map.insert(name.as_str(), value.as_str());
        }
        self.client
            .publish_with_headers(subject, header_map, payload)
            .await?;
        Ok(())
    }
}

/// Copy the headers of an inbound NATS message into a plain map.
pub fn headers_from_message(message: &async_nats::Message) -> MessageHeaders {
    let mut headers = MessageHeaders::new();
    if let Some(map) = &message.headers {
        for (name, values) in map.iter() {
            if let Some(value) = values.first() {
                headers.insert(name.to_string(), value.as_str().to_string());
            }
        }
    }
    headers
}

/// Mock NATS client that tracks published messages for testing.
///
/// This allows tests to inspect what messages would have been published
/// to NATS without requiring a real connection.
#[derive(Default)]
pub struct TestNats {
    /// Messages published to subjects.
    published: RwLock<Vec<PublishedMessage>>,
    /// When set, every publish fails as if the bus were down.
    unavailable: RwLock<bool>,
}

impl TestNats {
    /// Create a new test NATS client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the bus going away (or coming back).
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().unwrap_or_else(|e| e.into_inner()) = unavailable;
    }

    /// Record a published message.
    pub fn record_publish(&self, subject: String, headers: MessageHeaders, payload: Bytes) {
        self.published
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(PublishedMessage {
                subject,
                headers,
                payload,
            });
    }

    /// Get published messages for a specific subject.
    pub fn messages_for_subject(&self, subject: &str) -> Vec<PublishedMessage> {
        self.published
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|m| m.subject == subject)
            .cloned()
            .collect()
    }

    /// Check if any message was published to a subject.
    pub fn was_published_to(&self, subject: &str) -> bool {
        self.published
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .any(|m| m.subject == subject)
    }

    /// Get the count of published messages.
    pub fn publish_count(&self) -> usize {
        self.published
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Clear all recorded messages.
    pub fn clear(&self) {
        self.published
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

#[async_trait]
impl NatsPublisher for TestNats {
    async fn publish(
        &self,
        subject: String,
        headers: MessageHeaders,
        payload: Bytes,
    ) -> Result<()> {
        if *self.unavailable.read().unwrap_or_else(|e| e.into_inner()) {
            anyhow::bail!("nats: no servers available for connection");
        }
        self.record_publish(subject, headers, payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_retrieve_messages() {
        let nats = TestNats::new();

        nats.record_publish(
            "register.reply".to_string(),
            MessageHeaders::new(),
            Bytes::from(r#"{"Reply":3}"#),
        );

        assert_eq!(nats.publish_count(), 1);
        assert!(nats.was_published_to("register.reply"));
        assert!(!nats.was_published_to("register.command"));
    }

    #[tokio::test]
    async fn test_publish_keeps_headers() {
        let nats = TestNats::new();
        let mut headers = MessageHeaders::new();
        headers.insert("trace-id".to_string(), "abc".to_string());

        nats.publish("register.reply".to_string(), headers, Bytes::new())
            .await
            .unwrap();

        let sent = nats.messages_for_subject("register.reply");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].headers.get("trace-id").map(String::as_str), Some("abc"));
    }

    #[tokio::test]
    async fn test_unavailable_bus_rejects_publish() {
        let nats = TestNats::new();
        nats.set_unavailable(true);

        let result = nats
            .publish("register.reply".to_string(), MessageHeaders::new(), Bytes::new())
            .await;

        assert!(result.is_err());
        assert_eq!(nats.publish_count(), 0);

        nats.set_unavailable(false);
        nats.clear();
        assert_eq!(nats.publish_count(), 0);
    }
}
