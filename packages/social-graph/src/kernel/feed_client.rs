//! HTTP client for the tweet feed service.
//!
//! When a follow becomes active the feed service is asked to rebuild the
//! acting user's cached feed against the other side of the edge.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::BaseFeedNotifier;

/// Header carrying the username on whose behalf the feed is updated.
pub const AUTH_USERNAME_HEADER: &str = "X-Auth-Username";

#[derive(Debug, Serialize)]
struct UpdateFeedRequest<'a> {
    username: &'a str,
}

pub struct HttpFeedNotifier {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFeedNotifier {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build feed service HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn update_feed_url(&self) -> String {
        format!("{}/feed/update", self.base_url)
    }
}

#[async_trait]
impl BaseFeedNotifier for HttpFeedNotifier {
    async fn update_feed(&self, auth_username: &str, username: &str) -> Result<()> {
        let url = self.update_feed_url();
        debug!(auth_username = %auth_username, username = %username, url = %url, "Warming feed");

        self.client
            .post(&url)
            .header(AUTH_USERNAME_HEADER, auth_username)
            .json(&UpdateFeedRequest { username })
            .send()
            .await
            .with_context(|| format!("Feed service unreachable at {}", url))?
            .error_for_status()
            .context("Feed service rejected update")?;

        Ok(())
    }
}
