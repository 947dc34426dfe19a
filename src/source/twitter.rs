//! Twitter source implementation.
//!
//! This module shows how to implement [`DataSource`] for a platform.  Use it
//! as a template when adding another provider: keep the client call in
//! `fetch()` and the field mapping in a pure `parse_response()`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{bounded, listing_records, request_listing, DataSource, FeedItem, Platform};
use crate::client::{ProviderClient, Result};
use crate::config::SourceConfig;

/// Endpoint listing the user's own tweets.
pub const ENDPOINT: &str = "me/share";

#[derive(Deserialize)]
struct RawTweet {
    text: Option<String>,
}

/// Tweets from the signed-in account.
pub struct TwitterSource {
    client: Arc<dyn ProviderClient>,
}

impl TwitterSource {
    pub fn new(client: Arc<dyn ProviderClient>) -> Self {
        Self { client }
    }

    /// Map a `me/share` listing into [`FeedItem`]s.
    ///
    /// Pure (no I/O) so tests can exercise the mapping without a client.
    pub fn parse_response(body: &Value) -> Result<Vec<FeedItem>> {
        let tweets: Vec<RawTweet> = listing_records(body)?;
        Ok(tweets
            .into_iter()
            .map(|t| FeedItem::Twitter {
                text: t.text.unwrap_or_default(),
            })
            .collect())
    }
}

#[async_trait]
impl DataSource for TwitterSource {
    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    async fn fetch(&self, config: &SourceConfig) -> Result<Vec<FeedItem>> {
        if !config.enabled {
            return Ok(Vec::new());
        }

        let body = request_listing(self.client.as_ref(), ENDPOINT, config).await?;
        let items = bounded(Self::parse_response(&body)?, config);
        tracing::info!(platform = "twitter", count = items.len(), "Fetched tweets");
        Ok(items)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
