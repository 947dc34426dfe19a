//! Facebook source: posts shared by the signed-in user.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{bounded, listing_records, request_listing, DataSource, FeedItem, Platform};
use crate::client::{ProviderClient, Result};
use crate::config::SourceConfig;

pub const ENDPOINT: &str = "me/share";

#[derive(Deserialize)]
struct RawPost {
    description: Option<String>,
}

pub struct FacebookSource {
    client: Arc<dyn ProviderClient>,
}

impl FacebookSource {
    pub fn new(client: Arc<dyn ProviderClient>) -> Self {
        Self { client }
    }

    /// Map a `me/share` listing; the post text lives in `description`.
    pub fn parse_response(body: &Value) -> Result<Vec<FeedItem>> {
        let posts: Vec<RawPost> = listing_records(body)?;
        Ok(posts
            .into_iter()
            .map(|p| FeedItem::Facebook {
                text: p.description.unwrap_or_default(),
            })
            .collect())
    }
}

#[async_trait]
impl DataSource for FacebookSource {
    fn platform(&self) -> Platform {
        Platform::Facebook
    }

    async fn fetch(&self, config: &SourceConfig) -> Result<Vec<FeedItem>> {
        if !config.enabled {
            return Ok(Vec::new());
        }

        let body = request_listing(self.client.as_ref(), ENDPOINT, config).await?;
        let items = bounded(Self::parse_response(&body)?, config);
        tracing::info!(platform = "facebook", count = items.len(), "Fetched posts");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeClient;
    use crate::client::ProviderError;
    use serde_json::json;

    #[test]
    fn parse_response_uses_description() {
        let body = json!({"data": [{"description": "post", "message": "ignored"}]});
        let items = FacebookSource::parse_response(&body).unwrap();
        assert_eq!(items, vec![FeedItem::Facebook { text: "post".into() }]);
    }

    #[test]
    fn empty_listing_is_fine() {
        let items = FacebookSource::parse_response(&json!({"data": []})).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn non_array_data_is_a_parse_error() {
        let err = FacebookSource::parse_response(&json!({"data": "nope"})).unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }

    #[tokio::test]
    async fn disabled_source_makes_no_call() {
        let client = Arc::new(FakeClient::new(Platform::Facebook));
        let source = FacebookSource::new(client.clone());

        assert!(source.fetch(&SourceConfig::default()).await.unwrap().is_empty());
        assert_eq!(client.api_calls(), 0);
    }

    #[tokio::test]
    async fn malformed_response_fails_fetch() {
        let client = Arc::new(
            FakeClient::new(Platform::Facebook).with_response(ENDPOINT, json!({"oops": true})),
        );
        let source = FacebookSource::new(client);

        let err = source.fetch(&SourceConfig::enabled(1)).await.unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }
}
