//! Instagram source: the signed-in user's photos.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{bounded, listing_records, request_listing, DataSource, FeedItem, Platform};
use crate::client::{ProviderClient, Result};
use crate::config::SourceConfig;

pub const ENDPOINT: &str = "me/photos";

#[derive(Deserialize)]
struct RawPhoto {
    thumbnail: Option<String>,
    name: Option<String>,
}

pub struct InstagramSource {
    client: Arc<dyn ProviderClient>,
}

impl InstagramSource {
    pub fn new(client: Arc<dyn ProviderClient>) -> Self {
        Self { client }
    }

    /// Map a `me/photos` listing: `thumbnail` is the image, `name` the caption.
    pub fn parse_response(body: &Value) -> Result<Vec<FeedItem>> {
        let photos: Vec<RawPhoto> = listing_records(body)?;
        Ok(photos
            .into_iter()
            .map(|p| FeedItem::Instagram {
                image: p.thumbnail,
                caption: p.name.filter(|c| !c.is_empty()),
            })
            .collect())
    }
}

#[async_trait]
impl DataSource for InstagramSource {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    async fn fetch(&self, config: &SourceConfig) -> Result<Vec<FeedItem>> {
        if !config.enabled {
            return Ok(Vec::new());
        }

        let body = request_listing(self.client.as_ref(), ENDPOINT, config).await?;
        let items = bounded(Self::parse_response(&body)?, config);
        tracing::info!(platform = "instagram", count = items.len(), "Fetched photos");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeClient;
    use serde_json::json;

    #[test]
    fn parse_response_maps_thumbnail_and_caption() {
        let body = json!({"data": [
            {"thumbnail": "https://img.example/a.jpg", "name": "beach"},
            {"thumbnail": "https://img.example/b.jpg"},
        ]});
        let items = InstagramSource::parse_response(&body).unwrap();

        assert_eq!(
            items[0],
            FeedItem::Instagram {
                image: Some("https://img.example/a.jpg".into()),
                caption: Some("beach".into()),
            }
        );
        assert_eq!(items[1].text(), None);
        assert_eq!(items[1].image(), Some("https://img.example/b.jpg"));
    }

    #[test]
    fn empty_caption_is_dropped() {
        let body = json!({"data": [{"thumbnail": "u", "name": ""}]});
        let items = InstagramSource::parse_response(&body).unwrap();
        assert_eq!(items[0].text(), None);
    }

    #[test]
    fn record_with_wrong_field_type_is_skipped() {
        let body = json!({"data": [{"thumbnail": ["not", "a", "url"]}, {"thumbnail": "u"}]});
        let items = InstagramSource::parse_response(&body).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].image(), Some("u"));
    }

    #[test]
    fn duplicates_are_preserved() {
        let photo = json!({"thumbnail": "u", "name": "same"});
        let body = json!({"data": [photo.clone(), photo]});
        let items = InstagramSource::parse_response(&body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], items[1]);
    }

    #[tokio::test]
    async fn disabled_source_makes_no_call() {
        let client = Arc::new(FakeClient::new(Platform::Instagram));
        let source = InstagramSource::new(client.clone());

        assert!(source.fetch(&SourceConfig::default()).await.unwrap().is_empty());
        assert_eq!(client.api_calls(), 0);
    }

    #[tokio::test]
    async fn enabled_source_hits_photos_endpoint() {
        let client = Arc::new(
            FakeClient::new(Platform::Instagram)
                .with_listing(ENDPOINT, vec![json!({"thumbnail": "u"})]),
        );
        let source = InstagramSource::new(client.clone());

        let items = source.fetch(&SourceConfig::enabled(50)).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(client.api_calls(), 1);
    }
}
