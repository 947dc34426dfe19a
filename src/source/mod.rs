//! Data source abstraction layer.
//!
//! This module defines the [`DataSource`] trait and the common [`FeedItem`]
//! type.  There is one source per platform ([`TwitterSource`],
//! [`InstagramSource`], [`FacebookSource`]); each issues a single bounded
//! request through its injected [`ProviderClient`] and maps the raw records
//! into `FeedItem`s.
//!
//! ## For contributors — adding a new platform
//!
//! 1. Add a variant to [`Platform`] and to [`FeedItem`].
//! 2. Create a new file in this directory with a struct implementing
//!    [`DataSource`].  Keep the record mapping in a pure `parse_response`
//!    so it can be tested without a client.
//! 3. Add `mod` + `pub use` lines below and wire the source into
//!    [`crate::aggregate::Aggregator`].

mod facebook;
mod feed_item;
mod instagram;
mod twitter;

pub use facebook::FacebookSource;
pub use feed_item::{FeedItem, Platform};
pub use instagram::InstagramSource;
pub use twitter::TwitterSource;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::client::{ApiParams, ProviderClient, Result};
use crate::config::SourceConfig;

/// Trait that every platform source implements.
///
/// `fetch` must resolve immediately with an empty list when the source is
/// disabled, without touching the client.  Provider errors are returned
/// as-is; the aggregator decides what a failure means for the whole feed.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Platform whose items this source produces.
    fn platform(&self) -> Platform;

    /// Fetch at most `config.max_elements` items.  The bound is sent to the
    /// provider and enforced again on the parsed listing.
    async fn fetch(&self, config: &SourceConfig) -> Result<Vec<FeedItem>>;
}

/// A provider listing: `{"data": [record, ...]}`.
#[derive(Deserialize)]
struct Listing {
    data: Vec<Value>,
}

/// Deserialize the `data` array of a listing response into records.
///
/// A body without a `data` array is a parse error.  Individual records that
/// don't match `T` are skipped.
fn listing_records<T: DeserializeOwned>(body: &Value) -> Result<Vec<T>> {
    let listing = Listing::deserialize(body)?;
    let total = listing.data.len();
    let records: Vec<T> = listing
        .data
        .into_iter()
        .filter_map(|record| serde_json::from_value(record).ok())
        .collect();
    if records.len() < total {
        tracing::warn!(skipped = total - records.len(), "Skipped malformed records");
    }
    Ok(records)
}

/// Cap parsed items at the configured bound.
fn bounded(mut items: Vec<FeedItem>, config: &SourceConfig) -> Vec<FeedItem> {
    items.truncate(config.max_elements as usize);
    items
}

/// Issue the single bounded request for an enabled source.
async fn request_listing(
    client: &dyn ProviderClient,
    endpoint: &str,
    config: &SourceConfig,
) -> Result<Value> {
    client
        .api(endpoint, ApiParams::with_limit(config.max_elements))
        .await
}
