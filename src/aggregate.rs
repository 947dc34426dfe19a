//! Fan-out/fan-in aggregation.
//!
//! [`Aggregator::aggregate`] fetches from all three sources concurrently,
//! waits for every one of them, concatenates the results in platform order
//! and shuffles the combined list.
//!
//! The join is all-or-nothing: if any enabled source fails, the whole
//! aggregation fails and the items already fetched by the other sources are
//! dropped.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::client::ProviderError;
use crate::config::SocialConfig;
use crate::source::{
    DataSource, FacebookSource, FeedItem, InstagramSource, Platform, TwitterSource,
};

/// The shuffled feed produced by one aggregation.
pub type AggregationResult = Vec<FeedItem>;

#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("{platform} fetch failed: {source}")]
    Source {
        platform: Platform,
        source: ProviderError,
    },
}

impl AggregationError {
    pub fn platform(&self) -> Platform {
        match self {
            AggregationError::Source { platform, .. } => *platform,
        }
    }
}

/// Owns one source per platform.  Holds no state between calls.
pub struct Aggregator {
    twitter: TwitterSource,
    instagram: InstagramSource,
    facebook: FacebookSource,
}

impl Aggregator {
    pub fn new(twitter: TwitterSource, instagram: InstagramSource, facebook: FacebookSource) -> Self {
        Self {
            twitter,
            instagram,
            facebook,
        }
    }

    /// Fetch, join and shuffle with a freshly seeded RNG.
    pub async fn aggregate(&self, config: &SocialConfig) -> Result<AggregationResult, AggregationError> {
        let mut rng = StdRng::from_rng(&mut rand::rng());
        self.aggregate_with_rng(config, &mut rng).await
    }

    /// Same as [`aggregate`](Self::aggregate) with a caller-supplied RNG.
    pub async fn aggregate_with_rng<R: Rng + Send + ?Sized>(
        &self,
        config: &SocialConfig,
        rng: &mut R,
    ) -> Result<AggregationResult, AggregationError> {
        let mut items = self.fetch_all(config).await?;
        shuffle(&mut items, rng);
        Ok(items)
    }

    /// Issue all three fetches at once and concatenate in platform order.
    async fn fetch_all(&self, config: &SocialConfig) -> Result<Vec<FeedItem>, AggregationError> {
        let (tweets, photos, posts) = tokio::try_join!(
            fetch_from(&self.twitter, config),
            fetch_from(&self.instagram, config),
            fetch_from(&self.facebook, config),
        )?;

        let mut items = Vec::with_capacity(tweets.len() + photos.len() + posts.len());
        items.extend(tweets);
        items.extend(photos);
        items.extend(posts);

        tracing::debug!(total = items.len(), "Joined source results");
        Ok(items)
    }
}

async fn fetch_from(
    source: &dyn DataSource,
    config: &SocialConfig,
) -> Result<Vec<FeedItem>, AggregationError> {
    let platform = source.platform();
    source
        .fetch(config.source(platform))
        .await
        .map_err(|source| {
            tracing::warn!(%platform, error = %source, "Source fetch failed");
            AggregationError::Source { platform, source }
        })
}

/// Fisher–Yates: uniform in-place permutation of `items`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
