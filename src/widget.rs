//! The widget instance: configuration, per-platform clients and the
//! aggregator, bundled behind two operations.
//!
//! * [`SocialWidget::connect`] logs in to every enabled platform and reports
//!   who is signed in (or why not).
//! * [`SocialWidget::fetch`] runs one aggregation.
//!
//! Each widget owns its state; there is no registry and no global client.

use std::sync::Arc;

use crate::aggregate::{AggregationError, AggregationResult, Aggregator};
use crate::client::{ApiParams, HttpProviderClient, ProviderClient, ProviderError, Profile};
use crate::config::SocialConfig;
use crate::source::{FacebookSource, InstagramSource, Platform, TwitterSource};

/// One provider client per platform.
#[derive(Clone)]
pub struct Clients {
    pub twitter: Arc<dyn ProviderClient>,
    pub instagram: Arc<dyn ProviderClient>,
    pub facebook: Arc<dyn ProviderClient>,
}

impl Clients {
    /// Build HTTP clients against the configured proxy, one per platform,
    /// each carrying that platform's key.
    pub fn http(config: &SocialConfig) -> Result<Self, ProviderError> {
        let build = |platform: Platform| -> Result<Arc<dyn ProviderClient>, ProviderError> {
            let client = HttpProviderClient::new(
                platform,
                config.proxy.base_url.clone(),
                config.source(platform).key.clone(),
                config.proxy.timeout(),
            )?;
            Ok(Arc::new(client))
        };

        Ok(Self {
            twitter: build(Platform::Twitter)?,
            instagram: build(Platform::Instagram)?,
            facebook: build(Platform::Facebook)?,
        })
    }

    pub fn get(&self, platform: Platform) -> &Arc<dyn ProviderClient> {
        match platform {
            Platform::Twitter => &self.twitter,
            Platform::Instagram => &self.instagram,
            Platform::Facebook => &self.facebook,
        }
    }
}

/// Connection state of one platform, as shown in the status table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    NotConnected,
    Connected {
        name: String,
        thumbnail: Option<String>,
    },
    /// The provider's error message.
    Failed(String),
}

impl ConnectionStatus {
    /// Text for the status cell of `platform`.
    pub fn describe(&self, platform: Platform) -> String {
        match self {
            ConnectionStatus::NotConnected => "Not connected".to_string(),
            ConnectionStatus::Connected { name, .. } => {
                format!("Connected to {platform} as {name}")
            }
            ConnectionStatus::Failed(message) => message.clone(),
        }
    }
}

/// The provider's own message when it sent one, otherwise the error text.
fn status_message(error: ProviderError) -> String {
    match error {
        ProviderError::Api { message, .. } => message,
        other => other.to_string(),
    }
}

pub struct SocialWidget {
    config: SocialConfig,
    clients: Clients,
    aggregator: Aggregator,
}

impl SocialWidget {
    pub fn new(config: SocialConfig, clients: Clients) -> Self {
        let aggregator = Aggregator::new(
            TwitterSource::new(clients.twitter.clone()),
            InstagramSource::new(clients.instagram.clone()),
            FacebookSource::new(clients.facebook.clone()),
        );
        Self {
            config,
            clients,
            aggregator,
        }
    }

    /// False when no platform is enabled; such a widget shows nothing.
    pub fn is_active(&self) -> bool {
        self.config.any_enabled()
    }

    pub fn enabled_platforms(&self) -> Vec<Platform> {
        self.config.enabled_platforms()
    }

    /// Log in to every enabled platform concurrently.
    ///
    /// Platforms are independent here: a failed login only affects that
    /// platform's status.  Results come back in platform order.
    pub async fn connect(&self) -> Vec<(Platform, ConnectionStatus)> {
        let (twitter, instagram, facebook) = tokio::join!(
            self.connect_enabled(Platform::Twitter),
            self.connect_enabled(Platform::Instagram),
            self.connect_enabled(Platform::Facebook),
        );
        [twitter, instagram, facebook].into_iter().flatten().collect()
    }

    async fn connect_enabled(&self, platform: Platform) -> Option<(Platform, ConnectionStatus)> {
        if !self.config.source(platform).enabled {
            return None;
        }
        let status = match self.profile(platform).await {
            Ok(profile) => {
                tracing::info!(%platform, name = %profile.name, "Connected");
                ConnectionStatus::Connected {
                    name: profile.name,
                    thumbnail: profile.thumbnail,
                }
            }
            Err(e) => {
                tracing::warn!(%platform, error = %e, "Connection failed");
                ConnectionStatus::Failed(status_message(e))
            }
        };
        Some((platform, status))
    }

    async fn profile(&self, platform: Platform) -> Result<Profile, ProviderError> {
        let client = self.clients.get(platform);
        tracing::debug!(platform = %client.platform(), "Logging in");
        client.login().await?;
        let me = client.api("me", ApiParams::default()).await?;
        Ok(serde_json::from_value(me)?)
    }

    /// Run one aggregation over the configured sources.
    pub async fn fetch(&self) -> Result<AggregationResult, AggregationError> {
        self.aggregator.aggregate(&self.config).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
