//! Widget configuration.
//!
//! Loaded from a TOML file with three platform sections plus the proxy
//! settings.  Every field has a default, so an empty file is a valid (if
//! inert) configuration:
//!
//! ```toml
//! [twitter]
//! enabled = true
//! max_elements = 20
//! key = "..."
//!
//! [proxy]
//! base_url = "http://localhost:8080"
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::source::Platform;

/// Default number of items requested from each provider.
pub const DEFAULT_MAX_ELEMENTS: u32 = 50;

/// Largest `max_elements` a source may request.
pub const MAX_ELEMENTS_LIMIT: u32 = 200;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

// =============================================================================
// Configuration Types
// =============================================================================

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialConfig {
    #[serde(default)]
    pub twitter: SourceConfig,
    #[serde(default)]
    pub instagram: SourceConfig,
    #[serde(default)]
    pub facebook: SourceConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
}

/// Settings for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub enabled: bool,
    /// Upper bound on items requested in the single fetch.
    pub max_elements: u32,
    /// Credential handed to the provider client.
    pub key: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_elements: DEFAULT_MAX_ELEMENTS,
            key: None,
        }
    }
}

impl SourceConfig {
    /// An enabled source with the given bound and no key.
    pub fn enabled(max_elements: u32) -> Self {
        Self {
            enabled: true,
            max_elements,
            key: None,
        }
    }
}

/// Where the OAuth proxy lives and how long a request may take.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProxyConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ProxyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// Loading and validation
// =============================================================================

impl SocialConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for platform in Platform::ALL {
            let max = self.source(platform).max_elements;
            if max == 0 || max > MAX_ELEMENTS_LIMIT {
                return Err(ConfigError::Invalid(format!(
                    "{}.max_elements must be between 1 and {MAX_ELEMENTS_LIMIT}, got {max}",
                    platform.tag()
                )));
            }
        }
        if self.proxy.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("proxy.base_url must not be empty".into()));
        }
        if self.proxy.timeout_secs == 0 {
            return Err(ConfigError::Invalid("proxy.timeout_secs must be at least 1".into()));
        }
        Ok(())
    }

    /// The section for `platform`.
    pub fn source(&self, platform: Platform) -> &SourceConfig {
        match platform {
            Platform::Twitter => &self.twitter,
            Platform::Instagram => &self.instagram,
            Platform::Facebook => &self.facebook,
        }
    }

    /// Enabled platforms in their fixed order.
    pub fn enabled_platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| self.source(*p).enabled)
            .collect()
    }

    /// True if at least one platform is enabled.
    pub fn any_enabled(&self) -> bool {
        Platform::ALL.iter().any(|p| self.source(*p).enabled)
    }
}

// =============================================================================
// Tests
// =============================================================================
