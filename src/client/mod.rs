//! Provider client abstraction.
//!
//! A [`ProviderClient`] is the only thing the rest of the crate knows about a
//! platform's API: it can log in and it can issue one request against a
//! normalized endpoint, returning raw JSON.  The OAuth handshake, token
//! refresh and the wire details all live behind this trait.
//!
//! Clients are injected per platform (see [`crate::widget::Clients`]), so
//! tests substitute fakes and nothing reaches for a global instance.

mod error;
#[cfg(test)]
pub(crate) mod fake;
mod http;

pub use error::{ProviderError, Result};
pub use http::HttpProviderClient;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::source::Platform;

/// Query parameters for a provider request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApiParams {
    /// Maximum number of records to return.
    pub limit: Option<u32>,
}

impl ApiParams {
    pub fn with_limit(limit: u32) -> Self {
        Self { limit: Some(limit) }
    }
}

/// The signed-in user, as returned by the `me` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    pub thumbnail: Option<String>,
}

/// Minimal request/response contract of an authenticated platform session.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Platform this client talks to.
    fn platform(&self) -> Platform;

    /// Establish (or verify) the authenticated session.
    async fn login(&self) -> Result<()>;

    /// Issue a single request against `endpoint` and return the raw JSON body.
    async fn api(&self, endpoint: &str, params: ApiParams) -> Result<Value>;
}
