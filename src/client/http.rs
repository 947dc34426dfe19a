use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{ApiParams, ProviderClient, ProviderError, Result};
use crate::source::Platform;

/// [`ProviderClient`] backed by an OAuth proxy speaking normalized JSON.
///
/// Requests go to `{base_url}/{platform}/{endpoint}` with the source key as
/// a bearer token.  The proxy owns the OAuth exchange with the platform and
/// answers with `{"data": [...]}` listings or an `{"error": {...}}` payload.
pub struct HttpProviderClient {
    platform: Platform,
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpProviderClient {
    pub fn new(
        platform: Platform,
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            platform,
            client,
            base_url: base_url.into(),
            token,
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.platform.tag(),
            endpoint.trim_start_matches('/')
        )
    }

    fn token(&self) -> Result<&str> {
        self.token.as_deref().ok_or(ProviderError::NotAuthenticated)
    }
}

/// Turn a status code and body into the JSON payload or a provider error.
///
/// The proxy reports some failures with a 2xx status and an `error` object
/// in the body, so both paths are checked.
pub(crate) fn interpret_response(status: u16, body: &str) -> Result<Value> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .as_ref()
            .and_then(error_message)
            .unwrap_or_else(|| body.to_string());
        return Err(ProviderError::Api { status, message });
    }

    let value: Value = serde_json::from_str(body)?;
    if let Some(message) = error_message(&value) {
        return Err(ProviderError::Api { status, message });
    }
    Ok(value)
}

fn error_message(value: &Value) -> Option<String> {
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(String::from)
}

#[async_trait]
impl ProviderClient for HttpProviderClient {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn login(&self) -> Result<()> {
        self.token()?;
        tracing::debug!(platform = %self.platform, "Session key present");
        Ok(())
    }

    async fn api(&self, endpoint: &str, params: ApiParams) -> Result<Value> {
        let token = self.token()?;
        let url = self.endpoint_url(endpoint);

        let mut request = self.client.get(&url).bearer_auth(token);
        if let Some(limit) = params.limit {
            request = request.query(&[("limit", limit)]);
        }

        tracing::debug!(platform = %self.platform, url = %url, limit = ?params.limit, "Provider request");
        let resp = request.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        interpret_response(status, &body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
