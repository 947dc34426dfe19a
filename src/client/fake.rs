//! In-memory [`ProviderClient`] for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Barrier;

use super::{ApiParams, ProviderClient, ProviderError, Result};
use crate::source::Platform;

/// Canned responses per endpoint, with call counters as spies.
pub struct FakeClient {
    platform: Platform,
    responses: HashMap<String, std::result::Result<Value, String>>,
    login_error: Option<String>,
    gate: Option<Arc<Barrier>>,
    api_calls: AtomicUsize,
    login_calls: AtomicUsize,
    last_params: Mutex<Option<ApiParams>>,
}

impl FakeClient {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            responses: HashMap::new(),
            login_error: None,
            gate: None,
            api_calls: AtomicUsize::new(0),
            login_calls: AtomicUsize::new(0),
            last_params: Mutex::new(None),
        }
    }

    /// Answer `endpoint` with `{"data": records}`.
    pub fn with_listing(self, endpoint: &str, records: Vec<Value>) -> Self {
        self.with_response(endpoint, json!({ "data": records }))
    }

    pub fn with_response(mut self, endpoint: &str, body: Value) -> Self {
        self.responses.insert(endpoint.to_string(), Ok(body));
        self
    }

    /// Fail `endpoint` with an API error carrying `message`.
    pub fn with_error(mut self, endpoint: &str, message: &str) -> Self {
        self.responses
            .insert(endpoint.to_string(), Err(message.to_string()));
        self
    }

    pub fn with_login_error(mut self, message: &str) -> Self {
        self.login_error = Some(message.to_string());
        self
    }

    /// Make every `api` call wait on `barrier` before answering.
    pub fn with_gate(mut self, barrier: Arc<Barrier>) -> Self {
        self.gate = Some(barrier);
        self
    }

    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::SeqCst)
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn last_params(&self) -> Option<ApiParams> {
        *self.last_params.lock().unwrap()
    }
}

#[async_trait]
impl ProviderClient for FakeClient {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn login(&self) -> Result<()> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        match &self.login_error {
            Some(message) => Err(ProviderError::Api {
                status: 401,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    async fn api(&self, endpoint: &str, params: ApiParams) -> Result<Value> {
        self.api_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_params.lock().unwrap() = Some(params);

        if let Some(gate) = &self.gate {
            gate.wait().await;
        }

        match self.responses.get(endpoint) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(message)) => Err(ProviderError::Api {
                status: 500,
                message: message.clone(),
            }),
            None => Err(ProviderError::Api {
                status: 404,
                message: format!("no such endpoint: {endpoint}"),
            }),
        }
    }
}
