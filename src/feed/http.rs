use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::data::{normalize_body, ComplianceRecord};
use crate::feed::{LoadError, RecordSource};
use crate::state::Config;

/// Fetches the checklist with a single GET. No caching, no automatic retries.
pub struct ComplianceFeed {
    client: Client,
    endpoint: String,
    collection_field: String,
}

impl ComplianceFeed {
    pub fn new(cfg: &Config) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .map_err(LoadError::transport)?;
        Ok(Self {
            client,
            endpoint: cfg.endpoint.clone(),
            collection_field: cfg.collection_field.clone(),
        })
    }
}

#[async_trait::async_trait]
impl RecordSource for ComplianceFeed {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn load(&self) -> Result<Vec<ComplianceRecord>, LoadError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(LoadError::transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LoadError::Http { status: status.as_u16() });
        }
        let body: Value = resp.json().await.map_err(LoadError::transport)?;
        Ok(normalize_body(&body, &self.collection_field))
    }
}

/// One-shot load against `endpoint` with default settings.
pub async fn load(endpoint: &str) -> Result<Vec<ComplianceRecord>, LoadError> {
    let cfg = Config {
        endpoint: endpoint.to_string(),
        ..Config::default()
    };
    ComplianceFeed::new(&cfg)?.load().await
}
