use anyhow::{bail, Context, Result};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/compliance";
pub const DEFAULT_COLLECTION_FIELD: &str = "compliance";

#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoint serving the compliance checklist; fixed for the lifetime of a run.
    pub endpoint: String,
    /// Field holding the record array when the body is a wrapper object.
    pub collection_field: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            collection_field: DEFAULT_COLLECTION_FIELD.to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("COMPLIANCE_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            collection_field: std::env::var("COMPLIANCE_FIELD").unwrap_or_else(|_| DEFAULT_COLLECTION_FIELD.to_string()),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(10),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.endpoint)
            .with_context(|| format!("invalid compliance endpoint: {}", self.endpoint))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("compliance endpoint must be http or https, got {}", url.scheme());
        }
        if self.collection_field.is_empty() {
            bail!("collection field name must not be empty");
        }
        if self.request_timeout_secs == 0 {
            bail!("REQUEST_TIMEOUT_SECS must be greater than zero");
        }
        Ok(())
    }
}

pub fn now_ts() -> u64 {
    chrono::Utc::now().timestamp() as u64
}
