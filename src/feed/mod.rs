use async_trait::async_trait;
use std::fmt::Display;

use crate::data::ComplianceRecord;

pub mod http;

pub use http::{load, ComplianceFeed};

/// Why a load attempt produced no collection.
///
/// Both kinds end the current attempt; neither is fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The endpoint answered outside the 2xx range.
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },
    /// Network failure or an unparseable body.
    #[error("{message}")]
    Transport { message: String },
}

impl LoadError {
    pub fn transport(err: impl Display) -> Self {
        LoadError::Transport { message: err.to_string() }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::Http { .. } => "http",
            LoadError::Transport { .. } => "transport",
        }
    }
}

/// Anything that can produce one compliance collection per call.
#[async_trait]
pub trait RecordSource: Send + Sync {
    fn endpoint(&self) -> &str;
    async fn load(&self) -> Result<Vec<ComplianceRecord>, LoadError>;
}
