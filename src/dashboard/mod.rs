//! Load lifecycle for the compliance tab.
//!
//! A single `LoadState` value replaces separate loading/error/data flags.
//! Every load is tagged with a monotonically increasing sequence number and
//! results carrying an older number are dropped, so a slow response from a
//! superseded request can never overwrite a newer one.

use std::time::Instant;

use crate::data::{ComplianceRecord, Snapshot};
use crate::feed::{LoadError, RecordSource};
use crate::logging::{log_fetch_failed, log_fetch_ok, log_fetch_start, log_stale_response};

pub mod session;
pub mod view;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Failed(LoadError),
    Ready(Snapshot),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            LoadState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            LoadState::Ready(snap) => Some(snap),
            _ => None,
        }
    }
}

/// Proof that a load was started; only the latest ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    seq: u64,
}

impl RequestTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug)]
pub struct Dashboard {
    state: LoadState,
    seq: u64,
    started: Option<Instant>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    /// A fresh dashboard is already `Loading`: the first fetch is issued on mount.
    pub fn new() -> Self {
        Self {
            state: LoadState::Loading,
            seq: 0,
            started: None,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn current_seq(&self) -> u64 {
        self.seq
    }

    pub fn begin_load(&mut self) -> RequestTicket {
        self.seq += 1;
        self.state = LoadState::Loading;
        self.started = Some(Instant::now());
        RequestTicket { seq: self.seq }
    }

    /// Drop whatever is held (error or snapshot) and start over.
    pub fn retry(&mut self) -> RequestTicket {
        self.begin_load()
    }

    /// Apply a finished load. Returns false when the ticket was superseded.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        endpoint: &str,
        result: Result<Vec<ComplianceRecord>, LoadError>,
    ) -> bool {
        if ticket.seq != self.seq {
            log_stale_response(ticket.seq, self.seq);
            return false;
        }
        let elapsed_ms = self
            .started
            .take()
            .map(|t| t.elapsed().as_secs_f64() * 1000.0)
            .unwrap_or(0.0);
        self.state = match result {
            Ok(records) => {
                let snapshot = Snapshot::new(records);
                log_fetch_ok(
                    endpoint,
                    snapshot.len(),
                    snapshot.fingerprint(),
                    &snapshot.fetched_at_rfc3339(),
                    elapsed_ms,
                );
                LoadState::Ready(snapshot)
            }
            Err(err) => {
                log_fetch_failed(endpoint, err.kind(), &err.to_string());
                LoadState::Failed(err)
            }
        };
        true
    }

    /// Run the fetch for an already issued ticket and apply its result.
    pub async fn load_with(&mut self, ticket: RequestTicket, source: &dyn RecordSource) -> &LoadState {
        log_fetch_start(source.endpoint(), ticket.seq);
        let result = source.load().await;
        self.complete(ticket, source.endpoint(), result);
        &self.state
    }

    /// Start a load, await the source, apply the result.
    pub async fn refresh(&mut self, source: &dyn RecordSource) -> &LoadState {
        let ticket = self.begin_load();
        self.load_with(ticket, source).await
    }
}

/// Source that replays a fixed list of outcomes, one per call.
#[cfg(test)]
pub(crate) mod scripted {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    pub(crate) struct ScriptedSource {
        results: Mutex<Vec<Result<Vec<ComplianceRecord>, LoadError>>>,
        calls: AtomicU32,
    }

    impl ScriptedSource {
        pub(crate) fn new(mut results: Vec<Result<Vec<ComplianceRecord>, LoadError>>) -> Self {
            results.reverse();
            Self {
                results: Mutex::new(results),
                calls: AtomicU32::new(0),
            }
        }

        pub(crate) fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RecordSource for ScriptedSource {
        fn endpoint(&self) -> &str {
            "http://test.invalid/compliance"
        }

        async fn load(&self) -> Result<Vec<ComplianceRecord>, LoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.results
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(LoadError::transport("script exhausted")))
        }
    }

    pub(crate) fn records() -> Vec<ComplianceRecord> {
        vec![ComplianceRecord::new("GDPR", "Consent", "Severe")]
    }
}
