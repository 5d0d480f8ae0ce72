// Collaborator boundaries for the pipeline.
//
// SearchService / EnrichmentService wrap the upstream scrapers, ResultSink
// persists records, PipelineObserver receives status events. Apify-backed
// implementations live in `apify` and `sink`; in-memory ones in `testing`.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::events::PipelineEvent;
use crate::record::OutputRecord;

// ---------------------------------------------------------------------------
// Run results
// ---------------------------------------------------------------------------

/// Terminal status of an upstream run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Succeeded,
    /// Any other terminal status, verbatim (`FAILED`, `ABORTED`, `TIMED-OUT`).
    Failed(String),
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Succeeded => f.write_str("SUCCEEDED"),
            RunStatus::Failed(status) => f.write_str(status),
        }
    }
}

/// A finished upstream run and the items it produced.
#[derive(Debug, Clone)]
pub struct RunResult<T> {
    pub status: RunStatus,
    pub items: Vec<T>,
}

impl<T> RunResult<T> {
    pub fn succeeded(items: Vec<T>) -> Self {
        Self {
            status: RunStatus::Succeeded,
            items,
        }
    }

    pub fn failed(status: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Failed(status.into()),
            items: Vec::new(),
        }
    }
}

/// The collaborator could not be invoked at all.
#[derive(Debug, Clone, Error)]
#[error("upstream call failed: {0}")]
pub struct UpstreamError(pub String);

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub search_term: String,
    pub search_kind: String,
    pub result_limit: u32,
    pub use_proxy: bool,
}

/// One post returned by the search collaborator.
#[derive(Debug, Clone, Default)]
pub struct SearchItem {
    pub handle: Option<String>,
    pub display_name: Option<String>,
    pub text: Option<String>,
    pub url: Option<String>,
}

#[async_trait]
pub trait SearchService: Send + Sync {
    async fn run_search(&self, params: &SearchParams) -> Result<RunResult<SearchItem>, UpstreamError>;
}

// ---------------------------------------------------------------------------
// Enrichment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentParams {
    pub handles: Vec<String>,
    pub use_proxy: bool,
}

/// One profile returned by the enrichment collaborator.
#[derive(Debug, Clone, Default)]
pub struct ProfileItem {
    pub handle: Option<String>,
    pub full_name: Option<String>,
    pub biography: Option<String>,
    pub external_url: Option<String>,
    pub followers_count: Option<u64>,
}

#[async_trait]
pub trait EnrichmentService: Send + Sync {
    async fn run_enrichment(
        &self,
        params: &EnrichmentParams,
    ) -> Result<RunResult<ProfileItem>, UpstreamError>;
}

// ---------------------------------------------------------------------------
// Sink and observer
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Apify error: {0}")]
    Apify(#[from] apify_client::ApifyError),
}

/// Append-only destination for discovered records.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn push(&self, record: &OutputRecord) -> Result<(), SinkError>;
}

/// Receives leveled status events as the pipeline runs.
pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}
