// Test mocks for the pipeline.
//
// One mock per trait boundary:
// - MockSearch (SearchService) / MockEnrichment (EnrichmentService) — canned runs
// - MemorySink (ResultSink) — collects pushed records, optional per-handle failures
// - RecordingObserver (PipelineObserver) — keeps every event for assertions
// - MockLinkFetcher (LinkFetcher) — URL→emails map with a call counter

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use email_discovery::LinkFetcher;

use crate::events::{EventLevel, PipelineEvent};
use crate::record::OutputRecord;
use crate::traits::{
    EnrichmentParams, EnrichmentService, PipelineObserver, ProfileItem, ResultSink, RunResult,
    SearchItem, SearchParams, SearchService, SinkError, UpstreamError,
};

// ---------------------------------------------------------------------------
// Item builders
// ---------------------------------------------------------------------------

pub fn search_item(handle: &str, caption: &str) -> SearchItem {
    SearchItem {
        handle: Some(handle.to_string()),
        display_name: None,
        text: Some(caption.to_string()),
        url: Some(format!("https://instagram.com/p/{handle}")),
    }
}

pub fn profile_item(handle: &str, biography: Option<&str>, external_url: Option<&str>) -> ProfileItem {
    ProfileItem {
        handle: Some(handle.to_string()),
        full_name: None,
        biography: biography.map(String::from),
        external_url: external_url.map(String::from),
        followers_count: None,
    }
}

// ---------------------------------------------------------------------------
// MockSearch / MockEnrichment
// ---------------------------------------------------------------------------

/// Returns the same canned outcome on every call and records the params.
pub struct MockSearch {
    outcome: Result<RunResult<SearchItem>, UpstreamError>,
    calls: Mutex<Vec<SearchParams>>,
}

impl MockSearch {
    pub fn succeeding(items: Vec<SearchItem>) -> Self {
        Self::with_outcome(Ok(RunResult::succeeded(items)))
    }

    pub fn failing_with_status(status: &str) -> Self {
        Self::with_outcome(Ok(RunResult::failed(status)))
    }

    pub fn unreachable(message: &str) -> Self {
        Self::with_outcome(Err(UpstreamError(message.to_string())))
    }

    fn with_outcome(outcome: Result<RunResult<SearchItem>, UpstreamError>) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<SearchParams> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchService for MockSearch {
    async fn run_search(&self, params: &SearchParams) -> Result<RunResult<SearchItem>, UpstreamError> {
        self.calls.lock().unwrap().push(params.clone());
        self.outcome.clone()
    }
}

pub struct MockEnrichment {
    outcome: Result<RunResult<ProfileItem>, UpstreamError>,
    calls: Mutex<Vec<EnrichmentParams>>,
}

impl MockEnrichment {
    pub fn succeeding(items: Vec<ProfileItem>) -> Self {
        Self::with_outcome(Ok(RunResult::succeeded(items)))
    }

    pub fn failing_with_status(status: &str) -> Self {
        Self::with_outcome(Ok(RunResult::failed(status)))
    }

    pub fn unreachable(message: &str) -> Self {
        Self::with_outcome(Err(UpstreamError(message.to_string())))
    }

    fn with_outcome(outcome: Result<RunResult<ProfileItem>, UpstreamError>) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<EnrichmentParams> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EnrichmentService for MockEnrichment {
    async fn run_enrichment(
        &self,
        params: &EnrichmentParams,
    ) -> Result<RunResult<ProfileItem>, UpstreamError> {
        self.calls.lock().unwrap().push(params.clone());
        self.outcome.clone()
    }
}

// ---------------------------------------------------------------------------
// MemorySink
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<OutputRecord>>,
    failing_handles: HashSet<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject pushes for `handle` with an I/O error.
    pub fn failing_for(mut self, handle: &str) -> Self {
        self.failing_handles.insert(handle.to_string());
        self
    }

    pub fn records(&self) -> Vec<OutputRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResultSink for MemorySink {
    async fn push(&self, record: &OutputRecord) -> Result<(), SinkError> {
        if self.failing_handles.contains(&record.username) {
            return Err(SinkError::Io(std::io::Error::other("sink unavailable")));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RecordingObserver
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn at_level(&self, level: EventLevel) -> Vec<PipelineEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.level() == level)
            .collect()
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// ---------------------------------------------------------------------------
// MockLinkFetcher
// ---------------------------------------------------------------------------

/// Unregistered URLs behave like an unreachable page: no emails.
#[derive(Default)]
pub struct MockLinkFetcher {
    pages: HashMap<String, Vec<String>>,
    calls: AtomicUsize,
}

impl MockLinkFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_page(mut self, url: &str, emails: &[&str]) -> Self {
        self.pages
            .insert(url.to_string(), emails.iter().map(|e| e.to_string()).collect());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LinkFetcher for MockLinkFetcher {
    async fn fetch_emails(&self, url: &str) -> Vec<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages.get(url).cloned().unwrap_or_default()
    }
}
