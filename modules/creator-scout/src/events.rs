use std::fmt;

use tracing::{error, info, warn};

use crate::pipeline::PipelineMode;
use crate::record::RunSummary;
use crate::traits::PipelineObserver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Warn,
    Error,
}

/// Which upstream collaborator an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Search,
    Enrichment,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Search => f.write_str("search"),
            Stage::Enrichment => f.write_str("enrichment"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    RunStarted {
        search_term: String,
        max_posts: u32,
        mode: PipelineMode,
    },
    StageStarted {
        stage: Stage,
    },
    StageCompleted {
        stage: Stage,
        items: usize,
    },
    EmptyResults {
        stage: Stage,
    },
    UpstreamFailed {
        stage: Stage,
        error: String,
    },
    Checking {
        handle: String,
    },
    EmailFound {
        handle: String,
        email: String,
        source: String,
    },
    NoEmailFound {
        handle: String,
    },
    NoProfileReturned {
        handle: String,
    },
    SinkFailed {
        handle: String,
        error: String,
    },
    Finished {
        summary: RunSummary,
    },
}

impl PipelineEvent {
    pub fn level(&self) -> EventLevel {
        match self {
            PipelineEvent::EmptyResults { .. } => EventLevel::Warn,
            PipelineEvent::UpstreamFailed { .. } | PipelineEvent::SinkFailed { .. } => {
                EventLevel::Error
            }
            _ => EventLevel::Info,
        }
    }
}

impl fmt::Display for PipelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineEvent::RunStarted {
                search_term,
                max_posts,
                mode,
            } => write!(
                f,
                "Searching for hashtag: {search_term} with limit: {max_posts} ({mode} mode)"
            ),
            PipelineEvent::StageStarted { stage } => write!(f, "Calling {stage} scraper"),
            PipelineEvent::StageCompleted { stage, items } => {
                write!(f, "Retrieved {items} items from {stage} scraper")
            }
            PipelineEvent::EmptyResults { stage } => write!(
                f,
                "No results from {stage} scraper; it may have been blocked or found nothing"
            ),
            PipelineEvent::UpstreamFailed { stage, error } => {
                write!(f, "{stage} scraper failed: {error}")
            }
            PipelineEvent::Checking { handle } => write!(f, "Checking @{handle}"),
            PipelineEvent::EmailFound {
                handle,
                email,
                source,
            } => write!(f, "Found email for {handle}: {email} ({source})"),
            PipelineEvent::NoEmailFound { handle } => write!(f, "No email found for {handle}"),
            PipelineEvent::NoProfileReturned { handle } => {
                write!(f, "No profile returned for @{handle}")
            }
            PipelineEvent::SinkFailed { handle, error } => {
                write!(f, "Failed to store result for {handle}: {error}")
            }
            PipelineEvent::Finished { summary } => write!(f, "Done: {summary}"),
        }
    }
}

/// Forwards events to `tracing` at their level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event.level() {
            EventLevel::Info => info!("{event}"),
            EventLevel::Warn => warn!("{event}"),
            EventLevel::Error => error!("{event}"),
        }
    }
}
