use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use email_discovery::{ContentRecord, Identity, RecordResolver};
use serde::Deserialize;
use thiserror::Error;

use crate::events::{PipelineEvent, Stage};
use crate::record::{OutputRecord, RunSummary};
use crate::traits::{
    EnrichmentParams, EnrichmentService, PipelineObserver, ProfileItem, ResultSink, RunResult,
    RunStatus, SearchItem, SearchParams, SearchService, UpstreamError,
};

/// Search kind requested from the search collaborator.
pub const HASHTAG_SEARCH: &str = "hashtag";

/// How identities are turned into content records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineMode {
    /// Single stage: resolve each creator's post caption.
    Posts,
    /// Two stage: look up each creator's profile and resolve the biography.
    Profiles,
}

impl fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineMode::Posts => f.write_str("posts"),
            PipelineMode::Profiles => f.write_str("profiles"),
        }
    }
}

impl FromStr for PipelineMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "posts" | "post" => Ok(PipelineMode::Posts),
            "profiles" | "profile" => Ok(PipelineMode::Profiles),
            other => Err(format!("unknown pipeline mode '{other}' (expected posts or profiles)")),
        }
    }
}

/// Failures that abort a whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{stage} call failed: {source}")]
    UpstreamCall {
        stage: Stage,
        #[source]
        source: UpstreamError,
    },

    #[error("{stage} run finished with status {status}")]
    UpstreamRun { stage: Stage, status: String },
}

/// Per-run parameters.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub search_term: String,
    pub max_posts: u32,
    pub use_proxy: bool,
    pub mode: PipelineMode,
}

/// Sequences the upstream scrapers, resolves every identity one at a time
/// and pushes each discovered contact to the sink.
pub struct Pipeline {
    search: Arc<dyn SearchService>,
    enrichment: Arc<dyn EnrichmentService>,
    resolver: RecordResolver,
    sink: Arc<dyn ResultSink>,
    observer: Arc<dyn PipelineObserver>,
    settings: RunSettings,
}

impl Pipeline {
    pub fn new(
        search: Arc<dyn SearchService>,
        enrichment: Arc<dyn EnrichmentService>,
        resolver: RecordResolver,
        sink: Arc<dyn ResultSink>,
        observer: Arc<dyn PipelineObserver>,
        settings: RunSettings,
    ) -> Self {
        Self {
            search,
            enrichment,
            resolver,
            sink,
            observer,
            settings,
        }
    }

    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        self.emit(PipelineEvent::RunStarted {
            search_term: self.settings.search_term.clone(),
            max_posts: self.settings.max_posts,
            mode: self.settings.mode,
        });

        let params = SearchParams {
            search_term: self.settings.search_term.clone(),
            search_kind: HASHTAG_SEARCH.to_string(),
            result_limit: self.settings.max_posts,
            use_proxy: self.settings.use_proxy,
        };
        self.emit(PipelineEvent::StageStarted {
            stage: Stage::Search,
        });
        let outcome = self.search.run_search(&params).await;
        let items = self.check_run(Stage::Search, outcome)?;

        if items.is_empty() {
            return Ok(self.finish(RunSummary::default()));
        }

        let identities = identity_worklist(&items);
        if identities.is_empty() {
            self.emit(PipelineEvent::EmptyResults {
                stage: Stage::Search,
            });
            return Ok(self.finish(RunSummary::default()));
        }

        let records = match self.settings.mode {
            PipelineMode::Posts => post_records(identities),
            PipelineMode::Profiles => self.profile_records(&identities).await?,
        };

        let mut summary = RunSummary::default();
        for record in &records {
            self.process(record, &mut summary).await;
        }

        Ok(self.finish(summary))
    }

    /// Two-stage: enrich the identities found by search into profile records.
    async fn profile_records(
        &self,
        identities: &[SeenIdentity],
    ) -> Result<Vec<ContentRecord>, PipelineError> {
        let params = EnrichmentParams {
            handles: identities.iter().map(|i| i.identity.handle.clone()).collect(),
            use_proxy: self.settings.use_proxy,
        };
        self.emit(PipelineEvent::StageStarted {
            stage: Stage::Enrichment,
        });
        let outcome = self.enrichment.run_enrichment(&params).await;
        let profiles = self.check_run(Stage::Enrichment, outcome)?;

        let records = profile_records(identities, profiles);

        let returned: HashSet<&str> = records.iter().map(|r| r.identity.handle.as_str()).collect();
        for seen in identities {
            if !returned.contains(seen.identity.handle.as_str()) {
                self.emit(PipelineEvent::NoProfileReturned {
                    handle: seen.identity.handle.clone(),
                });
            }
        }

        Ok(records)
    }

    async fn process(&self, record: &ContentRecord, summary: &mut RunSummary) {
        let handle = record.identity.handle.clone();
        self.emit(PipelineEvent::Checking {
            handle: handle.clone(),
        });

        let result = self.resolver.resolve(record).await;
        summary.processed += 1;

        let Some(output) = OutputRecord::from_result(record, &result, &self.settings.search_term)
        else {
            self.emit(PipelineEvent::NoEmailFound { handle });
            return;
        };

        match self.sink.push(&output).await {
            Ok(()) => {
                summary.found += 1;
                self.emit(PipelineEvent::EmailFound {
                    handle,
                    email: output.email,
                    source: output.source,
                });
            }
            Err(e) => self.emit(PipelineEvent::SinkFailed {
                handle,
                error: e.to_string(),
            }),
        }
    }

    /// Unwrap a collaborator run, emitting the matching events. Empty result
    /// sets are a warning, not a failure.
    fn check_run<T>(
        &self,
        stage: Stage,
        outcome: Result<RunResult<T>, UpstreamError>,
    ) -> Result<Vec<T>, PipelineError> {
        let run = match outcome {
            Ok(run) => run,
            Err(source) => {
                self.emit(PipelineEvent::UpstreamFailed {
                    stage,
                    error: source.to_string(),
                });
                return Err(PipelineError::UpstreamCall { stage, source });
            }
        };

        if let RunStatus::Failed(status) = run.status {
            self.emit(PipelineEvent::UpstreamFailed {
                stage,
                error: format!("run finished with status {status}"),
            });
            return Err(PipelineError::UpstreamRun { stage, status });
        }

        self.emit(PipelineEvent::StageCompleted {
            stage,
            items: run.items.len(),
        });
        if run.items.is_empty() {
            self.emit(PipelineEvent::EmptyResults { stage });
        }

        Ok(run.items)
    }

    fn finish(&self, summary: RunSummary) -> RunSummary {
        self.emit(PipelineEvent::Finished { summary });
        summary
    }

    fn emit(&self, event: PipelineEvent) {
        self.observer.on_event(&event);
    }
}

/// A creator seen in search results, with its first post.
#[derive(Debug, Clone)]
struct SeenIdentity {
    identity: Identity,
    first_post: SearchItem,
}

/// Distinct creators in first-seen order. Items without a handle are skipped.
fn identity_worklist(items: &[SearchItem]) -> Vec<SeenIdentity> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(|item| {
            let handle = item.handle.as_deref().map(str::trim).filter(|h| !h.is_empty())?;
            seen.insert(handle.to_string()).then(|| SeenIdentity {
                identity: Identity::new(handle).with_display_name(item.display_name.clone()),
                first_post: item.clone(),
            })
        })
        .collect()
}

/// Single-stage records: one per creator, from the first post's caption.
fn post_records(identities: Vec<SeenIdentity>) -> Vec<ContentRecord> {
    identities
        .into_iter()
        .map(|seen| {
            ContentRecord::post(seen.identity, seen.first_post.text)
                .with_post_url(seen.first_post.url)
        })
        .collect()
}

/// Two-stage records: one per returned profile that matches a requested
/// identity, in enrichment order.
fn profile_records(identities: &[SeenIdentity], profiles: Vec<ProfileItem>) -> Vec<ContentRecord> {
    let requested: HashMap<&str, &SeenIdentity> = identities
        .iter()
        .map(|seen| (seen.identity.handle.as_str(), seen))
        .collect();
    let mut emitted = HashSet::new();
    let mut records = Vec::new();

    for profile in profiles {
        let Some(handle) = profile.handle.as_deref().map(str::trim) else {
            continue;
        };
        let Some(seen) = requested.get(handle) else {
            tracing::debug!(handle, "Skipping profile that was not requested");
            continue;
        };
        if !emitted.insert(handle.to_string()) {
            continue;
        }

        let display_name = profile
            .full_name
            .clone()
            .or_else(|| seen.identity.display_name.clone());
        let identity = Identity::new(handle).with_display_name(display_name);

        records.push(
            ContentRecord::profile(identity, profile.biography)
                .with_external_url(profile.external_url)
                .with_followers_count(profile.followers_count)
                .with_post_url(seen.first_post.url.clone()),
        );
    }

    records
}

#[cfg(test)]
mod tests {
    use email_discovery::RecordKind;

    use super::*;

    fn post(handle: Option<&str>, caption: &str, url: &str) -> SearchItem {
        SearchItem {
            handle: handle.map(String::from),
            display_name: None,
            text: Some(caption.to_string()),
            url: Some(url.to_string()),
        }
    }

    fn profile(handle: &str, bio: Option<&str>) -> ProfileItem {
        ProfileItem {
            handle: Some(handle.to_string()),
            biography: bio.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn worklist_dedups_by_handle_in_first_seen_order() {
        let items = vec![
            post(Some("bob"), "one", "p1"),
            post(Some("alice"), "two", "p2"),
            post(Some("bob"), "three", "p3"),
            post(None, "orphan", "p4"),
            post(Some("  "), "blank", "p5"),
        ];

        let worklist = identity_worklist(&items);

        let handles: Vec<_> = worklist.iter().map(|s| s.identity.handle.as_str()).collect();
        assert_eq!(handles, vec!["bob", "alice"]);
        assert_eq!(worklist[0].first_post.url.as_deref(), Some("p1"));
    }

    #[test]
    fn post_records_use_first_caption() {
        let items = vec![post(Some("bob"), "first", "p1"), post(Some("bob"), "second", "p2")];

        let records = post_records(identity_worklist(&items));

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, RecordKind::Post);
        assert_eq!(records[0].text.as_deref(), Some("first"));
        assert_eq!(records[0].post_url.as_deref(), Some("p1"));
    }

    #[test]
    fn profile_records_skip_unrequested_and_repeated_profiles() {
        let identities = identity_worklist(&[post(Some("alice"), "c", "p1")]);
        let profiles = vec![
            profile("stranger", Some("x@y.com")),
            profile("alice", Some("bio")),
            profile("alice", Some("again")),
        ];

        let records = profile_records(&identities, profiles);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identity.handle, "alice");
        assert_eq!(records[0].kind, RecordKind::Profile);
        assert_eq!(records[0].text.as_deref(), Some("bio"));
        assert_eq!(records[0].post_url.as_deref(), Some("p1"));
    }

    #[test]
    fn profile_name_falls_back_to_search_display_name() {
        let mut item = post(Some("alice"), "c", "p1");
        item.display_name = Some("Alice From Search".into());
        let identities = identity_worklist(&[item]);

        let records = profile_records(&identities, vec![profile("alice", None)]);

        assert_eq!(
            records[0].identity.display_name.as_deref(),
            Some("Alice From Search")
        );
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Posts".parse::<PipelineMode>(), Ok(PipelineMode::Posts));
        assert_eq!("profiles".parse::<PipelineMode>(), Ok(PipelineMode::Profiles));
        assert!("bogus".parse::<PipelineMode>().is_err());
    }
}
