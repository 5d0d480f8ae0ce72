use std::fmt;

use email_discovery::{ContentRecord, ExtractionResult, RecordKind};
use serde::{Deserialize, Serialize};

/// Host used to build canonical profile URLs.
pub const PLATFORM_HOST: &str = "instagram.com";

/// A discovered contact, as persisted by a [`ResultSink`](crate::traits::ResultSink).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub username: String,
    pub full_name: Option<String>,
    pub profile_url: String,
    pub email: String,
    pub all_emails: Vec<String>,
    pub source: String,
    pub hashtag_used: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
}

impl OutputRecord {
    /// Build the persisted record, or `None` when nothing was found.
    pub fn from_result(
        record: &ContentRecord,
        result: &ExtractionResult,
        search_term: &str,
    ) -> Option<Self> {
        let email = result.primary_email()?.to_string();
        let source = result.provenance.as_ref()?.to_string();
        let identity = &result.identity;

        let biography = match record.kind {
            RecordKind::Profile => record.text.clone().filter(|t| !t.is_empty()),
            RecordKind::Post => None,
        };

        Some(Self {
            username: identity.handle.clone(),
            full_name: identity.display_name.clone(),
            profile_url: identity.profile_url(PLATFORM_HOST),
            email,
            all_emails: result.emails.clone(),
            source,
            hashtag_used: search_term.to_string(),
            followers_count: record.followers_count,
            post_url: record.post_url.clone(),
            biography,
        })
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Identities resolved.
    pub processed: usize,
    /// Records persisted.
    pub found: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} processed, {} found", self.processed, self.found)
    }
}
