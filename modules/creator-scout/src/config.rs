use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::pipeline::{PipelineMode, RunSettings};

pub const DEFAULT_SEARCH_TERM: &str = "mortgage";
pub const DEFAULT_MAX_POSTS: u32 = 20;
pub const DEFAULT_OUTPUT_PATH: &str = "results.jsonl";
const DEFAULT_DEEP_SEARCH_TIMEOUT_SECS: u64 = 10;

/// Where discovered records go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    JsonLines(PathBuf),
    ApifyDataset(String),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub apify_token: String,
    pub search_term: String,
    pub max_posts: u32,
    pub mode: PipelineMode,
    pub use_proxy: bool,
    pub deep_search_timeout: Duration,
    pub output: OutputTarget,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let apify_token = get("APIFY_TOKEN").context("APIFY_TOKEN environment variable is required")?;

        let max_posts = match get("MAX_POSTS") {
            Some(v) => v.trim().parse::<u32>().context("MAX_POSTS must be a number")?,
            None => DEFAULT_MAX_POSTS,
        };
        let mode = match get("PIPELINE_MODE") {
            Some(v) => v.parse::<PipelineMode>().map_err(anyhow::Error::msg)?,
            None => PipelineMode::Profiles,
        };
        let use_proxy = match get("USE_APIFY_PROXY") {
            Some(v) => parse_bool(&v).context("USE_APIFY_PROXY must be true or false")?,
            None => true,
        };
        let timeout_secs = match get("DEEP_SEARCH_TIMEOUT_SECS") {
            Some(v) => v.trim().parse::<u64>().context("DEEP_SEARCH_TIMEOUT_SECS must be a number")?,
            None => DEFAULT_DEEP_SEARCH_TIMEOUT_SECS,
        };
        let output = match (get("OUTPUT_PATH"), get("APIFY_DEFAULT_DATASET_ID")) {
            (Some(path), _) => OutputTarget::JsonLines(PathBuf::from(path)),
            (None, Some(dataset)) => OutputTarget::ApifyDataset(dataset),
            (None, None) => OutputTarget::JsonLines(PathBuf::from(DEFAULT_OUTPUT_PATH)),
        };

        Ok(Self {
            apify_token,
            search_term: get("SEARCH_TERM").unwrap_or_else(|| DEFAULT_SEARCH_TERM.to_string()),
            max_posts,
            mode,
            use_proxy,
            deep_search_timeout: Duration::from_secs(timeout_secs),
            output,
        })
    }

    /// Overlay values from an actor input document.
    pub fn apply_input(&mut self, input: ActorInput) {
        if let Some(term) = input.hashtag.filter(|t| !t.trim().is_empty()) {
            self.search_term = term;
        }
        if let Some(max) = input.max_posts {
            self.max_posts = max;
        }
        if let Some(mode) = input.mode {
            self.mode = mode;
        }
    }

    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            search_term: self.search_term.clone(),
            max_posts: self.max_posts,
            use_proxy: self.use_proxy,
            mode: self.mode,
        }
    }

    /// Log the effective configuration with secrets masked.
    pub fn log_redacted(&self) {
        info!(
            apify_token = "***",
            search_term = %self.search_term,
            max_posts = self.max_posts,
            mode = %self.mode,
            use_proxy = self.use_proxy,
            deep_search_timeout_secs = self.deep_search_timeout.as_secs(),
            output = ?self.output,
            "Configuration loaded"
        );
    }
}

/// Actor input document: `{ "hashtag": "...", "max_posts": 20 }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorInput {
    pub hashtag: Option<String>,
    pub max_posts: Option<u32>,
    pub mode: Option<PipelineMode>,
}

impl ActorInput {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse input file {}", path.display()))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
