use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use tracing::{debug, warn};
use url::Url;

use crate::error::DeepSearchError;
use crate::html::extract_from_html;

/// Desktop Chrome on Windows. Link-in-bio hosts serve bare pages to unknown agents.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches a linked page and reports the email addresses on it.
#[async_trait]
pub trait LinkFetcher: Send + Sync {
    /// Emails found at `url`. Never fails: any problem yields an empty list.
    async fn fetch_emails(&self, url: &str) -> Vec<String>;
}

/// HTTP-backed [`LinkFetcher`]: one bounded GET, then HTML contact extraction.
pub struct DeepSearchFetcher {
    client: reqwest::Client,
}

impl DeepSearchFetcher {
    pub fn new() -> Result<Self, DeepSearchError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DeepSearchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch `url` and extract emails, surfacing the failure reason.
    pub async fn try_fetch(&self, url: &str) -> Result<Vec<String>, DeepSearchError> {
        let parsed = Url::parse(url).map_err(|e| DeepSearchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(DeepSearchError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        let resp = self.client.get(parsed).send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(DeepSearchError::Status(status.as_u16()));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| DeepSearchError::Body(e.to_string()))?;

        Ok(extract_from_html(&body))
    }
}

#[async_trait]
impl LinkFetcher for DeepSearchFetcher {
    async fn fetch_emails(&self, url: &str) -> Vec<String> {
        match self.try_fetch(url).await {
            Ok(emails) => {
                debug!(url, count = emails.len(), "Deep search complete");
                emails
            }
            Err(e) => {
                warn!(url, error = %e, "Deep search failed");
                Vec::new()
            }
        }
    }
}
