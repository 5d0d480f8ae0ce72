pub mod error;
pub mod types;

pub use error::{ApifyError, Result};
pub use types::{
    InstagramPost, InstagramProfile, InstagramProfileInput, InstagramSearchInput, PostOwner,
    ProxyConfig, RunData,
};

use serde::de::DeserializeOwned;
use serde::Serialize;
use types::ApiResponse;

const BASE_URL: &str = "https://api.apify.com/v2";

/// Actor ID for apify/instagram-scraper (hashtag/user/place search).
pub const INSTAGRAM_SCRAPER: &str = "apify~instagram-scraper";

/// Actor ID for apify/instagram-profile-scraper.
pub const INSTAGRAM_PROFILE_SCRAPER: &str = "apify~instagram-profile-scraper";

pub struct ApifyClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl ApifyClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the client at a different API root (e.g. a local mock server).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Start an actor run. Returns immediately with run metadata.
    pub async fn start_run<I: Serialize + ?Sized>(&self, actor_id: &str, input: &I) -> Result<RunData> {
        let url = format!("{}/acts/{}/runs", self.base_url, actor_id);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        let api_resp: ApiResponse<RunData> = resp.json().await?;
        Ok(api_resp.data)
    }

    /// Poll until a run completes. Uses `waitForFinish=60` for efficient long-polling.
    pub async fn wait_for_run(&self, run_id: &str) -> Result<RunData> {
        loop {
            let url = format!("{}/actor-runs/{}?waitForFinish=60", self.base_url, run_id);
            let resp = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await?;
            let resp = ensure_success(resp).await?;

            let api_resp: ApiResponse<RunData> = resp.json().await?;
            match api_resp.data.status.as_str() {
                "SUCCEEDED" => return Ok(api_resp.data),
                "FAILED" | "ABORTED" | "TIMED-OUT" => {
                    return Err(ApifyError::RunFailed {
                        run_id: run_id.to_string(),
                        status: api_resp.data.status,
                    });
                }
                _ => {
                    tracing::debug!(run_id, status = %api_resp.data.status, "Run still in progress");
                    continue;
                }
            }
        }
    }

    /// Fetch dataset items from a completed run.
    pub async fn get_dataset_items<T: DeserializeOwned>(&self, dataset_id: &str) -> Result<Vec<T>> {
        let url = format!("{}/datasets/{}/items?format=json", self.base_url, dataset_id);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        let items: Vec<T> = resp.json().await?;
        Ok(items)
    }

    /// Append items to a dataset.
    pub async fn push_dataset_items<T: Serialize>(&self, dataset_id: &str, items: &[T]) -> Result<()> {
        let url = format!("{}/datasets/{}/items", self.base_url, dataset_id);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(items)
            .send()
            .await?;
        ensure_success(resp).await?;
        Ok(())
    }

    /// Run an actor end-to-end: start run, poll, fetch results.
    pub async fn run_actor<I, T>(&self, actor_id: &str, input: &I) -> Result<Vec<T>>
    where
        I: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let run = self.start_run(actor_id, input).await?;
        tracing::info!(actor_id, run_id = %run.id, "Apify run started, polling for completion");

        let completed = self.wait_for_run(&run.id).await?;
        tracing::info!(
            run_id = %completed.id,
            dataset_id = %completed.default_dataset_id,
            "Run completed, fetching results"
        );

        self.get_dataset_items(&completed.default_dataset_id).await
    }

    /// Search Instagram posts; see [`InstagramSearchInput::hashtag_posts`].
    pub async fn search_instagram(&self, input: &InstagramSearchInput) -> Result<Vec<InstagramPost>> {
        tracing::info!(
            search = %input.search,
            search_type = %input.search_type,
            limit = input.results_limit,
            "Starting Instagram search"
        );

        let posts: Vec<InstagramPost> = self.run_actor(INSTAGRAM_SCRAPER, input).await?;
        tracing::info!(count = posts.len(), "Fetched Instagram posts");

        Ok(posts)
    }

    /// Fetch full profile records for a list of Instagram usernames.
    pub async fn scrape_instagram_profiles(
        &self,
        usernames: &[String],
        use_proxy: bool,
    ) -> Result<Vec<InstagramProfile>> {
        tracing::info!(count = usernames.len(), "Starting Instagram profile scrape");

        let input = InstagramProfileInput {
            usernames: usernames.to_vec(),
            proxy: ProxyConfig {
                use_apify_proxy: use_proxy,
            },
        };
        let profiles: Vec<InstagramProfile> =
            self.run_actor(INSTAGRAM_PROFILE_SCRAPER, &input).await?;
        tracing::info!(count = profiles.len(), "Fetched Instagram profiles");

        Ok(profiles)
    }
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApifyError::Api {
            status: status.as_u16(),
            message: body,
        });
    }
    Ok(resp)
}
