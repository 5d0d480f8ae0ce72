// Apify-backed search and enrichment collaborators.
// Wraps ApifyClient and converts actor output into pipeline items.

use std::sync::Arc;

use apify_client::{ApifyClient, ApifyError, InstagramPost, InstagramProfile, InstagramSearchInput};
use async_trait::async_trait;

use crate::traits::{
    EnrichmentParams, EnrichmentService, ProfileItem, RunResult, SearchItem, SearchParams,
    SearchService, UpstreamError,
};

pub struct ApifyScrapers {
    client: Arc<ApifyClient>,
}

impl ApifyScrapers {
    pub fn new(client: Arc<ApifyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SearchService for ApifyScrapers {
    async fn run_search(&self, params: &SearchParams) -> Result<RunResult<SearchItem>, UpstreamError> {
        let input = InstagramSearchInput {
            search_type: params.search_kind.clone(),
            ..InstagramSearchInput::hashtag_posts(
                &params.search_term,
                params.result_limit,
                params.use_proxy,
            )
        };
        let outcome = self.client.search_instagram(&input).await;
        into_run_result(outcome, search_item)
    }
}

#[async_trait]
impl EnrichmentService for ApifyScrapers {
    async fn run_enrichment(
        &self,
        params: &EnrichmentParams,
    ) -> Result<RunResult<ProfileItem>, UpstreamError> {
        let outcome = self
            .client
            .scrape_instagram_profiles(&params.handles, params.use_proxy)
            .await;
        into_run_result(outcome, profile_item)
    }
}

/// A terminal non-success status is a run result, not a call failure.
fn into_run_result<T, U>(
    outcome: apify_client::Result<Vec<T>>,
    convert: fn(T) -> U,
) -> Result<RunResult<U>, UpstreamError> {
    match outcome {
        Ok(items) => Ok(RunResult::succeeded(items.into_iter().map(convert).collect())),
        Err(ApifyError::RunFailed { status, .. }) => Ok(RunResult::failed(status)),
        Err(e) => Err(UpstreamError(e.to_string())),
    }
}

fn search_item(post: InstagramPost) -> SearchItem {
    SearchItem {
        handle: post.author_username().map(String::from),
        display_name: post.author_full_name().map(String::from),
        text: post.caption,
        url: post.url,
    }
}

fn profile_item(profile: InstagramProfile) -> ProfileItem {
    ProfileItem {
        handle: profile.username,
        full_name: profile.full_name,
        biography: profile.biography,
        external_url: profile.external_url,
        followers_count: profile.followers_count,
    }
}
