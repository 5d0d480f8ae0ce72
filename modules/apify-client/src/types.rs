use serde::{Deserialize, Serialize};

/// Proxy settings accepted by every Apify scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct ProxyConfig {
    #[serde(rename = "useApifyProxy")]
    pub use_apify_proxy: bool,
}

// --- Instagram search (apify/instagram-scraper) ---

/// Input for the apify/instagram-scraper actor in search mode.
#[derive(Debug, Clone, Serialize)]
pub struct InstagramSearchInput {
    pub search: String,
    /// "hashtag", "user" or "place".
    #[serde(rename = "searchType")]
    pub search_type: String,
    #[serde(rename = "searchLimit")]
    pub search_limit: u32,
    /// "posts" returns one item per post, with owner fields inlined.
    #[serde(rename = "resultsType")]
    pub results_type: String,
    #[serde(rename = "resultsLimit")]
    pub results_limit: u32,
    pub proxy: ProxyConfig,
}

impl InstagramSearchInput {
    /// Hashtag search returning posts, capped at `limit` results.
    pub fn hashtag_posts(term: &str, limit: u32, use_proxy: bool) -> Self {
        Self {
            search: term.to_string(),
            search_type: "hashtag".to_string(),
            search_limit: limit,
            results_type: "posts".to_string(),
            results_limit: limit,
            proxy: ProxyConfig {
                use_apify_proxy: use_proxy,
            },
        }
    }
}

/// Nested owner object some scraper versions emit instead of flat owner fields.
#[derive(Debug, Clone, Deserialize)]
pub struct PostOwner {
    pub username: Option<String>,
    pub full_name: Option<String>,
}

/// A single Instagram post from the search actor's dataset.
///
/// The actor has shipped several layouts over time, so the author can appear
/// as `ownerUsername`, as a nested `owner`, or as a bare `username`.
#[derive(Debug, Clone, Deserialize)]
pub struct InstagramPost {
    pub caption: Option<String>,
    #[serde(rename = "ownerUsername")]
    pub owner_username: Option<String>,
    #[serde(rename = "ownerFullName")]
    pub owner_full_name: Option<String>,
    pub owner: Option<PostOwner>,
    pub username: Option<String>,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub url: Option<String>,
}

impl InstagramPost {
    /// The post author's handle, whichever layout carried it.
    pub fn author_username(&self) -> Option<&str> {
        self.owner_username
            .as_deref()
            .or_else(|| self.owner.as_ref().and_then(|o| o.username.as_deref()))
            .or(self.username.as_deref())
            .filter(|u| !u.is_empty())
    }

    /// The post author's display name, whichever layout carried it.
    pub fn author_full_name(&self) -> Option<&str> {
        self.owner_full_name
            .as_deref()
            .or_else(|| self.owner.as_ref().and_then(|o| o.full_name.as_deref()))
            .or(self.full_name.as_deref())
            .filter(|n| !n.is_empty())
    }
}

// --- Instagram profiles (apify/instagram-profile-scraper) ---

/// Input for the apify/instagram-profile-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct InstagramProfileInput {
    pub usernames: Vec<String>,
    pub proxy: ProxyConfig,
}

/// A single Instagram profile from the profile actor's dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct InstagramProfile {
    pub username: Option<String>,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub biography: Option<String>,
    #[serde(rename = "externalUrl")]
    pub external_url: Option<String>,
    #[serde(rename = "followersCount")]
    pub followers_count: Option<u64>,
}

// --- Run plumbing ---

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
}
