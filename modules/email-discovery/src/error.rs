use thiserror::Error;

/// Why a deep search of a linked page produced nothing.
#[derive(Debug, Error)]
pub enum DeepSearchError {
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Failed to read response body: {0}")]
    Body(String),
}
