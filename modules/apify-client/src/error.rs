use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApifyError>;

/// Failures talking to the Apify platform.
///
/// `RunFailed` is the only variant where the platform itself answered normally:
/// the actor ran and finished badly. Callers that treat run status as data match
/// on it; everything else is a failed call.
#[derive(Debug, Error)]
pub enum ApifyError {
    #[error("Apify request failed: {0}")]
    Network(String),

    #[error("Apify request timed out: {0}")]
    Timeout(String),

    #[error("Apify API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected Apify response body: {0}")]
    Decode(String),

    #[error("Actor run {run_id} ended with status {status}")]
    RunFailed { run_id: String, status: String },
}

impl From<reqwest::Error> for ApifyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApifyError::Timeout(err.to_string())
        } else if err.is_decode() {
            ApifyError::Decode(err.to_string())
        } else {
            ApifyError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApifyError {
    fn from(err: serde_json::Error) -> Self {
        ApifyError::Decode(err.to_string())
    }
}
