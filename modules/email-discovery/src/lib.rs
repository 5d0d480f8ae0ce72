//! Email discovery for creator accounts.
//!
//! Given a caption or biography and an optional linked page, produce the
//! distinct email addresses it exposes and label where they came from.

pub mod deep_search;
pub mod email;
pub mod error;
pub mod html;
pub mod resolver;
pub mod types;

pub use deep_search::{DeepSearchFetcher, LinkFetcher, BROWSER_USER_AGENT, DEFAULT_TIMEOUT};
pub use email::{find_emails, find_emails_opt, first_url};
pub use error::DeepSearchError;
pub use html::extract_from_html;
pub use resolver::RecordResolver;
pub use types::{ContentRecord, ExtractionResult, Identity, Provenance, RecordKind};
