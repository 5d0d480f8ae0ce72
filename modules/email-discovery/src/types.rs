use std::fmt;

use serde::Serialize;

use crate::email::first_url;

/// A creator account, keyed by handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Identity {
    pub handle: String,
    pub display_name: Option<String>,
}

impl Identity {
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: Option<String>) -> Self {
        self.display_name = name.filter(|n| !n.trim().is_empty());
        self
    }

    /// `https://<platform_host>/<handle>`
    pub fn profile_url(&self, platform_host: &str) -> String {
        format!("https://{platform_host}/{}", self.handle)
    }
}

/// Where a record's free text came from. Decides the provenance vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A post; the text is its caption.
    Post,
    /// A profile; the text is its biography.
    Profile,
}

/// One unit of creator text plus the metadata carried into the output.
#[derive(Debug, Clone)]
pub struct ContentRecord {
    pub identity: Identity,
    pub kind: RecordKind,
    pub text: Option<String>,
    pub external_url: Option<String>,
    pub followers_count: Option<u64>,
    pub post_url: Option<String>,
}

impl ContentRecord {
    pub fn post(identity: Identity, caption: Option<String>) -> Self {
        Self::new(identity, RecordKind::Post, caption)
    }

    pub fn profile(identity: Identity, biography: Option<String>) -> Self {
        Self::new(identity, RecordKind::Profile, biography)
    }

    fn new(identity: Identity, kind: RecordKind, text: Option<String>) -> Self {
        Self {
            identity,
            kind,
            text,
            external_url: None,
            followers_count: None,
            post_url: None,
        }
    }

    pub fn with_external_url(mut self, url: Option<String>) -> Self {
        self.external_url = url;
        self
    }

    pub fn with_followers_count(mut self, count: Option<u64>) -> Self {
        self.followers_count = count;
        self
    }

    pub fn with_post_url(mut self, url: Option<String>) -> Self {
        self.post_url = url;
        self
    }

    /// The link to deep search: the explicit external URL when set, otherwise
    /// the first URL mentioned in the text.
    pub fn link(&self) -> Option<String> {
        self.external_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .or_else(|| self.text.as_deref().and_then(first_url))
    }
}

/// Which strategy produced a record's emails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    CaptionText,
    BioText,
    LinkInCaption(String),
    LinkInBio(String),
}

impl Provenance {
    pub fn local(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Post => Provenance::CaptionText,
            RecordKind::Profile => Provenance::BioText,
        }
    }

    pub fn linked(kind: RecordKind, url: String) -> Self {
        match kind {
            RecordKind::Post => Provenance::LinkInCaption(url),
            RecordKind::Profile => Provenance::LinkInBio(url),
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::CaptionText => f.write_str("Caption Text"),
            Provenance::BioText => f.write_str("Bio Text"),
            Provenance::LinkInCaption(url) => write!(f, "Link in Caption ({url})"),
            Provenance::LinkInBio(url) => write!(f, "Link in Bio ({url})"),
        }
    }
}

/// Outcome of resolving one [`ContentRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    pub identity: Identity,
    /// Distinct addresses in discovery order.
    pub emails: Vec<String>,
    /// Set whenever `emails` is non-empty.
    pub provenance: Option<Provenance>,
    /// The link that was deep searched, if any.
    pub searched_link: Option<String>,
}

impl ExtractionResult {
    pub fn empty(identity: Identity) -> Self {
        Self {
            identity,
            emails: Vec::new(),
            provenance: None,
            searched_link: None,
        }
    }

    pub fn primary_email(&self) -> Option<&str> {
        self.emails.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provenance_labels() {
        assert_eq!(Provenance::local(RecordKind::Post).to_string(), "Caption Text");
        assert_eq!(Provenance::local(RecordKind::Profile).to_string(), "Bio Text");
        assert_eq!(
            Provenance::linked(RecordKind::Profile, "http://bob.example".into()).to_string(),
            "Link in Bio (http://bob.example)"
        );
        assert_eq!(
            Provenance::linked(RecordKind::Post, "https://lnk.bio/x".into()).to_string(),
            "Link in Caption (https://lnk.bio/x)"
        );
    }

    #[test]
    fn explicit_link_wins_over_text_url() {
        let record = ContentRecord::profile(
            Identity::new("bob"),
            Some("see https://in-text.example".into()),
        )
        .with_external_url(Some("http://bob.example".into()));
        assert_eq!(record.link().as_deref(), Some("http://bob.example"));
    }

    #[test]
    fn blank_explicit_link_falls_back_to_text() {
        let record = ContentRecord::post(
            Identity::new("amy"),
            Some("shop → https://shop.example/amy".into()),
        )
        .with_external_url(Some("  ".into()));
        assert_eq!(record.link().as_deref(), Some("https://shop.example/amy"));
    }

    #[test]
    fn no_link_anywhere() {
        let record = ContentRecord::post(Identity::new("amy"), None);
        assert_eq!(record.link(), None);
    }

    #[test]
    fn profile_url_uses_handle() {
        assert_eq!(
            Identity::new("alice").profile_url("instagram.com"),
            "https://instagram.com/alice"
        );
    }

    #[test]
    fn blank_display_name_is_dropped() {
        let identity = Identity::new("a").with_display_name(Some(" ".into()));
        assert_eq!(identity.display_name, None);
    }
}
