use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// `local@domain.tld` with a letters-only TLD of two or more characters.
const EMAIL_PATTERN: &str = r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));
static EMAIL_EXACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{EMAIL_PATTERN}$")).expect("valid regex"));
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"'()\[\]{}]+"#).expect("valid regex"));

/// Extract email addresses from text. Returns distinct matches in order of
/// first occurrence, case preserved.
pub fn find_emails(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    EMAIL_RE
        .find_iter(text)
        .filter_map(|m| {
            let email = m.as_str();
            seen.insert(email).then(|| email.to_string())
        })
        .collect()
}

/// Like [`find_emails`], with absent text treated as empty.
pub fn find_emails_opt(text: Option<&str>) -> Vec<String> {
    text.map(find_emails).unwrap_or_default()
}

/// True when the whole string is a single well-formed address.
pub fn is_email(candidate: &str) -> bool {
    EMAIL_EXACT_RE.is_match(candidate)
}

/// First `http(s)://` URL in the text that parses, with trailing sentence
/// punctuation removed.
pub fn first_url(text: &str) -> Option<String> {
    URL_RE.find_iter(text).find_map(|m| {
        let candidate = m
            .as_str()
            .trim_end_matches(['.', ',', ';', ':', '!', '?']);
        url::Url::parse(candidate)
            .ok()
            .filter(|u| u.host_str().is_some())
            .map(|_| candidate.to_string())
    })
}
