use std::sync::Arc;

use tracing::info;

use crate::deep_search::LinkFetcher;
use crate::email::find_emails_opt;
use crate::types::{ContentRecord, ExtractionResult, Provenance};

/// Decides the email set for one record.
///
/// Local text always wins: the linked page is only fetched when the caption
/// or biography holds no address, and the two sources are never merged.
pub struct RecordResolver {
    fetcher: Arc<dyn LinkFetcher>,
}

impl RecordResolver {
    pub fn new(fetcher: Arc<dyn LinkFetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn resolve(&self, record: &ContentRecord) -> ExtractionResult {
        let local = find_emails_opt(record.text.as_deref());
        if !local.is_empty() {
            return ExtractionResult {
                identity: record.identity.clone(),
                emails: local,
                provenance: Some(Provenance::local(record.kind)),
                searched_link: None,
            };
        }

        let Some(link) = record.link() else {
            return ExtractionResult::empty(record.identity.clone());
        };

        info!(handle = %record.identity.handle, url = %link, "Deep searching link");
        let found = self.fetcher.fetch_emails(&link).await;

        let provenance = (!found.is_empty()).then(|| Provenance::linked(record.kind, link.clone()));
        ExtractionResult {
            identity: record.identity.clone(),
            emails: found,
            provenance,
            searched_link: Some(link),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::types::Identity;

    #[derive(Default)]
    struct CountingFetcher {
        pages: HashMap<String, Vec<String>>,
        calls: AtomicUsize,
    }

    impl CountingFetcher {
        fn on(mut self, url: &str, emails: &[&str]) -> Self {
            self.pages
                .insert(url.to_string(), emails.iter().map(|e| e.to_string()).collect());
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LinkFetcher for CountingFetcher {
        async fn fetch_emails(&self, url: &str) -> Vec<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.pages.get(url).cloned().unwrap_or_default()
        }
    }

    fn setup(fetcher: CountingFetcher) -> (Arc<CountingFetcher>, RecordResolver) {
        let fetcher = Arc::new(fetcher);
        let resolver = RecordResolver::new(fetcher.clone());
        (fetcher, resolver)
    }

    #[tokio::test]
    async fn local_email_skips_deep_search() {
        let (fetcher, resolver) =
            setup(CountingFetcher::default().on("http://alice.example", &["other@x.com"]));
        let record = ContentRecord::profile(
            Identity::new("alice"),
            Some("reach me: alice@x.com".into()),
        )
        .with_external_url(Some("http://alice.example".into()));

        let result = resolver.resolve(&record).await;

        assert_eq!(fetcher.calls(), 0);
        assert_eq!(result.emails, vec!["alice@x.com"]);
        assert_eq!(result.provenance, Some(Provenance::BioText));
        assert_eq!(result.primary_email(), Some("alice@x.com"));
        assert_eq!(result.searched_link, None);
    }

    #[tokio::test]
    async fn caption_email_is_labelled_caption_text() {
        let (_, resolver) = setup(CountingFetcher::default());
        let record = ContentRecord::post(Identity::new("amy"), Some("DM or amy@shop.co".into()));

        let result = resolver.resolve(&record).await;

        assert_eq!(result.provenance.unwrap().to_string(), "Caption Text");
    }

    #[tokio::test]
    async fn falls_back_to_linked_page() {
        let (fetcher, resolver) =
            setup(CountingFetcher::default().on("http://bob.example", &["x@y.com"]));
        let record = ContentRecord::profile(Identity::new("bob"), None)
            .with_external_url(Some("http://bob.example".into()));

        let result = resolver.resolve(&record).await;

        assert_eq!(fetcher.calls(), 1);
        assert_eq!(result.emails, vec!["x@y.com"]);
        let label = result.provenance.unwrap().to_string();
        assert!(label.starts_with("Link in"));
        assert_eq!(label, "Link in Bio (http://bob.example)");
    }

    #[tokio::test]
    async fn url_in_caption_is_deep_searched() {
        let (fetcher, resolver) = setup(
            CountingFetcher::default().on("https://linktr.ee/amy", &["first@amy.com", "second@amy.com"]),
        );
        let record = ContentRecord::post(
            Identity::new("amy"),
            Some("new video! links: https://linktr.ee/amy".into()),
        );

        let result = resolver.resolve(&record).await;

        assert_eq!(fetcher.calls(), 1);
        assert_eq!(result.primary_email(), Some("first@amy.com"));
        assert_eq!(
            result.provenance,
            Some(Provenance::LinkInCaption("https://linktr.ee/amy".into()))
        );
    }

    #[tokio::test]
    async fn failed_deep_search_is_empty_result() {
        let (fetcher, resolver) = setup(CountingFetcher::default());
        let record = ContentRecord::profile(Identity::new("carl"), Some("no contact".into()))
            .with_external_url(Some("http://down.example".into()));

        let result = resolver.resolve(&record).await;

        assert_eq!(fetcher.calls(), 1);
        assert!(result.is_empty());
        assert_eq!(result.provenance, None);
        assert_eq!(result.searched_link.as_deref(), Some("http://down.example"));
    }

    #[tokio::test]
    async fn nothing_to_search() {
        let (fetcher, resolver) = setup(CountingFetcher::default());
        let record = ContentRecord::profile(Identity::new("dana"), None);

        let result = resolver.resolve(&record).await;

        assert_eq!(fetcher.calls(), 0);
        assert!(result.is_empty());
        assert_eq!(result.primary_email(), None);
    }
}
