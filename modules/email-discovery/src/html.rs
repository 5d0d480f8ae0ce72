use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::email::{find_emails, is_email};

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));

/// Elements whose text content never reaches the rendered page.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Collect contact emails from an HTML document: `mailto:` links first, in
/// document order, then addresses found in the visible text. Deduplicated.
///
/// Parsing is error-tolerant; malformed markup yields whatever could be
/// recovered, possibly nothing.
pub fn extract_from_html(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    mailto_addresses(&document)
        .into_iter()
        .chain(find_emails(&visible_text(&document)))
        .filter(|email| seen.insert(email.clone()))
        .collect()
}

/// Addresses from `<a href="mailto:...">`, with query parameters stripped.
fn mailto_addresses(document: &Html) -> Vec<String> {
    let mut addresses = Vec::new();

    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        let Some(scheme) = href.get(..7) else {
            continue;
        };
        if !scheme.eq_ignore_ascii_case("mailto:") {
            continue;
        }

        let target = &href[7..];
        let target = target.split('?').next().unwrap_or_default();
        addresses.extend(
            target
                .split(',')
                .map(str::trim)
                .filter(|addr| is_email(addr))
                .map(str::to_string),
        );
    }

    addresses
}

/// Rendered text of the document, one space between text nodes.
fn visible_text(document: &Html) -> String {
    let mut text = String::new();

    for node in document.root_element().descendants() {
        let Some(chunk) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element().map(|el| HIDDEN_ELEMENTS.contains(&el.name())))
            .unwrap_or(false);
        if hidden {
            continue;
        }
        text.push_str(chunk);
        text.push(' ');
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mailto_query_is_stripped_and_merged_with_text() {
        let html = r#"<html><body>
            <a href="mailto:a@b.com?subject=hi">Email me</a>
            <p>Or write to c@d.org</p>
        </body></html>"#;
        let mut found = extract_from_html(html);
        found.sort();
        assert_eq!(found, vec!["a@b.com", "c@d.org"]);
    }

    #[test]
    fn mailto_comes_before_text_matches() {
        let html = r#"<p>text@site.com</p><a href="mailto:link@site.com">x</a>"#;
        assert_eq!(extract_from_html(html), vec!["link@site.com", "text@site.com"]);
    }

    #[test]
    fn same_address_in_link_and_text_appears_once() {
        let html = r#"<a href="mailto:hi@me.com">hi@me.com</a>"#;
        assert_eq!(extract_from_html(html), vec!["hi@me.com"]);
    }

    #[test]
    fn mailto_scheme_is_case_insensitive() {
        let html = r#"<a href="MAILTO:Shop@Brand.com">write</a>"#;
        assert_eq!(extract_from_html(html), vec!["Shop@Brand.com"]);
    }

    #[test]
    fn mailto_with_several_recipients() {
        let html = r#"<a href="mailto:one@x.com, two@y.com?cc=three@z.com">team</a>"#;
        assert_eq!(extract_from_html(html), vec!["one@x.com", "two@y.com"]);
    }

    #[test]
    fn malformed_mailto_is_ignored() {
        let html = r#"<a href="mailto:">empty</a><a href="mailto:nobody">bad</a>"#;
        assert!(extract_from_html(html).is_empty());
    }

    #[test]
    fn non_mail_links_are_ignored() {
        let html = r#"<a href="https://shop.example/contact@us">shop</a>"#;
        assert!(extract_from_html(html).is_empty());
    }

    #[test]
    fn script_and_style_text_is_not_visible() {
        let html = r#"<html><head>
            <style>.x::after { content: "css@hidden.com" }</style>
            <script>var tracker = "js@hidden.com";</script>
        </head><body><p>shown@visible.com</p></body></html>"#;
        assert_eq!(extract_from_html(html), vec!["shown@visible.com"]);
    }

    #[test]
    fn adjacent_blocks_do_not_fuse_into_one_address() {
        let html = "<div>Contact</div><div>me@site.com</div>";
        assert_eq!(extract_from_html(html), vec!["me@site.com"]);
    }

    #[test]
    fn broken_markup_does_not_panic() {
        let html = "<<div><a href='mailto:ok@fine.com'>unterminated <p>also@here.net";
        let found = extract_from_html(html);
        assert!(found.contains(&"ok@fine.com".to_string()));
        assert!(found.contains(&"also@here.net".to_string()));
    }

    #[test]
    fn empty_document_yields_nothing() {
        assert!(extract_from_html("").is_empty());
    }
}
