use std::collections::HashSet;

use scraper::{Html, Selector};
use url::Url;

use crate::domain::Article;
use crate::extract::element::element_text;
use crate::extract::traits::ExtractionStrategy;
use crate::extract::MAX_ARTICLES;

/// How many anchors the fallback scan inspects.
const MAX_ANCHORS: usize = 300;

/// Shortest anchor text the fallback scan accepts.
const MIN_TEXT_CHARS: usize = 15;

/// Last resort: harvest internal links with headline-sized text. Accepts
/// only site-relative hrefs and absolute hrefs that start with the base URL.
pub struct LinkScanStrategy;

impl ExtractionStrategy for LinkScanStrategy {
    fn name(&self) -> &'static str {
        "link-scan"
    }

    fn extract(&self, document: &Html, base_url: &Url) -> Vec<Article> {
        let anchors = Selector::parse("a[href]").unwrap();
        let mut seen = HashSet::new();
        let mut articles = Vec::new();

        for anchor in document.select(&anchors).take(MAX_ANCHORS) {
            let title = element_text(anchor);
            if title.chars().count() < MIN_TEXT_CHARS {
                continue;
            }

            let href = anchor.value().attr("href").unwrap_or("");
            let resolved = if href.starts_with('/') {
                match base_url.join(href) {
                    Ok(u) => u.to_string(),
                    Err(_) => continue,
                }
            } else if href.starts_with(base_url.as_str()) {
                href.to_string()
            } else {
                continue;
            };

            if !seen.insert(resolved.clone()) {
                continue;
            }

            articles.push(Article::new(title, resolved));
            if articles.len() >= MAX_ARTICLES {
                break;
            }
        }

        articles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    #[test]
    fn test_internal_links_with_long_text_accepted() {
        let doc = Html::parse_document(
            r#"<a href="/story/1">A headline that is long enough</a>
               <a href="https://example.com/story/2">Another sufficiently long headline</a>"#,
        );
        let articles = LinkScanStrategy.extract(&doc, &base());

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].url, "https://example.com/story/1");
        assert!(articles[0].date_published.is_none());
    }

    #[test]
    fn test_external_links_rejected() {
        let doc = Html::parse_document(
            r#"<a href="https://other.example/story">External headline of fair length</a>"#,
        );
        assert!(LinkScanStrategy.extract(&doc, &base()).is_empty());
    }

    #[test]
    fn test_short_text_rejected() {
        let doc = Html::parse_document(r#"<a href="/story/1">Too short</a>"#);
        assert!(LinkScanStrategy.extract(&doc, &base()).is_empty());
    }

    #[test]
    fn test_duplicate_hrefs_deduplicated() {
        let doc = Html::parse_document(
            r#"<a href="/story/1">A headline that is long enough</a>
               <a href="/story/1">A headline that is long enough</a>"#,
        );
        assert_eq!(LinkScanStrategy.extract(&doc, &base()).len(), 1);
    }

    #[test]
    fn test_returned_list_capped_at_50() {
        let mut html = String::new();
        for i in 0..120 {
            html.push_str(&format!(
                r#"<a href="/story/{}">Story number {} with a long title</a>"#,
                i, i
            ));
        }
        let doc = Html::parse_document(&html);
        assert_eq!(LinkScanStrategy.extract(&doc, &base()).len(), 50);
    }
}
