use scraper::{Html, Selector};
use url::Url;

use crate::domain::Article;
use crate::extract::element::extract_article;
use crate::extract::traits::ExtractionStrategy;
use crate::extract::MAX_ARTICLES;

/// Selectors for common article-list markup, most specific first.
const LIST_SELECTORS: &[&str] = &[
    ".article-list-item",
    ".blog-item",
    ".news-item",
    ".post-item",
    ".entry-item",
    "article",
    ".entry",
    ".post",
];

/// Class names and tags that CMSes use for article lists. The first selector
/// whose matches survive single-element extraction wins; a selector whose
/// matches are all rejected counts as no match.
pub struct ListSelectorStrategy;

impl ExtractionStrategy for ListSelectorStrategy {
    fn name(&self) -> &'static str {
        "list-selectors"
    }

    fn extract(&self, document: &Html, base_url: &Url) -> Vec<Article> {
        for raw in LIST_SELECTORS {
            let selector = match Selector::parse(raw) {
                Ok(s) => s,
                Err(_) => continue,
            };

            let articles: Vec<Article> = document
                .select(&selector)
                .take(MAX_ARTICLES)
                .filter_map(|el| extract_article(el, base_url))
                .collect();

            if !articles.is_empty() {
                return articles;
            }
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com").unwrap()
    }

    #[test]
    fn test_article_tag_matched() {
        let doc = Html::parse_document(
            r#"<article><h2>Breaking News Today</h2><a href="/story/1">read</a></article>"#,
        );
        let articles = ListSelectorStrategy.extract(&doc, &base());

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Breaking News Today");
        assert_eq!(articles[0].url, "https://example.com/story/1");
    }

    #[test]
    fn test_more_specific_selector_wins_over_article_tag() {
        let doc = Html::parse_document(
            r#"<div class="news-item"><h3>Specific list entry headline</h3></div>
               <article><h2>Generic article headline</h2></article>"#,
        );
        let articles = ListSelectorStrategy.extract(&doc, &base());

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Specific list entry headline");
    }

    #[test]
    fn test_selector_with_only_rejected_matches_falls_to_next() {
        // .news-item matches but its title is too short, so the article tag
        // further down the list supplies the result.
        let doc = Html::parse_document(
            r#"<div class="news-item"><h3>tiny</h3></div>
               <article><h2>Acceptable article headline</h2></article>"#,
        );
        let articles = ListSelectorStrategy.extract(&doc, &base());

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Acceptable article headline");
    }

    #[test]
    fn test_no_known_markup_yields_nothing() {
        let doc = Html::parse_document(r#"<div><p>Nothing list-like here</p></div>"#);
        assert!(ListSelectorStrategy.extract(&doc, &base()).is_empty());
    }
}
