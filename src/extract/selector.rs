use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::domain::Article;
use crate::extract::element::extract_article;
use crate::extract::traits::ExtractionStrategy;
use crate::extract::MAX_ARTICLES;

/// The user-configured CSS selector. Participates only when a selector is
/// present; an unparseable selector yields nothing instead of failing the
/// refresh.
pub struct CustomSelectorStrategy {
    selector: String,
}

impl CustomSelectorStrategy {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }
}

impl ExtractionStrategy for CustomSelectorStrategy {
    fn name(&self) -> &'static str {
        "custom-selector"
    }

    fn extract(&self, document: &Html, base_url: &Url) -> Vec<Article> {
        let selector = match Selector::parse(&self.selector) {
            Ok(s) => s,
            Err(_) => {
                debug!(selector = %self.selector, "unparseable selector, skipping");
                return Vec::new();
            }
        };

        document
            .select(&selector)
            .take(MAX_ARTICLES)
            .filter_map(|el| extract_article(el, base_url))
            .collect()
    }
}
