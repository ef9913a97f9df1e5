use scraper::Html;
use tracing::{debug, info};
use url::Url;

use crate::domain::Article;
use crate::extract::dated_anchors::DatedAnchorStrategy;
use crate::extract::link_scan::LinkScanStrategy;
use crate::extract::list_selectors::ListSelectorStrategy;
use crate::extract::selector::CustomSelectorStrategy;
use crate::extract::time_tags::TimeTagStrategy;
use crate::extract::traits::ExtractionStrategy;
use crate::extract::MAX_ARTICLES;

/// Runs the extraction heuristics in order and returns the first non-empty
/// result. A configured CSS selector is tried first; when it matches nothing
/// the generic heuristics take over like on any other page.
pub fn extract_articles(
    document: &Html,
    base_url: &Url,
    css_selector: Option<&str>,
) -> Vec<Article> {
    let mut strategies: Vec<Box<dyn ExtractionStrategy>> = Vec::new();

    if let Some(selector) = css_selector {
        if !selector.trim().is_empty() {
            strategies.push(Box::new(CustomSelectorStrategy::new(selector)));
        }
    }
    strategies.push(Box::new(TimeTagStrategy));
    strategies.push(Box::new(DatedAnchorStrategy));
    strategies.push(Box::new(ListSelectorStrategy));
    strategies.push(Box::new(LinkScanStrategy));

    for strategy in &strategies {
        let mut articles = strategy.extract(document, base_url);
        if !articles.is_empty() {
            articles.truncate(MAX_ARTICLES);
            info!(
                strategy = strategy.name(),
                count = articles.len(),
                "extracted articles"
            );
            return articles;
        }
        debug!(strategy = strategy.name(), "no articles, trying next");
    }

    Vec::new()
}
