use scraper::Html;
use url::Url;

use crate::domain::Article;

/// One extraction heuristic. Strategies never fail; a page a strategy cannot
/// read yields an empty list and the cascade moves on.
pub trait ExtractionStrategy: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    fn extract(&self, document: &Html, base_url: &Url) -> Vec<Article>;
}
