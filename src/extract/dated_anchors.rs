use scraper::{Html, Selector};
use url::Url;

use crate::domain::Article;
use crate::extract::element::{element_text, resolve_href};
use crate::extract::traits::ExtractionStrategy;
use crate::extract::{MAX_ARTICLES, MIN_LINK_TITLE_CHARS};

/// Anchors carrying their date inline via a `datetime` attribute.
pub struct DatedAnchorStrategy;

impl ExtractionStrategy for DatedAnchorStrategy {
    fn name(&self) -> &'static str {
        "dated-anchors"
    }

    fn extract(&self, document: &Html, base_url: &Url) -> Vec<Article> {
        let dated = Selector::parse("a[href][datetime]").unwrap();
        let mut articles = Vec::new();

        for anchor in document.select(&dated).take(MAX_ARTICLES) {
            let title = element_text(anchor);
            if title.chars().count() <= MIN_LINK_TITLE_CHARS {
                continue;
            }

            let href = anchor.value().attr("href").unwrap_or("");
            let url = match resolve_href(base_url, href) {
                Some(u) => u,
                None => continue,
            };
            let date = anchor.value().attr("datetime").map(str::to_string);

            articles.push(Article::new(title, url).with_date(date));
        }

        articles
    }
}
