use scraper::{ElementRef, Selector};
use url::Url;

use crate::domain::Article;

/// Titles shorter than this reject the element outright.
const MIN_TITLE_CHARS: usize = 5;

/// Visible text of an element: fragments trimmed, empties dropped, joined
/// with single spaces.
pub(super) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves an href against the page URL; absolute hrefs pass through.
pub(super) fn resolve_href(base_url: &Url, href: &str) -> Option<String> {
    base_url.join(href).ok().map(|u| u.to_string())
}

/// Extracts one article from a container element.
///
/// Title precedence: the first `h1`-`h4` descendant if any heading exists,
/// else the first anchor, else the element's own text. Short titles reject
/// the whole element.
pub(super) fn extract_article(element: ElementRef<'_>, base_url: &Url) -> Option<Article> {
    let headings = Selector::parse("h1, h2, h3, h4").unwrap();
    let anchors = Selector::parse("a").unwrap();
    let linked = Selector::parse("a[href]").unwrap();
    let times = Selector::parse("time").unwrap();

    let title = match element
        .select(&headings)
        .next()
        .or_else(|| element.select(&anchors).next())
    {
        Some(el) => element_text(el),
        None => element_text(element),
    };
    let title = title.trim();
    if title.chars().count() < MIN_TITLE_CHARS {
        return None;
    }

    let link = element
        .select(&linked)
        .next()
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| resolve_href(base_url, href))
        .unwrap_or_default();

    let date = element.select(&times).next().and_then(|t| {
        match t.value().attr("datetime") {
            Some(dt) => Some(dt.to_string()),
            None => {
                let text = element_text(t);
                if text.is_empty() {
                    None
                } else {
                    Some(text)
                }
            }
        }
    });

    let content = element_text(element);

    Some(Article::new(title, link).with_date(date).with_content(&content))
}
