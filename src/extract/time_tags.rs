use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::domain::Article;
use crate::extract::element::{element_text, resolve_href};
use crate::extract::traits::ExtractionStrategy;
use crate::extract::{MAX_ARTICLES, MIN_LINK_TITLE_CHARS};

/// Pages that mark entry dates with `<time>` elements. The anchor is the
/// time's parent when the date sits inside the link, otherwise the nearest
/// anchor after it in document order.
pub struct TimeTagStrategy;

impl ExtractionStrategy for TimeTagStrategy {
    fn name(&self) -> &'static str {
        "time-tags"
    }

    fn extract(&self, document: &Html, base_url: &Url) -> Vec<Article> {
        let times = Selector::parse("time").unwrap();
        let mut articles = Vec::new();

        for time_el in document.select(&times).take(MAX_ARTICLES) {
            let anchor = match parent_anchor(time_el).or_else(|| following_anchor(time_el)) {
                Some(a) => a,
                None => continue,
            };

            let href = anchor.value().attr("href").unwrap_or("");
            let title = element_text(anchor);
            if href.is_empty() || title.chars().count() <= MIN_LINK_TITLE_CHARS {
                continue;
            }
            let url = match resolve_href(base_url, href) {
                Some(u) => u,
                None => continue,
            };

            let date = time_el.value().attr("datetime").map(str::to_string).or_else(|| {
                let text = element_text(time_el);
                if text.is_empty() {
                    None
                } else {
                    Some(text)
                }
            });

            articles.push(Article::new(title, url).with_date(date));
        }

        articles
    }
}

fn parent_anchor(time_el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let parent = time_el.parent().and_then(ElementRef::wrap)?;
    if parent.value().name() == "a" {
        Some(parent)
    } else {
        None
    }
}

/// Nearest anchor after the element in document order: inside it first, then
/// across following siblings (descendants included), climbing to ancestors'
/// later siblings.
fn following_anchor(time_el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let anchors = Selector::parse("a[href]").unwrap();

    if let Some(found) = time_el.select(&anchors).next() {
        return Some(found);
    }

    let mut scope = Some(*time_el);
    while let Some(node) = scope {
        let mut sibling = node.next_sibling();
        while let Some(s) = sibling {
            if let Some(el) = ElementRef::wrap(s) {
                if el.value().name() == "a" && el.value().attr("href").is_some() {
                    return Some(el);
                }
                if let Some(found) = el.select(&anchors).next() {
                    return Some(found);
                }
            }
            sibling = s.next_sibling();
        }
        scope = node.parent();
    }
    None
}
