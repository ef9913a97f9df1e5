use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::domain::{DiscoveredFeed, DiscoverySource, FeedKind};

/// Discovery returns at most this many candidates.
pub const MAX_CANDIDATES: usize = 10;

// Href shapes under which sites conventionally expose their feeds.
static FEED_PATH_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)/feed/?",
        r"(?i)/rss/?",
        r"(?i)/atom/?",
        r"(?i)\.rss$",
        r"(?i)/feed\.xml",
        r"(?i)/rss\.xml",
        r"(?i)/atom\.xml",
        r"(?i)/feed/rss",
        r"(?i)/news/rss",
        r"(?i)/blog/feed",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Finds feed candidates on a page: advertised `<link>` feeds first, then
/// anchors that look like feed paths. Never fails; a page without findings
/// (or an unreachable one) yields a single scrape-the-page candidate.
pub struct FeedDiscovery {
    client: Client,
    user_agent: String,
}

impl FeedDiscovery {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(config.discovery_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            user_agent: config.user_agent.clone(),
        }
    }

    pub fn discover(&self, url: &str) -> Vec<DiscoveredFeed> {
        let url = ensure_scheme(url);

        let mut found = match self.fetch_document(&url) {
            Ok(body) => {
                let document = Html::parse_document(&body);
                match Url::parse(&url) {
                    Ok(base) => scan_document(&document, &base),
                    Err(_) => Vec::new(),
                }
            }
            Err(e) => {
                warn!(url = %url, error = %e, "discovery fetch failed");
                Vec::new()
            }
        };

        if found.is_empty() {
            found.push(fallback_candidate(&url));
        }
        found.truncate(MAX_CANDIDATES);
        debug!(url = %url, count = found.len(), "discovery finished");
        found
    }

    // Single attempt on purpose; discovery is interactive and should answer
    // quickly rather than retry.
    fn fetch_document(&self, url: &str) -> Result<String, reqwest::Error> {
        self.client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()?
            .text()
    }
}

fn scan_document(document: &Html, base: &Url) -> Vec<DiscoveredFeed> {
    let mut feeds: Vec<DiscoveredFeed> = Vec::new();

    let head_links = Selector::parse(
        r#"link[type="application/rss+xml"], link[type="application/atom+xml"]"#,
    )
    .unwrap();
    for link in document.select(&head_links) {
        let href = link.value().attr("href").unwrap_or("");
        if href.is_empty() {
            continue;
        }
        let resolved = match base.join(href) {
            Ok(u) => u.to_string(),
            Err(_) => continue,
        };
        if feeds.iter().any(|f| f.url == resolved) {
            continue;
        }
        let title = link.value().attr("title").unwrap_or("RSS Feed");
        feeds.push(DiscoveredFeed::new(
            resolved,
            title,
            FeedKind::Rss,
            DiscoverySource::Head,
        ));
    }

    let anchors = Selector::parse("a[href]").unwrap();
    for anchor in document.select(&anchors) {
        let href = anchor.value().attr("href").unwrap_or("");
        if href.is_empty() || !matches_feed_pattern(href) {
            continue;
        }
        let resolved = match base.join(href) {
            Ok(u) => u.to_string(),
            Err(_) => continue,
        };
        if feeds.iter().any(|f| f.url == resolved) {
            continue;
        }
        let text = anchor_text(anchor);
        let title = if text.is_empty() { "RSS Feed" } else { &text };
        feeds.push(DiscoveredFeed::new(
            resolved,
            title,
            FeedKind::Rss,
            DiscoverySource::Link,
        ));
    }

    feeds
}

fn matches_feed_pattern(href: &str) -> bool {
    FEED_PATH_PATTERNS.iter().any(|p| p.is_match(href))
}

fn anchor_text(anchor: ElementRef) -> String {
    anchor
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn ensure_scheme(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

fn fallback_candidate(url: &str) -> DiscoveredFeed {
    let title = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_else(|| url.to_string());
    DiscoveredFeed::new(url, title, FeedKind::Scrape, DiscoverySource::Fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    #[test]
    fn test_head_links_found_first() {
        let doc = Html::parse_document(
            r#"<head>
                 <link rel="alternate" type="application/rss+xml" title="Main feed" href="/rss.xml">
                 <link rel="alternate" type="application/atom+xml" href="/atom.xml">
               </head>"#,
        );
        let feeds = scan_document(&doc, &base());

        assert_eq!(feeds.len(), 2);
        assert_eq!(feeds[0].url, "https://example.com/rss.xml");
        assert_eq!(feeds[0].title, "Main feed");
        assert_eq!(feeds[0].kind, FeedKind::Rss);
        assert_eq!(feeds[0].source, DiscoverySource::Head);
        assert_eq!(feeds[1].title, "RSS Feed");
    }

    #[test]
    fn test_anchor_feed_paths_found() {
        let doc = Html::parse_document(
            r#"<a href="/blog/feed">Blog feed</a>
               <a href="/about">About us</a>"#,
        );
        let feeds = scan_document(&doc, &base());

        assert_eq!(feeds.len(), 1);
        assert_eq!(feeds[0].url, "https://example.com/blog/feed");
        assert_eq!(feeds[0].title, "Blog feed");
        assert_eq!(feeds[0].source, DiscoverySource::Link);
    }

    #[test]
    fn test_duplicate_urls_reported_once() {
        let doc = Html::parse_document(
            r#"<link type="application/rss+xml" href="/rss.xml">
               <a href="/rss.xml">Subscribe</a>
               <a href="/rss.xml">Also subscribe</a>"#,
        );
        let feeds = scan_document(&doc, &base());
        assert_eq!(feeds.len(), 1);
        assert_eq!(feeds[0].source, DiscoverySource::Head);
    }

    #[test]
    fn test_pattern_matching_is_case_insensitive() {
        assert!(matches_feed_pattern("/FEED"));
        assert!(matches_feed_pattern("https://example.com/news/RSS"));
        assert!(matches_feed_pattern("podcast.RSS"));
        assert!(!matches_feed_pattern("/contact"));
    }

    #[test]
    fn test_scheme_prepended_when_missing() {
        assert_eq!(ensure_scheme("example.com"), "https://example.com");
        assert_eq!(ensure_scheme("http://example.com"), "http://example.com");
    }

    #[test]
    fn test_fallback_candidate_uses_stripped_host() {
        let candidate = fallback_candidate("https://www.example.com/news");
        assert_eq!(candidate.title, "example.com");
        assert_eq!(candidate.kind, FeedKind::Scrape);
        assert_eq!(candidate.source, DiscoverySource::Fallback);
        assert_eq!(candidate.url, "https://www.example.com/news");
    }
}
