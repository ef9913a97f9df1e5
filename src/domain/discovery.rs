use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    /// Points at an existing RSS/Atom feed.
    Rss,
    /// No real feed found; the page itself would have to be scraped.
    Scrape,
}

impl FeedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedKind::Rss => "rss",
            FeedKind::Scrape => "scrape",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoverySource {
    /// `<link type="application/rss+xml">` style head markup.
    Head,
    /// An anchor whose href matches a known feed path pattern.
    Link,
    /// Synthesized candidate when nothing was found or the fetch failed.
    Fallback,
}

impl DiscoverySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscoverySource::Head => "head",
            DiscoverySource::Link => "link",
            DiscoverySource::Fallback => "fallback",
        }
    }
}

/// A feed candidate found on (or synthesized for) a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredFeed {
    pub url: String,
    pub title: String,
    pub kind: FeedKind,
    pub source: DiscoverySource,
}

impl DiscoveredFeed {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        kind: FeedKind,
        source: DiscoverySource,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            kind,
            source,
        }
    }
}
