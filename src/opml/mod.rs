use once_cell::sync::Lazy;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use regex::Regex;
use tracing::debug;

use crate::domain::{FeedDefinition, FeedDraft};
use crate::errors::PagefeedResult;
use crate::util::{now_iso, truncate_chars};

/// Longest feed name derived from an OPML outline.
pub const MAX_SLUG_CHARS: usize = 50;

const IMPORT_DESCRIPTION: &str = "Imported from OPML";
const DEFAULT_CATEGORY: &str = "uncategorized";

// Import works by pattern matching on outline tags rather than a full XML
// parse, so truncated or otherwise broken OPML still yields every outline
// that happens to be intact.
static OUTLINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<outline[^>]*\sxmlUrl="[^"]+"[^>]*/?>"#).unwrap());
static XML_URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\sxmlUrl="([^"]+)""#).unwrap());
static TEXT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\stext="([^"]*)""#).unwrap());
static HTML_URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\shtmlUrl="([^"]*)""#).unwrap());

/// Extracts feed drafts from OPML content. Outlines without an `xmlUrl`
/// attribute (category folders) are skipped; `htmlUrl` wins over `xmlUrl` as
/// the source URL because the scraper wants the page, not an existing feed.
pub fn parse_opml(content: &str) -> Vec<FeedDraft> {
    let mut drafts = Vec::new();

    for tag in OUTLINE_RE.find_iter(content) {
        let tag = tag.as_str();
        let xml_url = match XML_URL_RE.captures(tag).and_then(|c| c.get(1)) {
            Some(m) => m.as_str(),
            None => continue,
        };
        let text = TEXT_RE
            .captures(tag)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .unwrap_or("Unnamed");
        let html_url = HTML_URL_RE
            .captures(tag)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .unwrap_or("");

        let url = if html_url.is_empty() { xml_url } else { html_url };
        drafts.push(FeedDraft::new(slugify(text), url).with_description(IMPORT_DESCRIPTION));
    }

    debug!(count = drafts.len(), "parsed OPML outlines");
    drafts
}

/// Derives a path-safe feed name from an outline's `text` attribute:
/// lowercased, spaces and slashes turned into hyphens, everything else
/// non-alphanumeric dropped, capped at 50 characters.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase().replace([' ', '/'], "-");
    let cleaned: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    truncate_chars(&cleaned, MAX_SLUG_CHARS)
}

/// Renders the stored feeds as an OPML 2.0 document, grouped into category
/// outlines by description in first-seen order. Feeds without a description
/// land in the "uncategorized" bucket.
pub fn generate_opml(feeds: &[FeedDefinition], public_url: &str) -> PagefeedResult<String> {
    let mut categories: Vec<(&str, Vec<&FeedDefinition>)> = Vec::new();
    for feed in feeds {
        let category = if feed.description.is_empty() {
            DEFAULT_CATEGORY
        } else {
            feed.description.as_str()
        };
        match categories.iter_mut().find(|(name, _)| *name == category) {
            Some((_, members)) => members.push(feed),
            None => categories.push((category, vec![feed])),
        }
    }

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut opml = BytesStart::new("opml");
    opml.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(opml))?;

    writer.write_event(Event::Start(BytesStart::new("head")))?;
    writer.write_event(Event::Start(BytesStart::new("title")))?;
    writer.write_event(Event::Text(BytesText::new("pagefeed exports")))?;
    writer.write_event(Event::End(BytesEnd::new("title")))?;
    writer.write_event(Event::Start(BytesStart::new("dateCreated")))?;
    writer.write_event(Event::Text(BytesText::new(&now_iso())))?;
    writer.write_event(Event::End(BytesEnd::new("dateCreated")))?;
    writer.write_event(Event::End(BytesEnd::new("head")))?;

    writer.write_event(Event::Start(BytesStart::new("body")))?;

    for (category, members) in &categories {
        let mut group = BytesStart::new("outline");
        group.push_attribute(("text", *category));
        writer.write_event(Event::Start(group))?;

        for feed in members {
            let feed_url = format!("{}/feed/{}.xml", public_url, feed.name);
            let mut outline = BytesStart::new("outline");
            outline.push_attribute(("type", "rss"));
            outline.push_attribute(("text", feed.name.as_str()));
            outline.push_attribute(("title", feed.name.as_str()));
            outline.push_attribute(("xmlUrl", feed_url.as_str()));
            outline.push_attribute(("htmlUrl", feed.url.as_str()));
            writer.write_event(Event::Empty(outline))?;
        }

        writer.write_event(Event::End(BytesEnd::new("outline")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("body")))?;
    writer.write_event(Event::End(BytesEnd::new("opml")))?;

    let out = writer.into_inner();
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<opml version="2.0">
  <body>
    <outline text="Tech">
      <outline type="rss" text="Hacker News" xmlUrl="https://news.ycombinator.com/rss" htmlUrl="https://news.ycombinator.com"/>
      <outline type="rss" text="Lobsters" xmlUrl="https://lobste.rs/rss"/>
    </outline>
  </body>
</opml>"#;

    #[test]
    fn test_parse_extracts_feed_outlines() {
        let drafts = parse_opml(SAMPLE);

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].name, "hacker-news");
        assert_eq!(drafts[0].url, "https://news.ycombinator.com");
        assert_eq!(drafts[0].description, "Imported from OPML");
        assert_eq!(drafts[1].name, "lobsters");
        assert_eq!(drafts[1].url, "https://lobste.rs/rss");
    }

    #[test]
    fn test_parse_skips_category_outlines() {
        let drafts = parse_opml(SAMPLE);
        assert!(drafts.iter().all(|d| d.name != "tech"));
    }

    #[test]
    fn test_parse_tolerates_broken_xml() {
        let content = r#"<opml><body><outline text="Ok" xmlUrl="https://a.example/rss"/>
            <outline text="Broken" xmlUrl="https://b.exam"#;
        let drafts = parse_opml(content);

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].name, "ok");
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_opml("not xml at all").is_empty());
    }

    #[test]
    fn test_parse_outline_without_text_named_unnamed() {
        let drafts = parse_opml(r#"<outline xmlUrl="https://a.example/rss"/>"#);
        assert_eq!(drafts[0].name, "unnamed");
    }

    #[test]
    fn test_slugify_rules() {
        assert_eq!(slugify("Tech News / Updates"), "tech-news---updates");
        assert_eq!(slugify("Café & Croissants"), "café--croissants");
        assert_eq!(slugify(&"x".repeat(80)).chars().count(), MAX_SLUG_CHARS);
    }

    fn feed(name: &str, url: &str, description: &str) -> FeedDefinition {
        FeedDefinition::from_draft(FeedDraft::new(name, url).with_description(description))
    }

    #[test]
    fn test_generate_groups_by_description() {
        let feeds = vec![
            feed("a", "https://a.example", "News & Blogs"),
            feed("b", "https://b.example", ""),
            feed("c", "https://c.example", "News & Blogs"),
        ];
        let opml = generate_opml(&feeds, "http://localhost:5000").unwrap();

        assert_eq!(opml.matches(r#"text="News &amp; Blogs""#).count(), 1);
        assert!(opml.contains(r#"text="uncategorized""#));
        assert!(opml.contains(r#"xmlUrl="http://localhost:5000/feed/a.xml""#));
        assert!(opml.contains(r#"htmlUrl="https://a.example""#));
    }

    #[test]
    fn test_round_trip_recovers_name_url_pairs() {
        let feeds = vec![
            feed("daily-news", "https://news.example/latest", "News"),
            feed("blog", "https://blog.example", ""),
        ];
        let opml = generate_opml(&feeds, "http://localhost:5000").unwrap();
        let drafts = parse_opml(&opml);

        let pairs: Vec<(&str, &str)> = drafts
            .iter()
            .map(|d| (d.name.as_str(), d.url.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("daily-news", "https://news.example/latest"),
                ("blog", "https://blog.example"),
            ]
        );
    }
}
