use chrono::{DateTime, NaiveDate, NaiveDateTime};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::domain::{Article, FeedDefinition};
use crate::errors::PagefeedResult;

/// At most this many articles become RSS items.
pub const MAX_ITEMS: usize = 30;

const PLACEHOLDER_TITLE: &str = "no articles found";
const PLACEHOLDER_CONTENT: &str = "The feed could not extract any articles from the page.";

/// Renders a feed definition and its extracted articles as an RSS 2.0
/// document. An empty article list yields a single placeholder item so the
/// channel is never empty.
pub fn render_rss(
    feed: &FeedDefinition,
    articles: &[Article],
    self_url: &str,
) -> PagefeedResult<String> {
    let placeholder;
    let items: &[Article] = if articles.is_empty() {
        placeholder = [placeholder_item(feed)];
        &placeholder
    } else {
        articles
    };

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut rss_start = BytesStart::new("rss");
    rss_start.push_attribute(("version", "2.0"));
    rss_start.push_attribute(("xmlns:atom", "http://www.w3.org/2005/Atom"));
    writer.write_event(Event::Start(rss_start))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut writer, "title", &feed.name)?;
    write_text_element(&mut writer, "link", &feed.url)?;
    write_text_element(&mut writer, "description", channel_description(feed))?;
    write_text_element(&mut writer, "language", "de")?;

    let mut self_link = BytesStart::new("atom:link");
    self_link.push_attribute(("href", self_url));
    self_link.push_attribute(("rel", "self"));
    self_link.push_attribute(("type", "application/rss+xml"));
    writer.write_event(Event::Empty(self_link))?;

    for article in items.iter().take(MAX_ITEMS) {
        writer.write_event(Event::Start(BytesStart::new("item")))?;

        let title = if article.title.is_empty() {
            "untitled"
        } else {
            article.title.as_str()
        };
        write_text_element(&mut writer, "title", title)?;

        let link = if article.url.is_empty() {
            feed.url.as_str()
        } else {
            article.url.as_str()
        };
        write_text_element(&mut writer, "link", link)?;

        write_text_element(&mut writer, "description", &article.content)?;

        if let Some(date) = article.date_published.as_deref().and_then(parse_pub_date) {
            write_text_element(&mut writer, "pubDate", &date)?;
        }

        writer.write_event(Event::End(BytesEnd::new("item")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    let out = writer.into_inner();
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn placeholder_item(feed: &FeedDefinition) -> Article {
    Article::new(PLACEHOLDER_TITLE, feed.url.as_str()).with_content(PLACEHOLDER_CONTENT)
}

fn channel_description(feed: &FeedDefinition) -> &str {
    if !feed.description.is_empty() {
        &feed.description
    } else if !feed.url.is_empty() {
        &feed.url
    } else {
        &feed.name
    }
}

fn write_text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> PagefeedResult<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(&sanitize_text(text))))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

// Strip control characters that are invalid in XML, keeping tab, LF and CR.
fn sanitize_text(input: &str) -> String {
    input
        .chars()
        .filter(|&c| {
            let code = c as u32;
            code == 0x09 || code == 0x0A || code == 0x0D || code >= 0x20
        })
        .collect()
}

/// Parses the date formats seen in the wild and renders them as RFC 2822 for
/// the pubDate element. Anything unparseable is dropped by the caller.
fn parse_pub_date(raw: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.to_rfc2822());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.to_rfc2822());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().to_rfc2822());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc().to_rfc2822());
    }
    None
}
