use chrono::{SecondsFormat, Utc};
use url::Url;

/// Current time as an RFC 3339 string, the format used for all stored
/// timestamps. Second precision keeps the strings lexicographically
/// comparable.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Truncates a string to at most `max_chars` characters without splitting a
/// character in the middle.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// Canonical URL form used for the uniqueness check and import dedup.
///
/// Scheme and host are lowercased, a leading `www.` is dropped, trailing
/// slashes are stripped (a bare root stays `/`), the query is kept and the
/// fragment dropped. Input without a scheme is treated as https. Input that
/// does not parse at all is returned trimmed, unchanged.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let parsed = Url::parse(trimmed).or_else(|_| Url::parse(&format!("https://{trimmed}")));
    let url = match parsed {
        Ok(url) => url,
        Err(_) => return trimmed.to_string(),
    };

    let host = url.host_str().unwrap_or("");
    let host = host.strip_prefix("www.").unwrap_or(host);

    let path = url.path().trim_end_matches('/');
    let path = if path.is_empty() { "/" } else { path };

    let mut normalized = format!("{}://{}", url.scheme(), host);
    if let Some(port) = url.port() {
        normalized.push_str(&format!(":{port}"));
    }
    normalized.push_str(path);
    if let Some(query) = url.query() {
        normalized.push('?');
        normalized.push_str(query);
    }
    normalized
}
