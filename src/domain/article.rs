use serde::{Deserialize, Serialize};

use crate::util::truncate_chars;

/// Longest title kept on an extracted article, in characters.
pub const MAX_TITLE_CHARS: usize = 200;

/// Longest content kept on an extracted article, in characters.
pub const MAX_CONTENT_CHARS: usize = 500;

/// One article-like entry extracted from a page.
///
/// The date is kept verbatim as found in the markup and is not guaranteed to
/// parse; consumers that need a real timestamp must parse defensively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub date_published: Option<String>,
    pub content: String,
}

impl Article {
    /// Creates an article with the truncation limits applied. Content
    /// defaults to the title; callers with richer text override it via
    /// [`Article::with_content`].
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        let title = truncate_chars(title.into().trim(), MAX_TITLE_CHARS);
        Self {
            content: title.clone(),
            title,
            url: url.into(),
            date_published: None,
        }
    }

    pub fn with_date(mut self, date: Option<String>) -> Self {
        self.date_published = date;
        self
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = truncate_chars(content.trim(), MAX_CONTENT_CHARS);
        self
    }
}
