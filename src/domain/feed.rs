use serde::{Deserialize, Serialize};

use crate::util::now_iso;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedStatus {
    Success,
    Error,
}

impl FeedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedStatus::Success => "success",
            FeedStatus::Error => "error",
        }
    }
}

impl std::str::FromStr for FeedStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success" => Ok(FeedStatus::Success),
            "error" => Ok(FeedStatus::Error),
            _ => Err(format!("Unknown feed status: {}", s)),
        }
    }
}

impl std::fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scrape target as persisted in the record store.
///
/// The name doubles as the filename stem of the RSS artifact, so it has to be
/// filesystem/URL-path safe. Status fields stay absent until the first
/// refresh; `last_error` is present only while `last_status` is `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedDefinition {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub css_selector: String,
    #[serde(default)]
    pub description: String,
    pub created: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status: Option<FeedStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(default)]
    pub article_count: usize,
}

impl FeedDefinition {
    pub fn from_draft(draft: FeedDraft) -> Self {
        Self {
            name: draft.name,
            url: draft.url,
            css_selector: draft.css_selector,
            description: draft.description,
            created: now_iso(),
            last_update: None,
            last_status: None,
            last_error: None,
            article_count: 0,
        }
    }
}

/// Creation payload; also the element type of bulk input files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedDraft {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub css_selector: String,
    #[serde(default)]
    pub description: String,
}

impl FeedDraft {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            css_selector: String::new(),
            description: String::new(),
        }
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.css_selector = selector.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Checks that a name can serve as an artifact filename and a URL path
/// segment: non-empty, alphanumerics plus `.`, `-` and `_`, and not a dot
/// path.
pub fn validate_feed_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("feed name must not be empty".to_string());
    }
    if name == "." || name == ".." {
        return Err(format!("feed name '{}' is not allowed", name));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !c.is_alphanumeric() && !matches!(c, '.' | '-' | '_'))
    {
        return Err(format!(
            "feed name contains unsupported character '{}'",
            bad
        ));
    }
    Ok(())
}

/// Partial update of a stored definition; only provided fields change.
#[derive(Debug, Clone, Default)]
pub struct FeedUpdate {
    pub new_name: Option<String>,
    pub url: Option<String>,
    pub css_selector: Option<String>,
    pub description: Option<String>,
}

/// Outcome of one refresh attempt, applied to the stored record.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub status: FeedStatus,
    pub article_count: usize,
    pub error: Option<String>,
}

impl StatusUpdate {
    pub fn success(article_count: usize) -> Self {
        Self {
            status: FeedStatus::Success,
            article_count,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: FeedStatus::Error,
            article_count: 0,
            error: Some(message.into()),
        }
    }
}
