use thiserror::Error;

use crate::fetch::FetchError;

#[derive(Error, Debug)]
pub enum PagefeedError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Feed errors
    #[error("Feed validation failed: {0}")]
    Validation(String),

    #[error("Feed not found: {0}")]
    FeedNotFound(String),

    #[error("Feed already exists: {0}")]
    FeedAlreadyExists(String),

    // Network errors
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    // Parsing errors
    #[error("OPML parsing failed: {0}")]
    OpmlParse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    // Storage errors
    #[error("Store error: {0}")]
    Store(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type PagefeedResult<T> = Result<T, PagefeedError>;
