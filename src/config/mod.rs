use std::path::PathBuf;
use std::time::Duration;

use crate::errors::PagefeedResult;

/// Browser-like identity sent with every outbound request. Some sites serve
/// empty shells or block requests from unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct Config {
    /// Root data directory; the record store and artifacts live beneath it.
    pub data_dir: PathBuf,
    /// Base URL under which artifacts are served. Used for RSS self-links and
    /// OPML xmlUrl attributes.
    pub public_url: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub discovery_timeout: Duration,
    pub max_attempts: u32,
    pub backoff_base: Duration,
    pub backoff_cap: Duration,
    /// Pause between feeds during a full refresh.
    pub refresh_delay: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let data_dir = std::env::var("PAGEFEED_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let public_url = std::env::var("PAGEFEED_PUBLIC_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string())
            .trim_end_matches('/')
            .to_string();

        let user_agent = std::env::var("PAGEFEED_USER_AGENT")
            .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());

        Self {
            data_dir,
            public_url,
            user_agent,
            request_timeout: Duration::from_secs(30),
            discovery_timeout: Duration::from_secs(15),
            max_attempts: 3,
            backoff_base: Duration::from_secs(2),
            backoff_cap: Duration::from_secs(10),
            refresh_delay: Duration::from_secs(1),
        }
    }

    /// Path of the JSON record store.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("db").join("feeds.json")
    }

    /// Directory holding one RSS artifact per feed.
    pub fn feeds_dir(&self) -> PathBuf {
        self.data_dir.join("feeds")
    }

    pub fn ensure_dirs(&self) -> PagefeedResult<()> {
        std::fs::create_dir_all(self.data_dir.join("db"))?;
        std::fs::create_dir_all(self.feeds_dir())?;
        Ok(())
    }
}
