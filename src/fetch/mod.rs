use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use scraper::Html;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::domain::Article;
use crate::extract::extract_articles;

mod classify;
mod error;

pub use classify::classify;
pub use error::FetchError;

/// Accept header mirroring what a desktop browser sends for a page load.
const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
const ACCEPT_LANG: &str = "de-DE,de;q=0.9,en;q=0.8";

/// Seam for refresh orchestration, so it can be exercised without network.
#[cfg_attr(test, mockall::automock)]
pub trait ArticleFetcher: Send + Sync {
    fn fetch_articles(&self, url: &str, css_selector: &str) -> Result<Vec<Article>, FetchError>;
}

pub struct PageFetcher {
    client: Client,
    user_agent: String,
    max_attempts: u32,
    backoff_base: Duration,
    backoff_cap: Duration,
}

impl PageFetcher {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::builder()
                .timeout(config.request_timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            user_agent: config.user_agent.clone(),
            max_attempts: config.max_attempts,
            backoff_base: config.backoff_base,
            backoff_cap: config.backoff_cap,
        }
    }

    /// One GET with browser-like headers; non-2xx statuses are errors.
    pub fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, ACCEPT_HTML)
            .header(ACCEPT_LANGUAGE, ACCEPT_LANG)
            .send()?
            .error_for_status()?;
        Ok(response.text()?)
    }

    fn attempt(&self, url: &str, base: &Url, css_selector: &str) -> Result<Vec<Article>, FetchError> {
        let body = self.fetch_page(url)?;
        let document = Html::parse_document(&body);
        let selector = match css_selector.trim() {
            "" => None,
            s => Some(s),
        };
        Ok(extract_articles(&document, base, selector))
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(2);
        self.backoff_base
            .saturating_mul(2_u32.saturating_pow(exponent))
            .min(self.backoff_cap)
    }
}

impl ArticleFetcher for PageFetcher {
    /// Fetches the page and runs extraction, retrying the whole attempt on
    /// any failure with exponential backoff. Zero extracted articles is a
    /// success, not an error.
    fn fetch_articles(&self, url: &str, css_selector: &str) -> Result<Vec<Article>, FetchError> {
        // A structurally broken URL cannot start working, so it skips the
        // retry loop entirely.
        let base =
            Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;

        let mut last_error = None;
        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                let wait = self.backoff(attempt);
                debug!(url, attempt, wait_ms = wait.as_millis() as u64, "retrying fetch");
                thread::sleep(wait);
            }

            match self.attempt(url, &base, css_selector) {
                Ok(articles) => {
                    debug!(url, count = articles.len(), "fetch succeeded");
                    return Ok(articles);
                }
                Err(err) => {
                    warn!(url, attempt, error = %err, "fetch attempt failed");
                    last_error = Some(err);
                }
            }
        }

        Err(FetchError::RetriesExhausted {
            attempts: self.max_attempts,
            source: Box::new(
                last_error.unwrap_or_else(|| FetchError::Other("no attempts were made".into())),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> PageFetcher {
        let config = Config {
            data_dir: "./data".into(),
            public_url: "http://localhost:5000".to_string(),
            user_agent: "test-agent".to_string(),
            request_timeout: Duration::from_secs(5),
            discovery_timeout: Duration::from_secs(5),
            max_attempts: 3,
            backoff_base: Duration::from_secs(2),
            backoff_cap: Duration::from_secs(10),
            refresh_delay: Duration::ZERO,
        };
        PageFetcher::new(&config)
    }

    #[test]
    fn test_backoff_doubles_from_base_with_cap() {
        let fetcher = fetcher();
        assert_eq!(fetcher.backoff(2), Duration::from_secs(2));
        assert_eq!(fetcher.backoff(3), Duration::from_secs(4));
        assert_eq!(fetcher.backoff(4), Duration::from_secs(8));
        assert_eq!(fetcher.backoff(5), Duration::from_secs(10));
        assert_eq!(fetcher.backoff(6), Duration::from_secs(10));
    }

    #[test]
    fn test_missing_scheme_fails_without_retrying() {
        let fetcher = fetcher();
        let err = fetcher.fetch_articles("example.com/news", "").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
