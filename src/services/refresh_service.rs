use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::{Article, FeedDefinition, RefreshReport, StatusUpdate};
use crate::errors::{PagefeedError, PagefeedResult};
use crate::fetch::{classify, ArticleFetcher};
use crate::rss::{render_rss, RssStore};
use crate::storage::traits::FeedStore;
use crate::util::truncate_chars;

/// Persisted error strings never exceed this length.
const MAX_ERROR_CHARS: usize = 100;

/// Drives the fetch pipeline for stored feeds and records each outcome.
pub struct RefreshService<S: FeedStore, F: ArticleFetcher> {
    store: S,
    fetcher: F,
    rss: RssStore,
    delay: Duration,
}

impl<S: FeedStore, F: ArticleFetcher> RefreshService<S, F> {
    pub fn new(store: S, fetcher: F, rss: RssStore, delay: Duration) -> Self {
        Self {
            store,
            fetcher,
            rss,
            delay,
        }
    }

    /// Refreshes one feed and returns its updated definition. The artifact is
    /// replaced only on success; a failed refresh leaves the previous
    /// document on disk.
    pub fn refresh_one(&self, name: &str) -> PagefeedResult<FeedDefinition> {
        let feed = self
            .store
            .get(name)?
            .ok_or_else(|| PagefeedError::FeedNotFound(name.to_string()))?;

        match self.fetcher.fetch_articles(&feed.url, &feed.css_selector) {
            Ok(articles) => self.publish(&feed, &articles),
            Err(e) => {
                let category = classify(&e);
                warn!(feed = name, error = %e, category = %category, "refresh failed");
                self.store.record_status(name, &StatusUpdate::failure(category))
            }
        }
    }

    /// Refreshes every stored feed in order, pausing between sites so a full
    /// run does not hammer anyone. One broken feed never stops the rest.
    pub fn refresh_all(&self) -> PagefeedResult<Vec<RefreshReport>> {
        let feeds = self.store.load()?;
        let mut reports = Vec::with_capacity(feeds.len());

        for (i, feed) in feeds.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
            reports.push(self.report_for(&feed.name));
        }

        info!(count = reports.len(), "full refresh finished");
        Ok(reports)
    }

    /// Refreshes an explicit list of feeds; unknown names become error
    /// reports instead of aborting the batch.
    pub fn refresh_many(&self, names: &[String]) -> Vec<RefreshReport> {
        names.iter().map(|name| self.report_for(name)).collect()
    }

    /// Fetches and extracts without touching any stored state.
    pub fn preview(&self, url: &str, css_selector: &str) -> PagefeedResult<Vec<Article>> {
        Ok(self.fetcher.fetch_articles(url, css_selector)?)
    }

    fn report_for(&self, name: &str) -> RefreshReport {
        match self.refresh_one(name) {
            Ok(feed) => RefreshReport::from_feed(&feed),
            Err(e) => RefreshReport::failure(name, e.to_string()),
        }
    }

    // Renders and writes the artifact, then stamps the outcome. A failed
    // write is recorded as a failed refresh.
    fn publish(
        &self,
        feed: &FeedDefinition,
        articles: &[Article],
    ) -> PagefeedResult<FeedDefinition> {
        let written = render_rss(feed, articles, &self.rss.self_url(&feed.name))
            .and_then(|xml| self.rss.write(&feed.name, &xml));

        match written {
            Ok(_) => {
                info!(feed = %feed.name, count = articles.len(), "feed refreshed");
                self.store
                    .record_status(&feed.name, &StatusUpdate::success(articles.len()))
            }
            Err(e) => {
                warn!(feed = %feed.name, error = %e, "artifact write failed");
                let message = truncate_chars(&e.to_string(), MAX_ERROR_CHARS);
                self.store
                    .record_status(&feed.name, &StatusUpdate::failure(message))
            }
        }
    }
}
