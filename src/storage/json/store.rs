use crate::domain::{FeedDefinition, FeedStatus, FeedUpdate, StatusUpdate};
use crate::errors::{PagefeedError, PagefeedResult};
use crate::storage::json::JsonStorage;
use crate::storage::traits::FeedStore;
use crate::util::{normalize_url, now_iso};

pub struct JsonFeedStore {
    storage: JsonStorage,
}

impl JsonFeedStore {
    pub fn new(storage: JsonStorage) -> Self {
        Self { storage }
    }
}

impl FeedStore for JsonFeedStore {
    fn load(&self) -> PagefeedResult<Vec<FeedDefinition>> {
        let file = self.storage.file()?;
        file.read()
    }

    fn save(&self, feeds: &[FeedDefinition]) -> PagefeedResult<()> {
        let file = self.storage.file()?;
        file.write(feeds)
    }

    fn get(&self, name: &str) -> PagefeedResult<Option<FeedDefinition>> {
        let file = self.storage.file()?;
        let feeds = file.read()?;
        Ok(feeds.into_iter().find(|f| f.name == name))
    }

    fn insert(&self, feed: &FeedDefinition) -> PagefeedResult<()> {
        let file = self.storage.file()?;
        let mut feeds = file.read()?;

        // Checks run under the same guard that writes the file back
        if feeds.iter().any(|f| f.name == feed.name) {
            return Err(PagefeedError::FeedAlreadyExists(feed.name.clone()));
        }
        let normalized = normalize_url(&feed.url);
        if let Some(existing) = feeds.iter().find(|f| normalize_url(&f.url) == normalized) {
            return Err(PagefeedError::Validation(format!(
                "URL already configured for feed '{}'",
                existing.name
            )));
        }

        feeds.push(feed.clone());
        file.write(&feeds)
    }

    fn apply_update(&self, name: &str, changes: &FeedUpdate) -> PagefeedResult<FeedDefinition> {
        let file = self.storage.file()?;
        let mut feeds = file.read()?;

        if let Some(new_name) = &changes.new_name {
            if new_name != name && feeds.iter().any(|f| f.name == *new_name) {
                return Err(PagefeedError::FeedAlreadyExists(new_name.clone()));
            }
        }

        let feed = feeds
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| PagefeedError::FeedNotFound(name.to_string()))?;

        if let Some(new_name) = &changes.new_name {
            feed.name = new_name.clone();
        }
        if let Some(url) = &changes.url {
            feed.url = url.clone();
        }
        if let Some(selector) = &changes.css_selector {
            feed.css_selector = selector.clone();
        }
        if let Some(description) = &changes.description {
            feed.description = description.clone();
        }
        let updated = feed.clone();

        file.write(&feeds)?;
        Ok(updated)
    }

    fn remove(&self, name: &str) -> PagefeedResult<bool> {
        let file = self.storage.file()?;
        let mut feeds = file.read()?;

        let before = feeds.len();
        feeds.retain(|f| f.name != name);
        if feeds.len() == before {
            return Ok(false);
        }

        file.write(&feeds)?;
        Ok(true)
    }

    fn record_status(&self, name: &str, outcome: &StatusUpdate) -> PagefeedResult<FeedDefinition> {
        let file = self.storage.file()?;
        let mut feeds = file.read()?;

        let feed = feeds
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| PagefeedError::FeedNotFound(name.to_string()))?;

        feed.last_update = Some(now_iso());
        feed.last_status = Some(outcome.status);
        feed.article_count = outcome.article_count;
        feed.last_error = match outcome.status {
            FeedStatus::Error => outcome.error.clone(),
            FeedStatus::Success => None,
        };
        let updated = feed.clone();

        file.write(&feeds)?;
        Ok(updated)
    }
}
