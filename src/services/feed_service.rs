use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    validate_feed_name, BulkOutcome, FeedDefinition, FeedDraft, FeedStatus, FeedUpdate,
    StatusSummary,
};
use crate::errors::{PagefeedError, PagefeedResult};
use crate::rss::RssStore;
use crate::storage::traits::FeedStore;
use crate::util::{normalize_url, now_iso};

/// Wire shape of a configuration backup.
#[derive(Debug, Serialize, Deserialize)]
struct BackupDocument {
    #[serde(default)]
    feeds: Vec<FeedDefinition>,
    #[serde(default)]
    backup_date: String,
}

/// CRUD over the stored definitions, keeping the RSS artifacts in step with
/// renames and deletions.
pub struct FeedService<S: FeedStore> {
    store: S,
    rss: RssStore,
}

impl<S: FeedStore> FeedService<S> {
    pub fn new(store: S, rss: RssStore) -> Self {
        Self { store, rss }
    }

    pub fn add(&self, draft: FeedDraft) -> PagefeedResult<FeedDefinition> {
        validate_feed_name(&draft.name).map_err(PagefeedError::Validation)?;
        if draft.url.trim().is_empty() {
            return Err(PagefeedError::Validation(
                "feed URL must not be empty".to_string(),
            ));
        }
        let feed = FeedDefinition::from_draft(draft);
        self.store.insert(&feed)?;
        info!(feed = %feed.name, url = %feed.url, "feed added");
        Ok(feed)
    }

    /// Creates many feeds at once. URLs already configured are skipped, as
    /// are repeats within the input; other failures are collected per item.
    pub fn add_bulk(&self, drafts: Vec<FeedDraft>) -> PagefeedResult<BulkOutcome> {
        let existing: HashSet<String> = self
            .store
            .load()?
            .iter()
            .map(|f| normalize_url(&f.url))
            .collect();
        let mut batch: HashSet<String> = HashSet::new();

        let mut outcome = BulkOutcome::default();
        for draft in drafts {
            let normalized = normalize_url(&draft.url);
            if existing.contains(&normalized) {
                outcome.record_skipped(&draft.name, &draft.url, "URL already exists");
                continue;
            }
            if batch.contains(&normalized) {
                outcome.record_skipped(&draft.name, &draft.url, "duplicate URL in input");
                continue;
            }

            let name = draft.name.clone();
            match self.add(draft) {
                Ok(feed) => {
                    batch.insert(normalized);
                    outcome.record_created(feed);
                }
                Err(e) => outcome.record_error(&name, &e.to_string()),
            }
        }
        Ok(outcome)
    }

    pub fn list(&self) -> PagefeedResult<Vec<FeedDefinition>> {
        self.store.load()
    }

    pub fn get(&self, name: &str) -> PagefeedResult<FeedDefinition> {
        self.store
            .get(name)?
            .ok_or_else(|| PagefeedError::FeedNotFound(name.to_string()))
    }

    /// Applies the given changes. A rename also moves the RSS artifact so the
    /// feed keeps serving under its new URL.
    pub fn update(&self, name: &str, changes: FeedUpdate) -> PagefeedResult<FeedDefinition> {
        if let Some(new_name) = changes.new_name.as_deref() {
            if new_name != name {
                validate_feed_name(new_name).map_err(PagefeedError::Validation)?;
            }
        }
        let updated = self.store.apply_update(name, &changes)?;
        if updated.name != name {
            self.rss.rename(name, &updated.name)?;
            info!(from = name, to = %updated.name, "feed renamed");
        }
        Ok(updated)
    }

    /// Removes the definition and its artifact. False when the name was
    /// unknown.
    pub fn remove(&self, name: &str) -> PagefeedResult<bool> {
        let removed = self.store.remove(name)?;
        if removed {
            self.rss.delete(name)?;
            info!(feed = name, "feed removed");
        }
        Ok(removed)
    }

    /// Per-name removal outcomes; unknown names report false instead of
    /// stopping the batch.
    pub fn remove_many(&self, names: &[String]) -> PagefeedResult<Vec<(String, bool)>> {
        let mut results = Vec::with_capacity(names.len());
        for name in names {
            let removed = self.remove(name)?;
            results.push((name.clone(), removed));
        }
        Ok(results)
    }

    /// Serializes the whole configuration as a restorable JSON document.
    pub fn backup(&self) -> PagefeedResult<String> {
        let doc = BackupDocument {
            feeds: self.store.load()?,
            backup_date: now_iso(),
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// Replaces the stored configuration with the feeds from a backup
    /// document, returning how many were restored.
    pub fn restore(&self, content: &str) -> PagefeedResult<usize> {
        let doc: BackupDocument = serde_json::from_str(content)?;
        self.store.save(&doc.feeds)?;
        info!(count = doc.feeds.len(), "configuration restored from backup");
        Ok(doc.feeds.len())
    }

    pub fn status_summary(&self) -> PagefeedResult<StatusSummary> {
        let feeds = self.store.load()?;
        let success = feeds
            .iter()
            .filter(|f| f.last_status == Some(FeedStatus::Success))
            .count();
        let error = feeds
            .iter()
            .filter(|f| f.last_status == Some(FeedStatus::Error))
            .count();
        let last_update = feeds
            .iter()
            .filter_map(|f| f.last_update.as_deref())
            .max()
            .map(str::to_string);

        Ok(StatusSummary {
            total: feeds.len(),
            success,
            error,
            last_update,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{JsonFeedStore, JsonStorage};
    use tempfile::TempDir;

    fn setup(dir: &TempDir) -> FeedService<JsonFeedStore> {
        let storage = JsonStorage::new(dir.path().join("db").join("feeds.json"));
        let rss = RssStore::new(dir.path().join("feeds"), "http://localhost:5000");
        FeedService::new(JsonFeedStore::new(storage), rss)
    }

    fn artifacts(dir: &TempDir) -> RssStore {
        RssStore::new(dir.path().join("feeds"), "http://localhost:5000")
    }

    #[test]
    fn test_add_and_get() {
        let dir = TempDir::new().unwrap();
        let service = setup(&dir);

        service
            .add(FeedDraft::new("news", "https://example.com/news"))
            .unwrap();

        let feed = service.get("news").unwrap();
        assert_eq!(feed.url, "https://example.com/news");
    }

    #[test]
    fn test_add_rejects_path_unsafe_name() {
        let dir = TempDir::new().unwrap();
        let service = setup(&dir);

        let result = service.add(FeedDraft::new("../etc", "https://example.com"));
        assert!(matches!(result, Err(PagefeedError::Validation(_))));
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_add_rejects_empty_url() {
        let dir = TempDir::new().unwrap();
        let service = setup(&dir);

        let result = service.add(FeedDraft::new("news", "  "));
        assert!(matches!(result, Err(PagefeedError::Validation(_))));
    }

    #[test]
    fn test_get_unknown_is_not_found() {
        let dir = TempDir::new().unwrap();
        let service = setup(&dir);
        assert!(matches!(
            service.get("ghost"),
            Err(PagefeedError::FeedNotFound(_))
        ));
    }

    #[test]
    fn test_rename_moves_artifact_with_identical_content() {
        let dir = TempDir::new().unwrap();
        let service = setup(&dir);
        let rss = artifacts(&dir);

        service
            .add(FeedDraft::new("old-name", "https://example.com/news"))
            .unwrap();
        rss.write("old-name", "<rss>payload</rss>").unwrap();

        let changes = FeedUpdate {
            new_name: Some("new-name".to_string()),
            ..FeedUpdate::default()
        };
        let updated = service.update("old-name", changes).unwrap();

        assert_eq!(updated.name, "new-name");
        assert!(!rss.exists("old-name"));
        assert_eq!(
            std::fs::read_to_string(rss.path_for("new-name")).unwrap(),
            "<rss>payload</rss>"
        );
    }

    #[test]
    fn test_remove_deletes_artifact() {
        let dir = TempDir::new().unwrap();
        let service = setup(&dir);
        let rss = artifacts(&dir);

        service
            .add(FeedDraft::new("news", "https://example.com/news"))
            .unwrap();
        rss.write("news", "<rss/>").unwrap();

        assert!(service.remove("news").unwrap());
        assert!(!rss.exists("news"));
    }

    #[test]
    fn test_remove_unknown_returns_false() {
        let dir = TempDir::new().unwrap();
        let service = setup(&dir);
        assert!(!service.remove("ghost").unwrap());
    }

    #[test]
    fn test_remove_many_isolates_unknown_names() {
        let dir = TempDir::new().unwrap();
        let service = setup(&dir);

        service
            .add(FeedDraft::new("news", "https://example.com/news"))
            .unwrap();

        let results = service
            .remove_many(&["news".to_string(), "ghost".to_string()])
            .unwrap();
        assert_eq!(
            results,
            vec![("news".to_string(), true), ("ghost".to_string(), false)]
        );
    }

    #[test]
    fn test_add_bulk_classifies_each_draft() {
        let dir = TempDir::new().unwrap();
        let service = setup(&dir);

        service
            .add(FeedDraft::new("existing", "https://example.com/news"))
            .unwrap();

        let outcome = service
            .add_bulk(vec![
                FeedDraft::new("dup-store", "https://www.example.com/news/"),
                FeedDraft::new("fresh", "https://example.com/blog"),
                FeedDraft::new("dup-input", "https://example.com/blog"),
                FeedDraft::new("bad name", "https://example.com/other"),
            ])
            .unwrap();

        assert_eq!(outcome.created_count(), 1);
        assert_eq!(outcome.skipped, 2);
        assert_eq!(outcome.errors, 1);
        assert_eq!(outcome.skipped_details[0].reason, "URL already exists");
        assert_eq!(outcome.skipped_details[1].reason, "duplicate URL in input");
        assert_eq!(outcome.error_details[0].name, "bad name");
    }

    #[test]
    fn test_backup_restore_round_trip() {
        let dir = TempDir::new().unwrap();
        let service = setup(&dir);

        service
            .add(FeedDraft::new("a", "https://a.example"))
            .unwrap();
        service
            .add(FeedDraft::new("b", "https://b.example"))
            .unwrap();

        let backup = service.backup().unwrap();
        service.remove("a").unwrap();
        service.remove("b").unwrap();
        assert!(service.list().unwrap().is_empty());

        let restored = service.restore(&backup).unwrap();
        assert_eq!(restored, 2);
        let names: Vec<String> = service
            .list()
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_restore_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let service = setup(&dir);
        assert!(service.restore("{not json").is_err());
    }

    #[test]
    fn test_status_summary_counts_and_latest_update() {
        let dir = TempDir::new().unwrap();
        let service = setup(&dir);

        let empty = service.status_summary().unwrap();
        assert_eq!(empty.total, 0);
        assert!(empty.last_update.is_none());

        service
            .add(FeedDraft::new("news", "https://example.com/news"))
            .unwrap();
        let summary = service.status_summary().unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.success, 0);
        assert_eq!(summary.error, 0);
    }
}
