use crate::domain::{FeedDefinition, FeedUpdate, StatusUpdate};
use crate::errors::PagefeedResult;

#[cfg_attr(test, mockall::automock)]
pub trait FeedStore: Send + Sync {
    /// All definitions in store order.
    fn load(&self) -> PagefeedResult<Vec<FeedDefinition>>;

    /// Replaces the entire collection.
    fn save(&self, feeds: &[FeedDefinition]) -> PagefeedResult<()>;

    fn get(&self, name: &str) -> PagefeedResult<Option<FeedDefinition>>;

    /// Inserts a new definition. Rejects duplicate names and duplicate
    /// normalized URLs without touching the file.
    fn insert(&self, feed: &FeedDefinition) -> PagefeedResult<()>;

    /// Applies the provided fields and returns the updated record. Rejects
    /// unknown names and rename collisions.
    fn apply_update(&self, name: &str, changes: &FeedUpdate) -> PagefeedResult<FeedDefinition>;

    /// Returns false when the name was unknown.
    fn remove(&self, name: &str) -> PagefeedResult<bool>;

    /// Stamps a refresh outcome onto the record. Clears `last_error` on
    /// success.
    fn record_status(&self, name: &str, outcome: &StatusUpdate) -> PagefeedResult<FeedDefinition>;
}
