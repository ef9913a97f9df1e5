use std::collections::HashSet;

use tracing::info;

use crate::domain::{validate_feed_name, BulkOutcome, FeedDefinition};
use crate::errors::{PagefeedError, PagefeedResult};
use crate::opml::{generate_opml, parse_opml};
use crate::storage::traits::FeedStore;
use crate::util::normalize_url;

/// OPML interchange over the record store.
pub struct ImportExportService<S: FeedStore> {
    store: S,
    public_url: String,
}

impl<S: FeedStore> ImportExportService<S> {
    pub fn new(store: S, public_url: impl Into<String>) -> Self {
        Self {
            store,
            public_url: public_url.into(),
        }
    }

    /// Imports every outline that is not already configured. Per-item
    /// failures are collected, never propagated; OPML without a single
    /// usable outline is rejected outright.
    pub fn import(&self, content: &str) -> PagefeedResult<BulkOutcome> {
        let drafts = parse_opml(content);
        if drafts.is_empty() {
            return Err(PagefeedError::OpmlParse(
                "no feeds found in OPML".to_string(),
            ));
        }

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
                outcome.record_skipped(&draft.name, &draft.url, "duplicate URL in OPML");
                continue;
            }
            if let Err(reason) = validate_feed_name(&draft.name) {
                outcome.record_error(&draft.name, &reason);
                continue;
            }

            let feed = FeedDefinition::from_draft(draft);
            match self.store.insert(&feed) {
                Ok(()) => {
                    batch.insert(normalized);
                    outcome.record_created(feed);
                }
                Err(e) => outcome.record_error(&feed.name, &e.to_string()),
            }
        }

        info!(
            created = outcome.created_count(),
            skipped = outcome.skipped,
            errors = outcome.errors,
            "OPML import finished"
        );
        Ok(outcome)
    }

    /// Renders the stored feeds as an OPML document.
    pub fn export(&self) -> PagefeedResult<String> {
        let feeds = self.store.load()?;
        generate_opml(&feeds, &self.public_url)
    }
}
