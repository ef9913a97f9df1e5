use super::feed::{FeedDefinition, FeedStatus};

/// How many skip/error detail entries bulk outcomes keep for diagnostics.
const MAX_DETAILS: usize = 10;

/// Per-feed outcome of a refresh pass.
#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub name: String,
    pub status: FeedStatus,
    pub article_count: usize,
    pub error: Option<String>,
}

impl RefreshReport {
    pub fn from_feed(feed: &FeedDefinition) -> Self {
        Self {
            name: feed.name.clone(),
            status: feed.last_status.unwrap_or(FeedStatus::Error),
            article_count: feed.article_count,
            error: feed.last_error.clone(),
        }
    }

    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: FeedStatus::Error,
            article_count: 0,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SkippedFeed {
    pub name: String,
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct FailedFeed {
    pub name: String,
    pub error: String,
}

/// Aggregate result of a bulk create or OPML import. The counts are exact;
/// the detail lists keep at most the first ten entries each.
#[derive(Debug, Clone, Default)]
pub struct BulkOutcome {
    pub created: Vec<FeedDefinition>,
    pub skipped: usize,
    pub errors: usize,
    pub skipped_details: Vec<SkippedFeed>,
    pub error_details: Vec<FailedFeed>,
}

impl BulkOutcome {
    pub fn record_created(&mut self, feed: FeedDefinition) {
        self.created.push(feed);
    }

    pub fn record_skipped(&mut self, name: &str, url: &str, reason: &str) {
        self.skipped += 1;
        if self.skipped_details.len() < MAX_DETAILS {
            self.skipped_details.push(SkippedFeed {
                name: name.to_string(),
                url: url.to_string(),
                reason: reason.to_string(),
            });
        }
    }

    pub fn record_error(&mut self, name: &str, error: &str) {
        self.errors += 1;
        if self.error_details.len() < MAX_DETAILS {
            self.error_details.push(FailedFeed {
                name: name.to_string(),
                error: error.to_string(),
            });
        }
    }

    pub fn created_count(&self) -> usize {
        self.created.len()
    }
}

/// Store-wide health: totals by status and the newest update stamp.
#[derive(Debug, Clone, Default)]
pub struct StatusSummary {
    pub total: usize,
    pub success: usize,
    pub error: usize,
    pub last_update: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_outcome_caps_details_but_counts_all() {
        let mut outcome = BulkOutcome::default();
        for i in 0..25 {
            outcome.record_skipped(&format!("feed-{}", i), "https://example.com", "duplicate");
        }
        assert_eq!(outcome.skipped, 25);
        assert_eq!(outcome.skipped_details.len(), 10);
        assert_eq!(outcome.skipped_details[0].name, "feed-0");
    }

    #[test]
    fn test_bulk_outcome_counts_errors_separately() {
        let mut outcome = BulkOutcome::default();
        outcome.record_error("bad", "Feed validation failed: name");
        assert_eq!(outcome.errors, 1);
        assert_eq!(outcome.skipped, 0);
        assert_eq!(outcome.error_details[0].name, "bad");
    }
}
