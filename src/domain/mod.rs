pub mod article;
pub mod discovery;
pub mod feed;
pub mod report;

pub use article::Article;
pub use discovery::{DiscoveredFeed, DiscoverySource, FeedKind};
pub use feed::{
    validate_feed_name, FeedDefinition, FeedDraft, FeedStatus, FeedUpdate, StatusUpdate,
};
pub use report::{BulkOutcome, FailedFeed, RefreshReport, SkippedFeed, StatusSummary};
