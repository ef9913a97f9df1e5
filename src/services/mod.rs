pub mod feed_service;
pub mod import_export_service;
pub mod refresh_service;

pub use feed_service::FeedService;
pub use import_export_service::ImportExportService;
pub use refresh_service::RefreshService;
