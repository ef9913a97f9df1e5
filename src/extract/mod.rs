pub mod traits;
pub mod selector;
pub mod time_tags;
pub mod dated_anchors;
pub mod list_selectors;
pub mod link_scan;

mod cascade;
mod element;

pub use cascade::extract_articles;
pub use traits::ExtractionStrategy;

/// Upper bound on articles returned by a single extraction pass.
pub const MAX_ARTICLES: usize = 50;

/// Anchor-driven heuristics skip titles at or below this length.
pub(crate) const MIN_LINK_TITLE_CHARS: usize = 10;
