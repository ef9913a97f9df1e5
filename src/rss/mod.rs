pub mod render;
pub mod store;

pub use render::{render_rss, MAX_ITEMS};
pub use store::RssStore;
