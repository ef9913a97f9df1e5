pub mod json;
pub mod traits;

pub use json::{JsonFeedStore, JsonStorage};
pub use traits::FeedStore;
