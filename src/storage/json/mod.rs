mod file;
mod store;

pub use file::JsonStorage;
pub use store::JsonFeedStore;
