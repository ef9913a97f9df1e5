use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::domain::FeedDefinition;
use crate::errors::{PagefeedError, PagefeedResult};
use crate::util::now_iso;

/// On-disk shape of the record store.
#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    feeds: Vec<FeedDefinition>,
    #[serde(default)]
    updated: String,
}

/// Handle on the record store file. Obtain it through [`JsonStorage::file`]
/// so the guard spans the whole load-modify-save cycle.
pub struct StoreFile {
    path: PathBuf,
}

impl StoreFile {
    /// Missing file reads as an empty collection. A present but unparseable
    /// file is an error, never silently empty.
    pub fn read(&self) -> PagefeedResult<Vec<FeedDefinition>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        let doc: StoreDocument = serde_json::from_str(&raw)?;
        Ok(doc.feeds)
    }

    /// Replaces the whole collection, stamping the update time.
    pub fn write(&self, feeds: &[FeedDefinition]) -> PagefeedResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let doc = StoreDocument {
            feeds: feeds.to_vec(),
            updated: now_iso(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&doc)?)?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct JsonStorage {
    file: Arc<Mutex<StoreFile>>,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Arc::new(Mutex::new(StoreFile { path: path.into() })),
        }
    }

    pub fn file(&self) -> PagefeedResult<MutexGuard<'_, StoreFile>> {
        self.file
            .lock()
            .map_err(|_| PagefeedError::Store("record store lock poisoned".to_string()))
    }
}
