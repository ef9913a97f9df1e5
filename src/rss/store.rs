use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::errors::PagefeedResult;

/// Filesystem home of the rendered RSS artifacts, one XML file per feed.
///
/// A failed refresh never touches an existing artifact; readers keep getting
/// the last good document.
pub struct RssStore {
    feeds_dir: PathBuf,
    public_url: String,
}

impl RssStore {
    pub fn new(feeds_dir: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            feeds_dir: feeds_dir.into(),
            public_url: public_url.into(),
        }
    }

    /// Absolute URL under which feed readers poll this feed.
    pub fn self_url(&self, name: &str) -> String {
        format!("{}/feed/{}.xml", self.public_url, name)
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.feeds_dir.join(format!("{}.xml", name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).exists()
    }

    /// Writes the artifact through a temporary sibling and renames it into
    /// place, so a poll never observes a half-written file.
    pub fn write(&self, name: &str, xml: &str) -> PagefeedResult<PathBuf> {
        fs::create_dir_all(&self.feeds_dir)?;
        let path = self.path_for(name);
        let tmp = path.with_extension("xml.tmp");
        fs::write(&tmp, xml)?;
        fs::rename(&tmp, &path)?;
        debug!(feed = name, path = %path.display(), "wrote RSS artifact");
        Ok(path)
    }

    /// Removes the artifact. A missing file counts as already deleted.
    pub fn delete(&self, name: &str) -> PagefeedResult<bool> {
        let path = self.path_for(name);
        if path.exists() {
            fs::remove_file(&path)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Moves the artifact when a feed is renamed, keeping its URL serving
    /// under the new name. No artifact yet is fine.
    pub fn rename(&self, old: &str, new: &str) -> PagefeedResult<()> {
        let from = self.path_for(old);
        if !from.exists() {
            return Ok(());
        }
        fs::rename(from, self.path_for(new))?;
        Ok(())
    }
}
