//! File-backed implementation of the local cache port.
//!
//! Writes go through a sibling temp file and a rename so a crash cannot
//! leave a torn record. Failures are logged and swallowed; the cache is
//! best effort by contract.

use std::path::PathBuf;

use praxis_core::{LocalCache, ProgressRecord};

use crate::error::Result;
use crate::paths;

/// JSON blob cache at a fixed path.
#[derive(Debug)]
pub struct JsonFileCache {
    path: PathBuf,
}

impl JsonFileCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Cache under the platform data directory, keyed by namespace.
    pub fn at_default_location(namespace: &str) -> Result<Self> {
        Ok(Self::new(paths::cache_file(namespace)?))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn try_store(&self, record: &ProgressRecord) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)
    }
}

impl LocalCache for JsonFileCache {
    fn load(&self) -> Option<ProgressRecord> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding unreadable cached record");
                None
            }
        }
    }

    fn store(&self, record: &ProgressRecord) {
        if let Err(e) = self.try_store(record) {
            tracing::warn!(path = %self.path.display(), error = %e, "Cache write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let cache = JsonFileCache::new(dir.path().join("progress.json"));
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let cache = JsonFileCache::new(dir.path().join("progress.json"));

        let mut record = ProgressRecord::default();
        record.total_score = 120;
        record.completed_units.insert("limits".into());

        cache.store(&record);
        assert_eq!(cache.load().unwrap(), record);
    }

    #[test]
    fn test_corrupt_file_is_discarded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");
        std::fs::write(&path, "{not json").unwrap();

        let cache = JsonFileCache::new(path);
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_overwrite_keeps_latest() {
        let dir = TempDir::new().unwrap();
        let cache = JsonFileCache::new(dir.path().join("progress.json"));

        let mut record = ProgressRecord::default();
        record.total_score = 1;
        cache.store(&record);
        record.total_score = 2;
        cache.store(&record);

        assert_eq!(cache.load().unwrap().total_score, 2);
    }
}
