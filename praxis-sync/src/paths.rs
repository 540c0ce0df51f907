//! Filesystem locations for locally cached state.

use std::path::PathBuf;

use crate::error::{Result, SyncError};

/// Application data directory, created on first use.
pub fn data_dir() -> Result<PathBuf> {
    let dir = dirs::data_dir().ok_or(SyncError::NoDataDir)?.join("praxis");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Path of the cached progress record for a namespace.
pub fn cache_file(namespace: &str) -> Result<PathBuf> {
    Ok(data_dir()?.join(format!("{namespace}.json")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_file_carries_namespace() {
        if let Ok(path) = cache_file("praxis-progress") {
            assert!(path.ends_with("praxis/praxis-progress.json"));
        }
    }
}
