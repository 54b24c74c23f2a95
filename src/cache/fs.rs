//! Filesystem-backed document cache
//!
//! One file per item id at `<save-dir>/<id>.html`. The save directory is
//! created on first store, so a fresh configuration needs no setup step.

use crate::cache::{DocumentCache, StoreError, StoreResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Document cache that writes each item to its own file
#[derive(Debug, Clone)]
pub struct FsCache {
    save_dir: PathBuf,
}

impl FsCache {
    pub fn new(save_dir: impl Into<PathBuf>) -> Self {
        FsCache {
            save_dir: save_dir.into(),
        }
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// Reads a stored document back
    pub fn load(&self, id: &str) -> std::io::Result<String> {
        fs::read_to_string(self.path_for(id))
    }

    /// Counts stored documents
    ///
    /// A save directory that does not exist yet counts as empty.
    pub fn count(&self) -> usize {
        match fs::read_dir(&self.save_dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| {
                    entry
                        .path()
                        .extension()
                        .map_or(false, |ext| ext == "html")
                })
                .count(),
            Err(_) => 0,
        }
    }
}

impl DocumentCache for FsCache {
    fn exists(&self, id: &str) -> bool {
        self.path_for(id).exists()
    }

    fn store(&self, id: &str, body: &str) -> StoreResult<PathBuf> {
        let path = self.path_for(id);

        // Write-once: an already-stored document is never replaced
        if path.exists() {
            return Ok(path);
        }

        fs::create_dir_all(&self.save_dir).map_err(|source| StoreError::CreateDir {
            dir: self.save_dir.clone(),
            source,
        })?;

        fs::write(&path, body).map_err(|source| StoreError::WriteDocument {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.save_dir.join(format!("{}.html", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_store_creates_directory_and_file() {
        let dir = tempdir().unwrap();
        let cache = FsCache::new(dir.path().join("htmls"));

        let path = cache.store("1001", "<html>body</html>").unwrap();

        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html>body</html>");
    }

    #[test]
    fn test_exists_flips_after_store() {
        let dir = tempdir().unwrap();
        let cache = FsCache::new(dir.path());

        assert!(!cache.exists("1001"));
        cache.store("1001", "body").unwrap();
        assert!(cache.exists("1001"));
    }

    #[test]
    fn test_path_for_uses_id_and_html_extension() {
        let cache = FsCache::new("/tmp/htmls");
        assert_eq!(cache.path_for("42"), PathBuf::from("/tmp/htmls/42.html"));
    }

    #[test]
    fn test_store_is_write_once() {
        let dir = tempdir().unwrap();
        let cache = FsCache::new(dir.path());

        cache.store("1001", "first").unwrap();
        cache.store("1001", "second").unwrap();

        assert_eq!(cache.load("1001").unwrap(), "first");
    }

    #[test]
    fn test_load_round_trip() {
        let dir = tempdir().unwrap();
        let cache = FsCache::new(dir.path());

        cache.store("7", "stored text").unwrap();
        assert_eq!(cache.load("7").unwrap(), "stored text");
    }

    #[test]
    fn test_count_on_missing_directory_is_zero() {
        let dir = tempdir().unwrap();
        let cache = FsCache::new(dir.path().join("never-created"));
        assert_eq!(cache.count(), 0);
    }

    #[test]
    fn test_count_tracks_stored_documents() {
        let dir = tempdir().unwrap();
        let cache = FsCache::new(dir.path());

        cache.store("1", "a").unwrap();
        cache.store("2", "b").unwrap();
        cache.store("3", "c").unwrap();

        assert_eq!(cache.count(), 3);
    }
}
