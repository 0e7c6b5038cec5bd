//! Build cache
//!
//! Records content hashes from the previous build so an unchanged site can
//! skip generation entirely. Any detected change triggers a full rebuild;
//! there is no partial regeneration.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Cache file path relative to the site base directory
const CACHE_FILE: &str = ".folio-cache/db.json";

/// Cache database for tracking content changes between builds
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheDb {
    /// Version of the cache format
    pub version: u32,
    /// Hash of the site config
    pub config_hash: u64,
    /// Content hashes for posts, keyed by source path
    pub posts: HashMap<String, u64>,
    /// Content hashes for pages, keyed by source path
    pub pages: HashMap<String, u64>,
}

impl CacheDb {
    /// Current cache format version
    const VERSION: u32 = 1;

    /// Load cache from disk, or return an empty cache
    pub fn load(base_dir: &Path) -> Self {
        let cache_path = base_dir.join(CACHE_FILE);
        if let Ok(content) = fs::read_to_string(&cache_path) {
            if let Ok(cache) = serde_json::from_str::<CacheDb>(&content) {
                if cache.version == Self::VERSION {
                    return cache;
                }
                tracing::info!("Cache version mismatch, rebuilding");
            }
        }
        Self::default()
    }

    /// Save cache to disk
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let cache_path = base_dir.join(CACHE_FILE);
        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&cache_path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Build a cache snapshot from the current content
    pub fn snapshot(
        config_hash: u64,
        posts: &[(String, u64)],
        pages: &[(String, u64)],
    ) -> Self {
        Self {
            version: Self::VERSION,
            config_hash,
            posts: posts.iter().cloned().collect(),
            pages: pages.iter().cloned().collect(),
        }
    }

    /// Whether the current content differs from this cache.
    ///
    /// An empty cache (first build, or version mismatch) always counts as
    /// changed.
    pub fn is_stale(
        &self,
        config_hash: u64,
        posts: &[(String, u64)],
        pages: &[(String, u64)],
    ) -> bool {
        if self.posts.is_empty() && self.pages.is_empty() {
            return true;
        }
        if self.config_hash != config_hash {
            return true;
        }
        if self.posts.len() != posts.len() || self.pages.len() != pages.len() {
            return true;
        }
        posts
            .iter()
            .any(|(source, hash)| self.posts.get(source) != Some(hash))
            || pages
                .iter()
                .any(|(source, hash)| self.pages.get(source) != Some(hash))
    }

    /// Delete the cache directory
    pub fn clear(base_dir: &Path) -> Result<()> {
        let cache_dir = base_dir.join(".folio-cache");
        if cache_dir.exists() {
            fs::remove_dir_all(&cache_dir)?;
            tracing::info!("Cache cleared");
        }
        Ok(())
    }
}

/// Hash content for change detection
pub fn hash_content(content: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_cache_is_stale() {
        let cache = CacheDb::default();
        assert!(cache.is_stale(0, &[], &[]));
    }

    #[test]
    fn test_unchanged_content_not_stale() {
        let posts = vec![("blog/a.md".to_string(), hash_content("body"))];
        let cache = CacheDb::snapshot(42, &posts, &[]);
        assert!(!cache.is_stale(42, &posts, &[]));
    }

    #[test]
    fn test_changed_post_detected() {
        let posts = vec![("blog/a.md".to_string(), hash_content("body"))];
        let cache = CacheDb::snapshot(42, &posts, &[]);

        let edited = vec![("blog/a.md".to_string(), hash_content("edited body"))];
        assert!(cache.is_stale(42, &edited, &[]));
    }

    #[test]
    fn test_config_change_detected() {
        let posts = vec![("blog/a.md".to_string(), hash_content("body"))];
        let cache = CacheDb::snapshot(42, &posts, &[]);
        assert!(cache.is_stale(43, &posts, &[]));
    }

    #[test]
    fn test_added_and_removed_posts_detected() {
        let posts = vec![("blog/a.md".to_string(), hash_content("body"))];
        let cache = CacheDb::snapshot(42, &posts, &[]);

        assert!(cache.is_stale(42, &[], &[]));
        let more = vec![
            ("blog/a.md".to_string(), hash_content("body")),
            ("blog/b.md".to_string(), hash_content("new")),
        ];
        assert!(cache.is_stale(42, &more, &[]));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let posts = vec![("blog/a.md".to_string(), 7)];
        let cache = CacheDb::snapshot(1, &posts, &[]);
        cache.save(dir.path()).unwrap();

        let loaded = CacheDb::load(dir.path());
        assert!(!loaded.is_stale(1, &posts, &[]));
    }
}
