use crate::adapters::outbound::filesystem::FileSystemWriter;
use crate::ports::outbound::PopularityRepository;
use crate::shared::security::read_regular_file;
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// File name of the popularity map inside the cache dir
const POPULARITY_FILE: &str = "popularity.json";

/// PopularityCache wraps a PopularityRepository with a persisted name → downloads map.
///
/// Only successful lookups are stored. The map is loaded once on construction
/// and written back once, by [`PopularityRepository::flush`].
pub struct PopularityCache<R: PopularityRepository> {
    inner: R,
    path: PathBuf,
    entries: DashMap<String, u64>,
    dirty: AtomicBool,
}

impl<R: PopularityRepository> PopularityCache<R> {
    pub fn new(inner: R, cache_dir: &Path) -> Self {
        let path = cache_dir.join(POPULARITY_FILE);
        let entries = Self::load(&path).into_iter().collect();
        Self {
            inner,
            path,
            entries,
            dirty: AtomicBool::new(false),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    fn load(path: &Path) -> BTreeMap<String, u64> {
        if !path.exists() {
            return BTreeMap::new();
        }
        let parsed = read_regular_file(path, "popularity cache").and_then(|content| {
            serde_json::from_str::<BTreeMap<String, u64>>(&content).map_err(anyhow::Error::from)
        });
        parsed.unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable popularity cache");
            BTreeMap::new()
        })
    }
}

#[async_trait]
impl<R: PopularityRepository> PopularityRepository for PopularityCache<R> {
    async fn fetch_weekly_downloads(&self, package_name: &str) -> Result<u64> {
        if let Some(downloads) = self.entries.get(package_name) {
            return Ok(*downloads);
        }

        let downloads = self.inner.fetch_weekly_downloads(package_name).await?;
        self.entries.insert(package_name.to_string(), downloads);
        self.dirty.store(true, Ordering::SeqCst);
        Ok(downloads)
    }

    async fn flush(&self) -> Result<()> {
        if !self.dirty.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        let snapshot: BTreeMap<String, u64> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        let json = serde_json::to_string_pretty(&snapshot)?;
        FileSystemWriter::new(self.path.clone()).write_atomically(&json)?;
        tracing::debug!(path = %self.path.display(), entries = snapshot.len(), "popularity cache written");
        Ok(())
    }
}
