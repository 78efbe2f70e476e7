use super::npm_registry_client::encode_package_name;
use crate::adapters::outbound::filesystem::FileSystemWriter;
use crate::policy_check::domain::RegistryRecord;
use crate::ports::outbound::RegistryRepository;
use crate::shared::security::read_regular_file;
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Sub-directory of the cache dir holding one shard per package
const REGISTRY_SHARD_DIR: &str = "registry";

/// CachingRegistryRepository wraps a RegistryRepository with an on-disk cache.
///
/// Each package is stored in its own JSON shard. A shard is trusted only when
/// it has the current format version and already lists the requested version;
/// anything else triggers one refetch that replaces the shard. Records are also
/// memoized in memory for the rest of the run.
///
/// Lookups of one package are serialized: concurrent requests for different
/// versions share a single fetch whenever the fetched record covers both.
pub struct CachingRegistryRepository<R: RegistryRepository> {
    inner: R,
    shard_dir: PathBuf,
    memo: Arc<DashMap<String, RegistryRecord>>,
    in_flight: DashMap<String, Arc<Mutex<()>>>,
}

impl<R: RegistryRepository> CachingRegistryRepository<R> {
    pub fn new(inner: R, cache_dir: &Path) -> Self {
        Self {
            inner,
            shard_dir: cache_dir.join(REGISTRY_SHARD_DIR),
            memo: Arc::new(DashMap::new()),
            in_flight: DashMap::new(),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    fn memoized(&self, package_name: &str, version: &str) -> Option<RegistryRecord> {
        self.memo
            .get(package_name)
            .filter(|cached| cached.covers(version))
            .map(|cached| cached.value().clone())
    }

    /// Per-package lock; the map guard is released before the caller awaits
    fn package_lock(&self, package_name: &str) -> Arc<Mutex<()>> {
        self.in_flight
            .entry(package_name.to_string())
            .or_default()
            .value()
            .clone()
    }

    fn shard_path(&self, package_name: &str) -> PathBuf {
        self.shard_dir
            .join(format!("{}.json", encode_package_name(package_name)))
    }

    /// Reads a shard; unreadable or malformed shards count as absent
    fn load_shard(&self, package_name: &str) -> Option<RegistryRecord> {
        let path = self.shard_path(package_name);
        if !path.exists() {
            return None;
        }

        let parsed = read_regular_file(&path, "registry cache shard").and_then(|content| {
            serde_json::from_str::<RegistryRecord>(&content).map_err(anyhow::Error::from)
        });
        match parsed {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!(package = package_name, path = %path.display(), error = %e, "ignoring unreadable registry cache shard");
                None
            }
        }
    }

    /// Best effort: a failed write is logged and the fetched record is still used
    fn store_shard(&self, package_name: &str, record: &RegistryRecord) {
        let path = self.shard_path(package_name);
        let written = serde_json::to_string(record)
            .map_err(anyhow::Error::from)
            .and_then(|json| FileSystemWriter::new(path.clone()).write_atomically(&json));

        if let Err(e) = written {
            tracing::warn!(package = package_name, path = %path.display(), error = %e, "failed to write registry cache shard");
        }
    }
}

#[async_trait]
impl<R: RegistryRepository> RegistryRepository for CachingRegistryRepository<R> {
    async fn fetch_record(&self, package_name: &str, version: &str) -> Result<RegistryRecord> {
        if let Some(cached) = self.memoized(package_name, version) {
            return Ok(cached);
        }

        let lock = self.package_lock(package_name);
        let _guard = lock.lock().await;

        // Another lookup may have fetched the package while this one waited
        if let Some(cached) = self.memoized(package_name, version) {
            return Ok(cached);
        }

        if let Some(record) = self.load_shard(package_name) {
            if record.covers(version) {
                tracing::debug!(package = package_name, version, "registry cache hit");
                self.memo.insert(package_name.to_string(), record.clone());
                return Ok(record);
            }
            tracing::debug!(package = package_name, version, "registry cache stale");
        }

        let record = self.inner.fetch_record(package_name, version).await?;
        self.store_shard(package_name, &record);
        self.memo.insert(package_name.to_string(), record.clone());

        Ok(record)
    }
}
