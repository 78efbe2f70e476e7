use crate::shared::error::RegistryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// On-disk format version of [`RegistryRecord`]; a mismatch forces a rebuild
pub const REGISTRY_RECORD_FORMAT_VERSION: u32 = 1;

/// Install-time lifecycle scripts, in npm execution order
pub const LIFECYCLE_SCRIPTS: [&str; 4] = ["prepare", "preinstall", "install", "postinstall"];

/// Policy-relevant metadata of one published version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionMeta {
    #[serde(default)]
    pub license: Option<String>,
    /// Only the entries named in [`LIFECYCLE_SCRIPTS`]
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
}

/// Reduced registry metadata for one package, as stored in the cache shard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryRecord {
    #[serde(default)]
    pub format_version: u32,
    #[serde(default)]
    pub time: BTreeMap<String, String>,
    #[serde(default)]
    pub versions: BTreeMap<String, VersionMeta>,
}

impl RegistryRecord {
    pub fn new(time: BTreeMap<String, String>, versions: BTreeMap<String, VersionMeta>) -> Self {
        Self {
            format_version: REGISTRY_RECORD_FORMAT_VERSION,
            time,
            versions,
        }
    }

    pub fn is_current_format(&self) -> bool {
        self.format_version == REGISTRY_RECORD_FORMAT_VERSION
    }

    /// True when the record can answer queries about `version` without a refetch
    pub fn covers(&self, version: &str) -> bool {
        self.is_current_format()
            && self.versions.contains_key(version)
            && self.time.contains_key(version)
    }

    pub fn version_meta(&self, package: &str, version: &str) -> Result<&VersionMeta, RegistryError> {
        self.versions
            .get(version)
            .ok_or_else(|| RegistryError::VersionNotFound {
                package: package.to_string(),
                version: version.to_string(),
            })
    }

    /// Publish timestamp of `version`
    pub fn published_at(&self, package: &str, version: &str) -> Result<DateTime<Utc>, RegistryError> {
        let raw = self
            .time
            .get(version)
            .ok_or_else(|| RegistryError::PublishTimeMissing {
                package: package.to_string(),
                version: version.to_string(),
            })?;

        DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|_| RegistryError::InvalidPublishTime {
                package: package.to_string(),
                version: version.to_string(),
                value: raw.clone(),
            })
    }
}
