//! Configuration file support for lockgate.
//!
//! Provides YAML or TOML policy files (`lockgate.config.yml`, `.yaml`,
//! `.toml`), including data structures, file loading, and validation.

use anyhow::Context;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::policy_check::domain::Policy;
use crate::policy_check::services::age::parse_duration;
use crate::policy_check::services::PackageRules;
use crate::shared::error::GateError;
use crate::shared::Result;

/// Config file names looked up in the project directory, in order
pub const CONFIG_FILENAMES: [&str; 3] = [
    "lockgate.config.yml",
    "lockgate.config.yaml",
    "lockgate.config.toml",
];

/// `minPackageAge` accepts `"2d"`-style strings or a number of seconds
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DurationSetting {
    Seconds(u64),
    Text(String),
}

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub min_package_age: Option<DurationSetting>,
    pub min_weekly_downloads: Option<u64>,
    pub check_node_version: Option<bool>,
    pub licenses: Option<Vec<String>>,
    pub blacklist: Option<BTreeMap<String, String>>,
    pub ignore: Option<BTreeMap<String, String>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: BTreeMap<String, serde_yaml_ng::Value>,
}

impl ConfigFile {
    /// Converts the file into the immutable policy value, validating every field
    ///
    /// # Errors
    /// Returns `GateError::InvalidPolicy` for an unparsable duration, an empty
    /// license entry or an invalid semver range
    pub fn into_policy(self) -> Result<Policy> {
        let min_package_age = match self.min_package_age {
            None => chrono::Duration::zero(),
            Some(DurationSetting::Seconds(seconds)) => i64::try_from(seconds)
                .ok()
                .and_then(chrono::Duration::try_seconds)
                .ok_or_else(|| invalid(format!("minPackageAge: {} seconds is out of range", seconds)))?,
            Some(DurationSetting::Text(text)) => parse_duration(&text)
                .map_err(|e| invalid(format!("minPackageAge: {}", e)))?,
        };

        let mut licenses = BTreeSet::new();
        for (i, license) in self.licenses.unwrap_or_default().into_iter().enumerate() {
            let trimmed = license.trim();
            if trimmed.is_empty() {
                return Err(invalid(format!("licenses[{}] must not be empty", i)).into());
            }
            licenses.insert(trimmed.to_string());
        }

        let blacklist = self.blacklist.unwrap_or_default();
        let ignore = self.ignore.unwrap_or_default();
        PackageRules::new("blacklist", &blacklist)?;
        PackageRules::new("ignore", &ignore)?;

        Ok(Policy {
            min_package_age,
            min_weekly_downloads: self.min_weekly_downloads.unwrap_or(0),
            check_node_version: self.check_node_version.unwrap_or(false),
            licenses,
            blacklist,
            ignore,
        })
    }
}

fn invalid(message: String) -> GateError {
    GateError::InvalidPolicy { message }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = if is_toml(path) {
        toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid TOML syntax.",
                path.display()
            )
        })?
    } else {
        serde_yaml_ng::from_str(&content).with_context(|| {
            format!(
                "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
                path.display()
            )
        })?
    };

    warn_unknown_fields(&config);

    Ok(config)
}

/// Finds the first config file present in `dir`
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    match find_config(dir) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "using config file");
            Ok(Some(load_config_from_path(&path)?))
        }
        None => Ok(None),
    }
}

/// Loads the explicit file if given, otherwise the discovered one, otherwise defaults
pub fn load_policy(project_dir: &Path, explicit: Option<&Path>) -> Result<Policy> {
    let config = match explicit {
        Some(path) => Some(load_config_from_path(path)?),
        None => discover_config(project_dir)?,
    };
    config.unwrap_or_default().into_policy()
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        tracing::warn!("Unknown config field '{}' will be ignored", key);
    }
}
