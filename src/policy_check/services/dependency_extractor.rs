use crate::policy_check::domain::Dependency;
use crate::policy_check::services::PackageRules;
use crate::shared::error::GateError;
use crate::shared::Result;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

const NODE_MODULES_SEGMENT: &str = "node_modules/";

/// npm lockfile (`package-lock.json` / `npm-shrinkwrap.json`)
///
/// Only the v2/v3 `packages` map is read. Entries keep file order so the
/// first install location of a `name@version` is the one reported.
#[derive(Debug, Deserialize)]
pub struct NpmLockfile {
    #[serde(skip)]
    path: PathBuf,
    #[serde(default, rename = "lockfileVersion")]
    lockfile_version: Option<u32>,
    #[serde(default)]
    packages: Option<OrderedEntries>,
}

#[derive(Debug, Default, Deserialize)]
struct LockfileEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    license: Option<serde_json::Value>,
    #[serde(default)]
    link: bool,
    #[serde(default)]
    optional: bool,
}

#[derive(Debug)]
struct OrderedEntries(Vec<(String, LockfileEntry)>);

impl<'de> Deserialize<'de> for OrderedEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = OrderedEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of install paths to package entries")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((path, entry)) = map.next_entry::<String, LockfileEntry>()? {
                    entries.push((path, entry));
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

impl NpmLockfile {
    /// Parses lockfile JSON, rejecting lockfileVersion 1 files
    ///
    /// # Errors
    /// - `GateError::LockfileParseError` for invalid JSON
    /// - `GateError::UnsupportedLockfile` when there is no `packages` map
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let mut lockfile: NpmLockfile =
            serde_json::from_str(content).map_err(|e| GateError::LockfileParseError {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?;

        if lockfile.packages.is_none() {
            return Err(GateError::UnsupportedLockfile {
                path: path.to_path_buf(),
                format: format!(
                    "npm lockfileVersion {}",
                    lockfile.lockfile_version.unwrap_or(1)
                ),
            }
            .into());
        }

        lockfile.path = path.to_path_buf();
        Ok(lockfile)
    }

    fn entries(&self) -> &[(String, LockfileEntry)] {
        self.packages.as_ref().map(|p| p.0.as_slice()).unwrap_or(&[])
    }
}

/// Result of extracting dependencies from a lockfile
#[derive(Debug, Default)]
pub struct Extraction {
    /// Dependencies to evaluate, sorted by name then version
    pub dependencies: Vec<Dependency>,
    /// Dependencies dropped by the ignore list
    pub ignored: Vec<Dependency>,
    /// Lockfile entries that were not installed packages (root, links, workspaces, ...)
    pub skipped: usize,
}

/// DependencyExtractor - turns a lockfile into the dependency list to evaluate
pub struct DependencyExtractor;

impl DependencyExtractor {
    /// Extracts, deduplicates, filters and sorts installed dependencies
    ///
    /// Blacklist rules are checked for every unique `name@version` before the
    /// ignore list is consulted, so a blocked package fails even if ignored.
    ///
    /// # Arguments
    /// * `lockfile` - Parsed npm lockfile
    /// * `blacklist` - Blocked package ranges
    /// * `ignore` - Ignored package ranges
    /// * `is_materialized` - Whether an optional entry's install path exists on disk
    ///
    /// # Errors
    /// - `GateError::LockfileParseError` for an installed entry whose name or
    ///   version is not a valid npm package name or version
    /// - `GateError::BlockedPackage` for the first blacklisted dependency
    pub fn extract(
        lockfile: &NpmLockfile,
        blacklist: &PackageRules,
        ignore: &PackageRules,
        is_materialized: impl Fn(&str) -> bool,
    ) -> Result<Extraction> {
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut unique = Vec::new();
        let mut skipped = 0;

        for (install_path, entry) in lockfile.entries() {
            let Some(dependency) =
                Self::to_dependency(&lockfile.path, install_path, entry, &is_materialized)?
            else {
                skipped += 1;
                continue;
            };

            let key = (dependency.name().to_string(), dependency.version().to_string());
            if seen.insert(key) {
                unique.push(dependency);
            }
        }

        for dependency in &unique {
            if let Some(range) = blacklist.matching_range(dependency.name(), dependency.version()) {
                return Err(GateError::BlockedPackage {
                    name: dependency.name().to_string(),
                    version: dependency.version().to_string(),
                    range: range.to_string(),
                }
                .into());
            }
        }

        let (mut ignored, mut dependencies): (Vec<_>, Vec<_>) =
            unique.into_iter().partition(|dep| {
                ignore
                    .matching_range(dep.name(), dep.version())
                    .is_some()
            });

        for dep in &ignored {
            tracing::info!(package = dep.name(), version = dep.version(), "ignored by policy");
        }

        dependencies.sort_by(|a, b| {
            a.name()
                .cmp(b.name())
                .then_with(|| a.version().cmp(b.version()))
        });
        ignored.sort_by(|a, b| a.name().cmp(b.name()));

        Ok(Extraction {
            dependencies,
            ignored,
            skipped,
        })
    }

    /// `Ok(None)` for entries that are not installed packages
    ///
    /// An installed entry that fails validation is fatal: it could otherwise
    /// slip past the blacklist unevaluated.
    fn to_dependency(
        lockfile_path: &Path,
        install_path: &str,
        entry: &LockfileEntry,
        is_materialized: &impl Fn(&str) -> bool,
    ) -> Result<Option<Dependency>> {
        // Root project
        if install_path.is_empty() {
            return Ok(None);
        }

        if entry.link {
            tracing::debug!(path = install_path, "skipping linked entry");
            return Ok(None);
        }

        if entry.optional && !is_materialized(install_path) {
            tracing::debug!(path = install_path, "skipping optional entry that is not installed");
            return Ok(None);
        }

        let Some(inferred) = Self::infer_name(install_path) else {
            tracing::debug!(path = install_path, "skipping workspace source entry");
            return Ok(None);
        };
        let name = entry.name.clone().unwrap_or_else(|| inferred.to_string());

        let Some(version) = entry.version.clone() else {
            return Ok(None);
        };
        let license = entry.license.as_ref().and_then(|value| match value {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(obj) => obj
                .get("type")
                .and_then(|t| t.as_str())
                .map(String::from),
            _ => None,
        });

        Dependency::new(name, version, install_path.to_string(), license)
            .map(Some)
            .map_err(|e| {
                GateError::LockfileParseError {
                    path: lockfile_path.to_path_buf(),
                    details: format!("entry \"{}\": {}", install_path, e),
                }
                .into()
            })
    }

    /// Package name from an install path: the part after the last
    /// `node_modules/`, which is `name` or `@scope/name`
    fn infer_name(install_path: &str) -> Option<&str> {
        let start = install_path.rfind(NODE_MODULES_SEGMENT)? + NODE_MODULES_SEGMENT.len();
        let rest = &install_path[start..];
        if rest.is_empty() {
            None
        } else {
            Some(rest)
        }
    }
}
