use crate::shared::error::GateError;
use crate::shared::Result;
use node_semver::{Range, Version as SemverVersion};
use std::collections::BTreeMap;

/// PackageRules - per-package semver ranges (blacklist or ignore list)
///
/// Ranges use npm syntax (`^1.2.0`, `>=2 <3`, `1.x || 2.x`, `*`). A
/// pre-release matches when its release version does, so `*` covers
/// `2.0.0-rc.1` and `^1.0.0` covers `1.1.0-beta.1`.
#[derive(Debug, Default)]
pub struct PackageRules {
    rules: BTreeMap<String, PackageRule>,
}

#[derive(Debug)]
struct PackageRule {
    original: String,
    range: Range,
}

impl PackageRules {
    /// Compiles the ranges of a `name -> range` map
    ///
    /// # Errors
    /// Returns `GateError::InvalidPolicy` naming the list and package whose
    /// range does not parse
    pub fn new(list_name: &str, entries: &BTreeMap<String, String>) -> Result<Self> {
        let mut rules = BTreeMap::new();
        for (name, raw) in entries {
            let original = raw.trim().to_string();
            let range = Range::parse(if original.is_empty() { "*" } else { original.as_str() })
                .map_err(|e| GateError::InvalidPolicy {
                    message: format!(
                        "{}.{}: \"{}\" is not a valid semver range ({})",
                        list_name, name, raw, e
                    ),
                })?;
            rules.insert(name.clone(), PackageRule { original, range });
        }
        Ok(Self { rules })
    }

    /// Returns the configured range if `name@version` falls inside it
    ///
    /// Versions that are not valid semver never match. npm range matching
    /// skips pre-releases unless a comparator opts in; these lists must not,
    /// so a pre-release is also tried without its pre-release tag.
    pub fn matching_range(&self, name: &str, version: &str) -> Option<&str> {
        let rule = self.rules.get(name)?;
        let parsed = match SemverVersion::parse(version) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(package = name, version, error = %e, "version is not valid semver; rule skipped");
                return None;
            }
        };
        let matches = rule.range.satisfies(&parsed)
            || (parsed.is_prerelease() && rule.range.satisfies(&release_of(&parsed)));
        matches.then_some(rule.original.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

fn release_of(version: &SemverVersion) -> SemverVersion {
    SemverVersion::new(version.major, version.minor, version.patch)
}
