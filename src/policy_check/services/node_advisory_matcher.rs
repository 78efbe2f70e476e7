use crate::policy_check::domain::NodeAdvisory;
use node_semver::{Range, Version as SemverVersion};

/// NodeAdvisoryMatcher - selects advisories that affect a Node.js runtime version
pub struct NodeAdvisoryMatcher;

impl NodeAdvisoryMatcher {
    /// Returns advisories whose `vulnerable` range contains `runtime_version`
    /// and whose `patched` range (if any) does not
    ///
    /// A leading `v` (as printed by `node --version`) is accepted. Advisories
    /// with unparsable ranges are skipped.
    pub fn affecting<'a>(
        advisories: &'a [NodeAdvisory],
        runtime_version: &str,
    ) -> Vec<&'a NodeAdvisory> {
        let raw = runtime_version.trim().trim_start_matches('v');
        let Ok(version) = SemverVersion::parse(raw) else {
            tracing::warn!(version = runtime_version, "unrecognized Node.js version");
            return Vec::new();
        };

        advisories
            .iter()
            .filter(|advisory| Self::in_range(&advisory.vulnerable, &version))
            .filter(|advisory| {
                advisory
                    .patched
                    .as_deref()
                    .map(|patched| !Self::in_range(patched, &version))
                    .unwrap_or(true)
            })
            .collect()
    }

    fn in_range(raw: &str, version: &SemverVersion) -> bool {
        match Range::parse(raw.trim()) {
            Ok(range) => range.satisfies(version),
            Err(e) => {
                tracing::debug!(range = raw, error = %e, "skipping advisory with invalid range");
                false
            }
        }
    }
}
