use chrono::Duration;
use std::collections::{BTreeMap, BTreeSet};

/// The supply-chain policy a dependency set is checked against
///
/// Built once from the configuration file and passed by reference into the
/// core; nothing mutates it during a run. Script warnings have no toggle and
/// are always evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    /// Versions published more recently than this are flagged; zero disables
    pub min_package_age: Duration,
    /// Packages below this weekly download count are flagged; zero disables
    pub min_weekly_downloads: u64,
    /// Check the local Node.js runtime against published advisories
    pub check_node_version: bool,
    /// Allowed license identifiers; empty disables the license rule
    pub licenses: BTreeSet<String>,
    /// Package name to npm semver range; a match aborts the run
    pub blacklist: BTreeMap<String, String>,
    /// Package name to npm semver range; matches are not evaluated
    pub ignore: BTreeMap<String, String>,
}

impl Policy {
    pub fn checks_age(&self) -> bool {
        self.min_package_age > Duration::zero()
    }

    pub fn checks_popularity(&self) -> bool {
        self.min_weekly_downloads > 0
    }

    pub fn checks_licenses(&self) -> bool {
        !self.licenses.is_empty()
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            min_package_age: Duration::zero(),
            min_weekly_downloads: 0,
            check_node_version: false,
            licenses: BTreeSet::new(),
            blacklist: BTreeMap::new(),
            ignore: BTreeMap::new(),
        }
    }
}
