use super::warning::{Warning, WarningIdentity};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Format version written to and expected from the approval file
pub const APPROVAL_RECORD_FORMAT_VERSION: u32 = 1;

/// Warning identities an operator has accepted
///
/// `packages` is kept sorted and free of duplicates so the file diffs cleanly
/// between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub packages: Vec<WarningIdentity>,
}

impl ApprovalRecord {
    pub fn empty() -> Self {
        Self {
            version: APPROVAL_RECORD_FORMAT_VERSION,
            packages: Vec::new(),
        }
    }

    /// Builds a record holding exactly the identities of `warnings`
    pub fn from_warnings<'a>(warnings: impl IntoIterator<Item = &'a Warning>) -> Self {
        let identities: BTreeSet<WarningIdentity> =
            warnings.into_iter().map(Warning::identity).collect();
        Self {
            version: APPROVAL_RECORD_FORMAT_VERSION,
            packages: identities.into_iter().collect(),
        }
    }

    pub fn is_current_format(&self) -> bool {
        self.version == APPROVAL_RECORD_FORMAT_VERSION
    }

    pub fn identities(&self) -> HashSet<&WarningIdentity> {
        self.packages.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl Default for ApprovalRecord {
    fn default() -> Self {
        Self::empty()
    }
}
