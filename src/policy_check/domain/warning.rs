use serde::{Deserialize, Serialize};
use std::fmt;

/// The policy rule family a warning belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningKind {
    Script,
    License,
    MinPackageAge,
    MinWeeklyDownloads,
}

impl WarningKind {
    pub const ALL: [WarningKind; 4] = [
        WarningKind::Script,
        WarningKind::License,
        WarningKind::MinPackageAge,
        WarningKind::MinWeeklyDownloads,
    ];

    /// The name used in the approval file
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::Script => "script",
            WarningKind::License => "license",
            WarningKind::MinPackageAge => "minPackageAge",
            WarningKind::MinWeeklyDownloads => "minWeeklyDownloads",
        }
    }

    /// Heading used when warnings are summarized per kind
    pub fn title(&self) -> &'static str {
        match self {
            WarningKind::Script => "Install scripts",
            WarningKind::License => "Licenses",
            WarningKind::MinPackageAge => "Recently published",
            WarningKind::MinWeeklyDownloads => "Low weekly downloads",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unit of approval: `(package, kind, cacheKey)`
///
/// Field order defines the derived ordering, so sorting identities sorts by
/// package name first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WarningIdentity {
    pub package: String,
    #[serde(rename = "type")]
    pub kind: WarningKind,
    #[serde(rename = "cacheKey")]
    pub cache_key: String,
}

/// One detected policy violation
///
/// Two warnings with the same identity are the same warning, whatever their
/// messages say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    package: String,
    kind: WarningKind,
    message: String,
    cache_key: String,
}

impl Warning {
    pub fn new(package: String, kind: WarningKind, message: String, cache_key: String) -> Self {
        Self {
            package,
            kind,
            message,
            cache_key,
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn kind(&self) -> WarningKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    pub fn identity(&self) -> WarningIdentity {
        WarningIdentity {
            package: self.package.clone(),
            kind: self.kind,
            cache_key: self.cache_key.clone(),
        }
    }
}
