use serde::{Deserialize, Serialize};

/// A Node.js core security advisory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAdvisory {
    pub id: String,
    #[serde(default)]
    pub cves: Vec<String>,
    /// npm semver range of affected runtime versions
    pub vulnerable: String,
    /// npm semver range of fixed runtime versions, if published
    #[serde(default)]
    pub patched: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl NodeAdvisory {
    /// CVE list if present, otherwise the advisory id
    pub fn label(&self) -> String {
        if self.cves.is_empty() {
            self.id.clone()
        } else {
            self.cves.join(", ")
        }
    }
}
