use crate::policy_check::domain::NodeAdvisory;

/// RuntimeReport - result of the Node.js runtime advisory check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeReport {
    /// Version printed by `node --version`
    pub node_version: String,
    /// Advisories that affect `node_version`
    pub advisories: Vec<NodeAdvisory>,
}

impl RuntimeReport {
    pub fn is_vulnerable(&self) -> bool {
        !self.advisories.is_empty()
    }
}
