use crate::policy_check::domain::NodeAdvisory;
use crate::shared::Result;
use async_trait::async_trait;

/// NodeAdvisoryRepository port for Node.js core security advisories
#[async_trait]
pub trait NodeAdvisoryRepository: Send + Sync {
    /// Fetches the full advisory list
    ///
    /// # Errors
    /// Returns an error on network failure or an unexpected response shape
    async fn fetch_advisories(&self) -> Result<Vec<NodeAdvisory>>;
}

/// NodeRuntimeProbe port for discovering the local Node.js version
#[async_trait]
pub trait NodeRuntimeProbe: Send + Sync {
    /// Returns the runtime version as printed by `node --version` (e.g. `v20.11.1`)
    ///
    /// # Errors
    /// Returns an error if Node.js is not installed or does not answer
    async fn node_version(&self) -> Result<String>;
}
