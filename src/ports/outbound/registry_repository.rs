use crate::policy_check::domain::RegistryRecord;
use crate::shared::Result;
use async_trait::async_trait;

/// RegistryRepository port for per-package registry metadata
///
/// Implementations must be `Send + Sync`: the batch orchestrator queries
/// many packages concurrently through a shared reference.
#[async_trait]
pub trait RegistryRepository: Send + Sync {
    /// Returns a record for `package_name` that covers `version`
    ///
    /// # Errors
    /// Returns an error if:
    /// - The network request fails or the registry answers with an error status
    /// - The response lacks a `versions` or `time` map
    /// - `version` is missing from either map
    async fn fetch_record(&self, package_name: &str, version: &str) -> Result<RegistryRecord>;
}
