use crate::shared::Result;
use async_trait::async_trait;

/// PopularityRepository port for weekly download counts
#[async_trait]
pub trait PopularityRepository: Send + Sync {
    /// Fetches last week's download count for a package
    ///
    /// # Errors
    /// Returns an error on network failure or an unexpected response shape.
    /// Callers treat any error as "unknown", never as zero.
    async fn fetch_weekly_downloads(&self, package_name: &str) -> Result<u64>;

    /// Persists anything gathered during the run
    ///
    /// Called once at the end of a run. The default does nothing.
    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}
