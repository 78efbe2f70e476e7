use crate::ports::outbound::PopularityRepository;
use crate::shared::security::validate_url_component;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct DownloadsPoint {
    downloads: u64,
}

/// NpmDownloadsClient adapter for the npm download counts API
///
/// Does not retry: a failed lookup only means the popularity rule is skipped
/// for that package.
pub struct NpmDownloadsClient {
    client: reqwest::Client,
    base_url: String,
}

impl NpmDownloadsClient {
    const DEFAULT_BASE_URL: &'static str = "https://api.npmjs.org/downloads/point/last-week";
    const TIMEOUT_SECONDS: u64 = 10;

    pub fn new() -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("lockgate/{}", version);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    /// The downloads API takes scoped names with a literal `/`
    fn point_url(&self, package_name: &str) -> String {
        format!("{}/{}", self.base_url, package_name)
    }
}

#[async_trait]
impl PopularityRepository for NpmDownloadsClient {
    async fn fetch_weekly_downloads(&self, package_name: &str) -> Result<u64> {
        validate_url_component(package_name, "Package name")?;

        let response = self.client.get(self.point_url(package_name)).send().await?;
        if !response.status().is_success() {
            anyhow::bail!(
                "npm downloads API returned status code {} for {}",
                response.status(),
                package_name
            );
        }

        let body = response.text().await?;
        let point: DownloadsPoint = serde_json::from_str(&body).map_err(|e| {
            anyhow::anyhow!("Unexpected downloads response for {}: {}", package_name, e)
        })?;
        Ok(point.downloads)
    }
}
