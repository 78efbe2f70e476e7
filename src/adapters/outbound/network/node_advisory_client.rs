use crate::policy_check::domain::NodeAdvisory;
use crate::ports::outbound::NodeAdvisoryRepository;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::OnceCell;

#[derive(Debug, Deserialize)]
struct CoreAdvisory {
    #[serde(default)]
    cve: Vec<String>,
    vulnerable: String,
    #[serde(default)]
    patched: Option<String>,
    #[serde(default)]
    overview: Option<String>,
}

/// NodeSecurityWgClient adapter for the Node.js security working group core advisory index
pub struct NodeSecurityWgClient {
    client: reqwest::Client,
    index_url: String,
}

impl NodeSecurityWgClient {
    const INDEX_URL: &'static str =
        "https://raw.githubusercontent.com/nodejs/security-wg/main/vuln/core/index.json";
    const TIMEOUT_SECONDS: u64 = 30;

    pub fn new() -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("lockgate/{}", version);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            index_url: Self::INDEX_URL.to_string(),
        })
    }
}

/// The index is an object keyed by advisory id
fn parse_index(body: &str) -> Result<Vec<NodeAdvisory>> {
    let index: BTreeMap<String, CoreAdvisory> = serde_json::from_str(body)
        .map_err(|e| anyhow::anyhow!("Unexpected Node.js advisory index: {}", e))?;

    Ok(index
        .into_iter()
        .map(|(id, advisory)| NodeAdvisory {
            id,
            cves: advisory.cve,
            vulnerable: advisory.vulnerable,
            patched: advisory.patched.filter(|p| !p.trim().is_empty()),
            overview: advisory.overview,
        })
        .collect())
}

#[async_trait]
impl NodeAdvisoryRepository for NodeSecurityWgClient {
    async fn fetch_advisories(&self) -> Result<Vec<NodeAdvisory>> {
        let response = self.client.get(&self.index_url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!(
                "Node.js advisory index returned status code {}",
                response.status()
            );
        }
        let body = response.text().await?;
        parse_index(&body)
    }
}

/// NodeAdvisoryCache holds the advisory list for the lifetime of the process.
///
/// The first successful fetch is kept; failed fetches are not, so a later
/// call may try again.
pub struct NodeAdvisoryCache<R: NodeAdvisoryRepository> {
    inner: R,
    advisories: OnceCell<Vec<NodeAdvisory>>,
}

impl<R: NodeAdvisoryRepository> NodeAdvisoryCache<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            advisories: OnceCell::new(),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

#[async_trait]
impl<R: NodeAdvisoryRepository> NodeAdvisoryRepository for NodeAdvisoryCache<R> {
    async fn fetch_advisories(&self) -> Result<Vec<NodeAdvisory>> {
        let advisories = self
            .advisories
            .get_or_try_init(|| self.inner.fetch_advisories())
            .await?;
        Ok(advisories.clone())
    }
}
