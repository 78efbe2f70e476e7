use lockgate::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock PopularityRepository with fixed counts; names without a count fail
#[derive(Clone, Default)]
pub struct MockPopularityRepository {
    counts: Arc<HashMap<String, u64>>,
    queried: Arc<Mutex<Vec<String>>>,
}

impl MockPopularityRepository {
    pub fn new(counts: &[(&str, u64)]) -> Self {
        Self {
            counts: Arc::new(counts.iter().map(|(n, c)| (n.to_string(), *c)).collect()),
            queried: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every lookup fails, as when the downloads API is unreachable
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PopularityRepository for MockPopularityRepository {
    async fn fetch_weekly_downloads(&self, package_name: &str) -> Result<u64> {
        self.queried.lock().unwrap().push(package_name.to_string());
        self.counts
            .get(package_name)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("downloads API unreachable"))
    }
}
