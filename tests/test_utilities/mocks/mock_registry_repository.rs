use chrono::{DateTime, Duration, Utc};
use lockgate::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

/// Registry data served for one package
#[derive(Clone)]
pub struct PackageFixture {
    pub published: DateTime<Utc>,
    pub license: Option<String>,
    pub scripts: BTreeMap<String, String>,
}

impl PackageFixture {
    /// A year-old MIT package without install scripts
    pub fn mature() -> Self {
        Self {
            published: Utc::now() - Duration::days(365),
            license: Some("MIT".to_string()),
            scripts: BTreeMap::new(),
        }
    }

    pub fn published(mut self, published: DateTime<Utc>) -> Self {
        self.published = published;
        self
    }

    pub fn license(mut self, license: &str) -> Self {
        self.license = Some(license.to_string());
        self
    }

    pub fn script(mut self, name: &str, body: &str) -> Self {
        self.scripts.insert(name.to_string(), body.to_string());
        self
    }
}

/// Mock RegistryRepository that records every request; clones share state
///
/// Packages without a fixture fail like an unreachable registry.
#[derive(Clone, Default)]
pub struct CountingRegistry {
    packages: Arc<Mutex<HashMap<String, PackageFixture>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl CountingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(self, name: &str, fixture: PackageFixture) -> Self {
        self.packages
            .lock()
            .unwrap()
            .insert(name.to_string(), fixture);
        self
    }

    /// `name@version` of every request, in arrival order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl RegistryRepository for CountingRegistry {
    async fn fetch_record(&self, package_name: &str, version: &str) -> Result<RegistryRecord> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}@{}", package_name, version));

        let fixture = self
            .packages
            .lock()
            .unwrap()
            .get(package_name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Registry returned status 404 for {}", package_name))?;

        Ok(RegistryRecord::new(
            BTreeMap::from([(version.to_string(), fixture.published.to_rfc3339())]),
            BTreeMap::from([(
                version.to_string(),
                VersionMeta {
                    license: fixture.license,
                    scripts: fixture.scripts,
                },
            )]),
        ))
    }
}
