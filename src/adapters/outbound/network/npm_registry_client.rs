use crate::policy_check::domain::{RegistryRecord, VersionMeta, LIFECYCLE_SCRIPTS};
use crate::ports::outbound::RegistryRepository;
use crate::shared::error::RegistryError;
use crate::shared::security::validate_url_component;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Full packument as served by the registry, narrowed to the fields we read
#[derive(Debug, Deserialize)]
struct Packument {
    #[serde(default)]
    versions: Option<BTreeMap<String, PackumentVersion>>,
    #[serde(default)]
    time: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct PackumentVersion {
    #[serde(default)]
    license: Option<Value>,
    #[serde(default)]
    licenses: Option<Value>,
    #[serde(default)]
    scripts: Option<BTreeMap<String, Value>>,
}

/// NpmRegistryClient adapter for fetching package metadata from the npm registry
///
/// The response is validated and reduced to a [`RegistryRecord`] holding only
/// publish times, licenses and lifecycle scripts.
pub struct NpmRegistryClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl NpmRegistryClient {
    const DEFAULT_BASE_URL: &'static str = "https://registry.npmjs.org";
    const TIMEOUT_SECONDS: u64 = 30;

    /// Creates a new registry client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    /// Creates a client against a mirror or private registry
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("lockgate/{}", version);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: 3,
        })
    }

    /// Registry URL of a package; scoped names keep the `@` and encode the `/`
    fn packument_url(&self, package_name: &str) -> String {
        format!("{}/{}", self.base_url, encode_package_name(package_name))
    }

    /// Transport failures and server errors are retried, everything else is final
    fn is_retryable(error: &anyhow::Error) -> bool {
        match error.downcast_ref::<RegistryError>() {
            Some(RegistryError::HttpStatus { status, .. }) => *status >= 500,
            Some(_) => false,
            None => true,
        }
    }

    async fn fetch_with_retry(&self, package_name: &str) -> Result<Packument> {
        let mut attempt = 1;
        loop {
            match self.fetch_packument(package_name).await {
                Ok(packument) => return Ok(packument),
                Err(e) if attempt < self.max_retries && Self::is_retryable(&e) => {
                    tracing::debug!(package = package_name, attempt, error = %e, "retrying registry request");
                    tokio::time::sleep(Duration::from_millis(100 * attempt as u64)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_packument(&self, package_name: &str) -> Result<Packument> {
        let response = self
            .client
            .get(self.packument_url(package_name))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::HttpStatus {
                package: package_name.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            RegistryError::Schema {
                package: package_name.to_string(),
                details: e.to_string(),
            }
            .into()
        })
    }
}

#[async_trait]
impl RegistryRepository for NpmRegistryClient {
    async fn fetch_record(&self, package_name: &str, version: &str) -> Result<RegistryRecord> {
        // Security: Validate URL components before using them
        validate_url_component(package_name, "Package name")?;
        validate_url_component(version, "Version")?;
        let packument = self.fetch_with_retry(package_name).await?;
        Ok(reduce_packument(package_name, version, packument)?)
    }
}

/// `@scope/name` becomes `@scope%2Fname`; unscoped names are percent-encoded as-is
pub fn encode_package_name(package_name: &str) -> String {
    match package_name.strip_prefix('@') {
        Some(scoped) => format!("@{}", urlencoding::encode(scoped)),
        None => urlencoding::encode(package_name).into_owned(),
    }
}

/// Validates the packument and keeps only what the policy rules need
fn reduce_packument(
    package: &str,
    version: &str,
    packument: Packument,
) -> std::result::Result<RegistryRecord, RegistryError> {
    let versions = packument.versions.ok_or_else(|| RegistryError::MissingVersions {
        package: package.to_string(),
    })?;
    let time = packument.time.ok_or_else(|| RegistryError::MissingTime {
        package: package.to_string(),
    })?;

    if !versions.contains_key(version) {
        return Err(RegistryError::VersionNotFound {
            package: package.to_string(),
            version: version.to_string(),
        });
    }
    match time.get(version) {
        None => {
            return Err(RegistryError::PublishTimeMissing {
                package: package.to_string(),
                version: version.to_string(),
            })
        }
        Some(value) if !value.is_string() => {
            return Err(RegistryError::InvalidPublishTime {
                package: package.to_string(),
                version: version.to_string(),
                value: value.to_string(),
            })
        }
        Some(_) => {}
    }

    // `created`/`modified` and unpublished versions fall out here
    let reduced_time: BTreeMap<String, String> = time
        .into_iter()
        .filter(|(v, _)| versions.contains_key(v))
        .filter_map(|(v, value)| value.as_str().map(|s| (v, s.to_string())))
        .collect();

    let reduced_versions: BTreeMap<String, VersionMeta> = versions
        .into_iter()
        .map(|(v, meta)| (v, reduce_version(meta)))
        .collect();

    Ok(RegistryRecord::new(reduced_time, reduced_versions))
}

fn reduce_version(meta: PackumentVersion) -> VersionMeta {
    let scripts = meta
        .scripts
        .unwrap_or_default()
        .into_iter()
        .filter(|(name, _)| LIFECYCLE_SCRIPTS.contains(&name.as_str()))
        .filter_map(|(name, body)| body.as_str().map(|b| (name, b.to_string())))
        .collect();

    VersionMeta {
        license: normalize_license(meta.license.as_ref(), meta.licenses.as_ref()),
        scripts,
    }
}

/// Reduces the `license` field variants (string, `{type}`, legacy array) to one string
fn normalize_license(license: Option<&Value>, licenses: Option<&Value>) -> Option<String> {
    fn single(value: &Value) -> Option<String> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Object(map) => map.get("type").and_then(single),
            _ => None,
        }
    }

    if let Some(found) = license.and_then(|value| match value {
        Value::Array(items) => join_licenses(items.iter().filter_map(single)),
        other => single(other),
    }) {
        return Some(found);
    }

    match licenses {
        Some(Value::Array(items)) => join_licenses(items.iter().filter_map(single)),
        Some(other) => single(other),
        None => None,
    }
}

fn join_licenses(items: impl Iterator<Item = String>) -> Option<String> {
    let parts: Vec<String> = items.collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" OR "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn packument(value: Value) -> Packument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_client_creation() {
        assert!(NpmRegistryClient::new().is_ok());
    }

    #[test]
    fn test_packument_url_encodes_scope() {
        let client = NpmRegistryClient::with_base_url("https://registry.example.com/").unwrap();
        assert_eq!(
            client.packument_url("@babel/core"),
            "https://registry.example.com/@babel%2Fcore"
        );
        assert_eq!(
            client.packument_url("left-pad"),
            "https://registry.example.com/left-pad"
        );
    }

    #[test]
    fn test_reduce_keeps_policy_fields_only() {
        let doc = packument(json!({
            "name": "esbuild",
            "versions": {
                "0.20.0": {
                    "license": "MIT",
                    "scripts": {
                        "postinstall": "node install.js",
                        "test": "jest",
                        "build": "tsc"
                    }
                }
            },
            "time": {
                "created": "2020-01-01T00:00:00.000Z",
                "modified": "2024-01-01T00:00:00.000Z",
                "0.20.0": "2024-01-27T00:00:00.000Z"
            }
        }));

        let record = reduce_packument("esbuild", "0.20.0", doc).unwrap();
        assert!(record.is_current_format());
        assert!(record.covers("0.20.0"));
        assert_eq!(record.time.len(), 1);

        let meta = &record.versions["0.20.0"];
        assert_eq!(meta.license.as_deref(), Some("MIT"));
        assert_eq!(meta.scripts.len(), 1);
        assert_eq!(meta.scripts["postinstall"], "node install.js");
    }

    #[test]
    fn test_reduce_missing_versions() {
        let doc = packument(json!({ "time": {} }));
        assert_eq!(
            reduce_packument("x", "1.0.0", doc).unwrap_err(),
            RegistryError::MissingVersions {
                package: "x".to_string()
            }
        );
    }

    #[test]
    fn test_reduce_missing_time() {
        let doc = packument(json!({ "versions": { "1.0.0": {} } }));
        assert_eq!(
            reduce_packument("x", "1.0.0", doc).unwrap_err(),
            RegistryError::MissingTime {
                package: "x".to_string()
            }
        );
    }

    #[test]
    fn test_reduce_version_not_found() {
        let doc = packument(json!({
            "versions": { "1.0.0": {} },
            "time": { "1.0.0": "2020-01-01T00:00:00Z" }
        }));
        assert!(matches!(
            reduce_packument("x", "2.0.0", doc).unwrap_err(),
            RegistryError::VersionNotFound { .. }
        ));
    }

    #[test]
    fn test_reduce_publish_time_missing() {
        let doc = packument(json!({
            "versions": { "1.0.0": {} },
            "time": { "created": "2020-01-01T00:00:00Z" }
        }));
        assert!(matches!(
            reduce_packument("x", "1.0.0", doc).unwrap_err(),
            RegistryError::PublishTimeMissing { .. }
        ));
    }

    #[test]
    fn test_reduce_non_string_publish_time() {
        let doc = packument(json!({
            "versions": { "1.0.0": {} },
            "time": { "1.0.0": 1577836800 }
        }));
        assert_eq!(
            reduce_packument("x", "1.0.0", doc).unwrap_err(),
            RegistryError::InvalidPublishTime {
                package: "x".to_string(),
                version: "1.0.0".to_string(),
                value: "1577836800".to_string(),
            }
        );
    }

    #[test]
    fn test_normalize_license_variants() {
        assert_eq!(
            normalize_license(Some(&json!("ISC")), None).as_deref(),
            Some("ISC")
        );
        assert_eq!(
            normalize_license(Some(&json!({ "type": "MIT", "url": "x" })), None).as_deref(),
            Some("MIT")
        );
        assert_eq!(
            normalize_license(
                None,
                Some(&json!([{ "type": "MIT" }, { "type": "Apache-2.0" }]))
            )
            .as_deref(),
            Some("MIT OR Apache-2.0")
        );
        assert_eq!(normalize_license(Some(&json!("")), None), None);
        assert_eq!(normalize_license(None, None), None);
    }

    #[test]
    fn test_retryable_errors() {
        let server: anyhow::Error = RegistryError::HttpStatus {
            package: "x".to_string(),
            status: 503,
        }
        .into();
        let not_found: anyhow::Error = RegistryError::HttpStatus {
            package: "x".to_string(),
            status: 404,
        }
        .into();
        let transport = anyhow::anyhow!("connection reset");

        assert!(NpmRegistryClient::is_retryable(&server));
        assert!(!NpmRegistryClient::is_retryable(&not_found));
        assert!(NpmRegistryClient::is_retryable(&transport));
    }

    #[tokio::test]
    async fn test_fetch_rejects_traversal_before_request() {
        let client = NpmRegistryClient::with_base_url("http://127.0.0.1:9").unwrap();
        let err = client.fetch_record("../admin", "1.0.0").await.unwrap_err();
        assert!(err.to_string().contains("path traversal"));

        let err = client.fetch_record("left-pad", "1.0.0/..").await.unwrap_err();
        assert!(err.to_string().contains("Version"));
    }
}
