use super::*;
use crate::policy_check::domain::{ApprovalRecord, Policy, RegistryRecord, VersionMeta, WarningKind};
use crate::ports::outbound::LockfileSource;
use crate::shared::error::GateError;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// Mock implementations for testing
struct MockLockfileReader {
    content: String,
}

impl MockLockfileReader {
    /// Lockfile with one `node_modules/<name>` entry per `(name, version)`
    fn with_packages(packages: &[(&str, &str)]) -> Self {
        let mut entries = serde_json::Map::new();
        entries.insert("".to_string(), serde_json::json!({ "name": "app" }));
        for (index, (name, version)) in packages.iter().enumerate() {
            // Repeated names get a nested install path so keys stay unique
            let path = if index > 0 && packages[..index].iter().any(|(n, _)| n == name) {
                format!("node_modules/host{}/node_modules/{}", index, name)
            } else {
                format!("node_modules/{}", name)
            };
            entries.insert(path, serde_json::json!({ "version": version }));
        }
        let lockfile = serde_json::json!({
            "name": "app",
            "lockfileVersion": 3,
            "packages": entries,
        });
        Self {
            content: lockfile.to_string(),
        }
    }
}

impl LockfileReader for MockLockfileReader {
    fn read_lockfile(&self, project_path: &Path, _explicit: Option<&Path>) -> Result<LockfileSource> {
        Ok(LockfileSource {
            path: project_path.join("package-lock.json"),
            content: self.content.clone(),
        })
    }

    fn is_installed(&self, _project_path: &Path, _install_path: &str) -> bool {
        true
    }
}

/// Serves an old, script-free record for every package unless told otherwise
struct MockRegistry {
    scripts: HashMap<String, (String, String)>,
    failing: Vec<String>,
    call_count: AtomicUsize,
}

impl MockRegistry {
    fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            failing: Vec::new(),
            call_count: AtomicUsize::new(0),
        }
    }

    fn with_script(mut self, package: &str, script: &str, body: &str) -> Self {
        self.scripts
            .insert(package.to_string(), (script.to_string(), body.to_string()));
        self
    }

    fn failing_for(mut self, package: &str) -> Self {
        self.failing.push(package.to_string());
        self
    }
}

#[async_trait]
impl RegistryRepository for MockRegistry {
    async fn fetch_record(&self, package_name: &str, version: &str) -> Result<RegistryRecord> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if self.failing.iter().any(|p| p == package_name) {
            anyhow::bail!("Registry returned status 500 for {}", package_name);
        }
        let scripts = self
            .scripts
            .get(package_name)
            .map(|(s, b)| BTreeMap::from([(s.clone(), b.clone())]))
            .unwrap_or_default();
        let published = (Utc::now() - Duration::days(365)).to_rfc3339();
        Ok(RegistryRecord::new(
            BTreeMap::from([(version.to_string(), published)]),
            BTreeMap::from([(
                version.to_string(),
                VersionMeta {
                    license: Some("MIT".to_string()),
                    scripts,
                },
            )]),
        ))
    }
}

/// Serves fixed counts; names absent from the map fail
struct MockPopularity {
    counts: HashMap<String, u64>,
    queried: Mutex<Vec<String>>,
    flushes: AtomicUsize,
}

impl MockPopularity {
    fn new(counts: &[(&str, u64)]) -> Self {
        Self {
            counts: counts.iter().map(|(n, c)| (n.to_string(), *c)).collect(),
            queried: Mutex::new(Vec::new()),
            flushes: AtomicUsize::new(0),
        }
    }

    fn queried(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl PopularityRepository for MockPopularity {
    async fn fetch_weekly_downloads(&self, package_name: &str) -> Result<u64> {
        self.queried.lock().unwrap().push(package_name.to_string());
        self.counts
            .get(package_name)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("network unreachable"))
    }

    async fn flush(&self) -> Result<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct InMemoryApprovalStore {
    record: RefCell<ApprovalRecord>,
    saves: AtomicUsize,
}

impl InMemoryApprovalStore {
    fn new(record: ApprovalRecord) -> Self {
        Self {
            record: RefCell::new(record),
            saves: AtomicUsize::new(0),
        }
    }
}

impl ApprovalStore for InMemoryApprovalStore {
    fn load(&self) -> ApprovalRecord {
        self.record.borrow().clone()
    }

    fn save(&self, record: &ApprovalRecord) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.record.borrow_mut() = record.clone();
        Ok(())
    }
}

struct ScriptedPrompt {
    interactive: bool,
    decision: ApprovalDecision,
    asked: AtomicUsize,
}

impl ScriptedPrompt {
    fn unattended() -> Self {
        Self {
            interactive: false,
            decision: ApprovalDecision::Rejected,
            asked: AtomicUsize::new(0),
        }
    }

    fn answering(decision: ApprovalDecision) -> Self {
        Self {
            interactive: true,
            decision,
            asked: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ApprovalPrompt for ScriptedPrompt {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    async fn request_approval(&self, _warnings: &[crate::policy_check::domain::Warning]) -> Result<ApprovalDecision> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        Ok(self.decision)
    }
}

struct MockProgressReporter;

impl ProgressReporter for MockProgressReporter {
    fn report(&self, _message: &str) {}
    fn report_progress(&self, _current: usize, _total: usize, _message: Option<&str>) {}
    fn report_error(&self, _message: &str) {}
    fn report_completion(&self, _message: &str) {}
}

type TestUseCase = CheckDependenciesUseCase<
    MockLockfileReader,
    MockRegistry,
    MockPopularity,
    InMemoryApprovalStore,
    ScriptedPrompt,
    MockProgressReporter,
>;

fn use_case(
    reader: MockLockfileReader,
    registry: MockRegistry,
    popularity: MockPopularity,
    store: InMemoryApprovalStore,
    prompt: ScriptedPrompt,
) -> TestUseCase {
    CheckDependenciesUseCase::new(reader, registry, popularity, store, prompt, MockProgressReporter)
}

fn request(policy: Policy) -> CheckRequest {
    CheckRequest::new(PathBuf::from("/project"), None, policy)
}

#[tokio::test]
async fn test_empty_lockfile_passes() {
    let uc = use_case(
        MockLockfileReader::with_packages(&[]),
        MockRegistry::new(),
        MockPopularity::new(&[]),
        InMemoryApprovalStore::new(ApprovalRecord::empty()),
        ScriptedPrompt::unattended(),
    );

    let response = uc.execute(request(Policy::default())).await.unwrap();
    assert_eq!(response.outcome, CheckOutcome::Passed);
    assert_eq!(response.dependency_count, 0);
    assert!(response.unapproved.is_empty());
}

#[tokio::test]
async fn test_unattended_run_fails_without_writing() {
    let uc = use_case(
        MockLockfileReader::with_packages(&[("esbuild", "0.20.0"), ("react", "18.2.0")]),
        MockRegistry::new().with_script("esbuild", "postinstall", "node install.js"),
        MockPopularity::new(&[]),
        InMemoryApprovalStore::new(ApprovalRecord::empty()),
        ScriptedPrompt::unattended(),
    );

    let response = uc.execute(request(Policy::default())).await.unwrap();
    assert_eq!(response.outcome, CheckOutcome::RejectedUnattended);
    assert_eq!(response.unapproved.len(), 1);
    assert_eq!(response.unapproved[0].kind(), WarningKind::Script);
    assert_eq!(uc.approval_store.saves.load(Ordering::SeqCst), 0);
    assert_eq!(uc.approval_prompt.asked.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_accept_then_rerun_is_clean() {
    let uc = use_case(
        MockLockfileReader::with_packages(&[("esbuild", "0.20.0")]),
        MockRegistry::new().with_script("esbuild", "postinstall", "node install.js"),
        MockPopularity::new(&[]),
        InMemoryApprovalStore::new(ApprovalRecord::empty()),
        ScriptedPrompt::answering(ApprovalDecision::Accepted),
    );

    let first = uc.execute(request(Policy::default())).await.unwrap();
    assert_eq!(first.outcome, CheckOutcome::Accepted);
    assert_eq!(uc.approval_store.saves.load(Ordering::SeqCst), 1);

    let second = uc.execute(request(Policy::default())).await.unwrap();
    assert_eq!(second.outcome, CheckOutcome::Passed);
    assert_eq!(second.approved.len(), 1);
    assert_eq!(uc.approval_prompt.asked.load(Ordering::SeqCst), 1);
    assert_eq!(uc.approval_store.saves.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_rejection_does_not_write() {
    let uc = use_case(
        MockLockfileReader::with_packages(&[("esbuild", "0.20.0")]),
        MockRegistry::new().with_script("esbuild", "install", "node-gyp rebuild"),
        MockPopularity::new(&[]),
        InMemoryApprovalStore::new(ApprovalRecord::empty()),
        ScriptedPrompt::answering(ApprovalDecision::Rejected),
    );

    let response = uc.execute(request(Policy::default())).await.unwrap();
    assert_eq!(response.outcome, CheckOutcome::Rejected);
    assert_eq!(uc.approval_store.saves.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_accepted_record_drops_stale_identities() {
    let stale = crate::policy_check::domain::Warning::new(
        "removed-pkg".to_string(),
        WarningKind::Script,
        "old".to_string(),
        "install: make".to_string(),
    );
    let uc = use_case(
        MockLockfileReader::with_packages(&[("esbuild", "0.20.0")]),
        MockRegistry::new().with_script("esbuild", "postinstall", "node install.js"),
        MockPopularity::new(&[]),
        InMemoryApprovalStore::new(ApprovalRecord::from_warnings(&[stale])),
        ScriptedPrompt::answering(ApprovalDecision::Accepted),
    );

    uc.execute(request(Policy::default())).await.unwrap();
    let saved = uc.approval_store.load();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved.packages[0].package, "esbuild");
}

#[tokio::test]
async fn test_blacklisted_package_aborts_before_network() {
    let policy = Policy {
        blacklist: BTreeMap::from([("event-stream".to_string(), "3.3.6".to_string())]),
        min_weekly_downloads: 10,
        ..Policy::default()
    };
    let uc = use_case(
        MockLockfileReader::with_packages(&[("event-stream", "3.3.6"), ("react", "18.2.0")]),
        MockRegistry::new(),
        MockPopularity::new(&[]),
        InMemoryApprovalStore::new(ApprovalRecord::empty()),
        ScriptedPrompt::unattended(),
    );

    let err = uc.execute(request(policy)).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GateError>(),
        Some(GateError::BlockedPackage { .. })
    ));
    assert_eq!(uc.registry.call_count.load(Ordering::SeqCst), 0);
    assert!(uc.popularity.queried().is_empty());
}

#[tokio::test]
async fn test_registry_failure_is_isolated() {
    let uc = use_case(
        MockLockfileReader::with_packages(&[("broken", "1.0.0"), ("esbuild", "0.20.0")]),
        MockRegistry::new()
            .failing_for("broken")
            .with_script("esbuild", "postinstall", "node install.js"),
        MockPopularity::new(&[]),
        InMemoryApprovalStore::new(ApprovalRecord::empty()),
        ScriptedPrompt::unattended(),
    );

    let response = uc.execute(request(Policy::default())).await.unwrap();
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].package, "broken@1.0.0");
    assert_eq!(response.unapproved.len(), 1);
    assert_eq!(response.unapproved[0].package(), "esbuild");
}

#[tokio::test]
async fn test_registry_failure_still_reports_low_downloads() {
    let policy = Policy {
        min_weekly_downloads: 1_000,
        ..Policy::default()
    };
    let uc = use_case(
        MockLockfileReader::with_packages(&[("obscure", "0.1.0")]),
        MockRegistry::new().failing_for("obscure"),
        MockPopularity::new(&[("obscure", 3)]),
        InMemoryApprovalStore::new(ApprovalRecord::empty()),
        ScriptedPrompt::unattended(),
    );

    let response = uc.execute(request(policy)).await.unwrap();
    assert_eq!(response.outcome, CheckOutcome::RejectedUnattended);
    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("status 500"));
    assert_eq!(response.unapproved.len(), 1);
    assert_eq!(response.unapproved[0].kind(), WarningKind::MinWeeklyDownloads);
    assert_eq!(response.unapproved[0].package(), "obscure");
}

#[tokio::test]
async fn test_popularity_queried_once_per_name_across_chunks() {
    // 40 versions of one name span two chunks
    let versions: Vec<String> = (0..40).map(|i| format!("1.0.{}", i)).collect();
    let mut packages: Vec<(&str, &str)> = versions.iter().map(|v| ("multi", v.as_str())).collect();
    packages.push(("other", "2.0.0"));

    let policy = Policy {
        min_weekly_downloads: 100,
        ..Policy::default()
    };
    let uc = use_case(
        MockLockfileReader::with_packages(&packages),
        MockRegistry::new(),
        MockPopularity::new(&[("multi", 5), ("other", 1_000_000)]),
        InMemoryApprovalStore::new(ApprovalRecord::empty()),
        ScriptedPrompt::unattended(),
    );

    let response = uc.execute(request(policy)).await.unwrap();
    assert_eq!(
        uc.popularity.queried(),
        vec!["multi".to_string(), "other".to_string()]
    );
    assert_eq!(uc.popularity.flushes.load(Ordering::SeqCst), 1);

    // Every version warns under the same threshold key
    assert_eq!(response.dependency_count, 41);
    assert_eq!(response.unapproved.len(), 40);
    assert!(response
        .unapproved
        .iter()
        .all(|w| w.kind() == WarningKind::MinWeeklyDownloads
            && w.cache_key() == "minWeeklyDownloads=100"));
}

#[tokio::test]
async fn test_unknown_popularity_never_warns() {
    let policy = Policy {
        min_weekly_downloads: 1_000,
        ..Policy::default()
    };
    let uc = use_case(
        MockLockfileReader::with_packages(&[("offline-pkg", "1.0.0")]),
        MockRegistry::new(),
        MockPopularity::new(&[]),
        InMemoryApprovalStore::new(ApprovalRecord::empty()),
        ScriptedPrompt::unattended(),
    );

    let response = uc.execute(request(policy)).await.unwrap();
    assert_eq!(response.outcome, CheckOutcome::Passed);
    assert_eq!(uc.popularity.queried(), vec!["offline-pkg".to_string()]);
}

#[tokio::test]
async fn test_ignored_packages_are_not_evaluated() {
    let policy = Policy {
        ignore: BTreeMap::from([("esbuild".to_string(), "*".to_string())]),
        ..Policy::default()
    };
    let uc = use_case(
        MockLockfileReader::with_packages(&[("esbuild", "0.20.0")]),
        MockRegistry::new().with_script("esbuild", "postinstall", "node install.js"),
        MockPopularity::new(&[]),
        InMemoryApprovalStore::new(ApprovalRecord::empty()),
        ScriptedPrompt::unattended(),
    );

    let response = uc.execute(request(policy)).await.unwrap();
    assert_eq!(response.outcome, CheckOutcome::Passed);
    assert_eq!(response.ignored.len(), 1);
    assert_eq!(uc.registry.call_count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_policy_range_is_fatal() {
    let policy = Policy {
        blacklist: BTreeMap::from([("x".to_string(), ">>>1".to_string())]),
        ..Policy::default()
    };
    let uc = use_case(
        MockLockfileReader::with_packages(&[("x", "1.0.0")]),
        MockRegistry::new(),
        MockPopularity::new(&[]),
        InMemoryApprovalStore::new(ApprovalRecord::empty()),
        ScriptedPrompt::unattended(),
    );

    let err = uc.execute(request(policy)).await.unwrap_err();
    assert!(err.to_string().contains("Invalid policy"));
}
