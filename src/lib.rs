//! lockgate - supply-chain policy gate for npm projects
//!
//! This library checks the dependencies resolved in a `package-lock.json`
//! against a policy (install scripts, licenses, minimum package age, minimum
//! weekly downloads, block and ignore lists) and keeps an approval record so
//! accepted warnings do not come back, following hexagonal architecture and
//! Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`policy_check`): Pure business logic and domain models
//! - **Application Layer** (`application`): Use cases and application services
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use lockgate::prelude::*;
//! use std::path::{Path, PathBuf};
//!
//! # async fn run() -> Result<()> {
//! let cache_dir = Path::new("node_modules/.cache/lockgate");
//!
//! // Create adapters
//! let use_case = CheckDependenciesUseCase::new(
//!     FileSystemReader::new(),
//!     CachingRegistryRepository::new(NpmRegistryClient::new()?, cache_dir),
//!     PopularityCache::new(NpmDownloadsClient::new()?, cache_dir),
//!     YamlApprovalStore::new(PathBuf::from(DEFAULT_APPROVAL_FILE)),
//!     UnattendedApproval,
//!     StderrProgressReporter::new(),
//! );
//!
//! // Execute
//! let request = CheckRequest::new(PathBuf::from("."), None, Policy::default());
//! let response = use_case.execute(request).await?;
//! std::process::exit(response.exit_code().as_i32());
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod policy_check;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::{
        AutoApprove, ConsoleApprovalPrompt, StderrProgressReporter, UnattendedApproval,
    };
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemWriter, YamlApprovalStore, DEFAULT_APPROVAL_FILE,
    };
    pub use crate::adapters::outbound::network::{
        CachingRegistryRepository, NodeAdvisoryCache, NodeSecurityWgClient, NpmDownloadsClient,
        NpmRegistryClient, PopularityCache,
    };
    pub use crate::adapters::outbound::process::NodeVersionProbe;
    pub use crate::application::dto::{
        CheckOutcome, CheckRequest, CheckResponse, EvaluationError, RuntimeReport,
    };
    pub use crate::application::use_cases::{CheckDependenciesUseCase, CheckNodeRuntimeUseCase};
    pub use crate::ports::outbound::{
        ApprovalPrompt, ApprovalStore, LockfileReader, LockfileSource, NodeAdvisoryRepository,
        NodeRuntimeProbe, PopularityRepository, ProgressReporter, RegistryRepository,
    };
    pub use crate::policy_check::domain::{
        ApprovalRecord, Dependency, NodeAdvisory, PackageName, Policy, RegistryRecord, Version,
        VersionMeta, Warning, WarningIdentity, WarningKind,
    };
    pub use crate::policy_check::services::{
        ApprovalDecision, ApprovalReconciler, DependencyExtractor, Evaluation, NpmLockfile,
        PolicyEvaluator,
    };
    pub use crate::shared::error::{ExitCode, GateError, RegistryError};
    pub use crate::shared::Result;
}
