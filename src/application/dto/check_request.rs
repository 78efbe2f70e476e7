use crate::policy_check::domain::Policy;
use std::path::PathBuf;

/// CheckRequest - Internal request DTO for the dependency check use case
#[derive(Debug, Clone)]
pub struct CheckRequest {
    /// Project directory containing the lockfile and `node_modules`
    pub project_path: PathBuf,
    /// Lockfile given on the command line; discovered in `project_path` otherwise
    pub lockfile_path: Option<PathBuf>,
    pub policy: Policy,
}

impl CheckRequest {
    pub fn new(project_path: PathBuf, lockfile_path: Option<PathBuf>, policy: Policy) -> Self {
        Self {
            project_path,
            lockfile_path,
            policy,
        }
    }
}
