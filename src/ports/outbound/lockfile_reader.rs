use crate::shared::Result;
use std::path::{Path, PathBuf};

/// Raw lockfile content together with where it was read from
#[derive(Debug, Clone)]
pub struct LockfileSource {
    pub path: PathBuf,
    pub content: String,
}

/// LockfileReader port for locating and reading the npm lockfile
pub trait LockfileReader {
    /// Reads the project's npm lockfile
    ///
    /// # Arguments
    /// * `project_path` - Project directory
    /// * `explicit_path` - Lockfile chosen by the operator, if any
    ///
    /// # Errors
    /// Returns an error if:
    /// - No npm lockfile exists (`GateError::LockfileNotFound`)
    /// - Only a yarn/pnpm/bun lockfile exists, or the explicit path names one
    ///   (`GateError::UnsupportedLockfile`)
    /// - The file cannot be read
    fn read_lockfile(&self, project_path: &Path, explicit_path: Option<&Path>)
        -> Result<LockfileSource>;

    /// Whether a lockfile install path (e.g. `node_modules/fsevents`) exists on disk
    fn is_installed(&self, project_path: &Path, install_path: &str) -> bool;
}
