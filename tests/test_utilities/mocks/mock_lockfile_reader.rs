use lockgate::prelude::*;
use std::path::Path;

/// Mock LockfileReader serving a fixed lockfile; every install path counts as installed
#[derive(Clone)]
pub struct MockLockfileReader {
    content: String,
}

impl MockLockfileReader {
    pub fn new(content: String) -> Self {
        Self { content }
    }

    /// v3 lockfile with one entry per `(install_path, version)`; the name is inferred from the path
    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        let mut packages = serde_json::Map::new();
        packages.insert("".to_string(), serde_json::json!({ "name": "app" }));
        for (path, version) in entries {
            packages.insert(path.to_string(), serde_json::json!({ "version": version }));
        }
        let lockfile = serde_json::json!({
            "name": "app",
            "lockfileVersion": 3,
            "packages": packages,
        });
        Self::new(lockfile.to_string())
    }
}

impl LockfileReader for MockLockfileReader {
    fn read_lockfile(
        &self,
        project_path: &Path,
        _explicit_path: Option<&Path>,
    ) -> Result<LockfileSource> {
        Ok(LockfileSource {
            path: project_path.join("package-lock.json"),
            content: self.content.clone(),
        })
    }

    fn is_installed(&self, _project_path: &Path, _install_path: &str) -> bool {
        true
    }
}
