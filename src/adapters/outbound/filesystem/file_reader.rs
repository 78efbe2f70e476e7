use crate::ports::outbound::{LockfileReader, LockfileSource};
use crate::shared::error::GateError;
use crate::shared::security::read_regular_file;
use crate::shared::Result;
use std::path::Path;

/// npm lockfiles, in lookup order
const NPM_LOCKFILES: [&str; 2] = ["package-lock.json", "npm-shrinkwrap.json"];

/// Lockfiles of other package managers and the format name reported for them
const FOREIGN_LOCKFILES: [(&str, &str); 4] = [
    ("yarn.lock", "yarn"),
    ("pnpm-lock.yaml", "pnpm"),
    ("bun.lockb", "bun"),
    ("bun.lock", "bun"),
];

/// FileSystemReader adapter for reading the npm lockfile
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }

    fn foreign_format(path: &Path) -> Option<&'static str> {
        let file_name = path.file_name()?.to_str()?;
        FOREIGN_LOCKFILES
            .iter()
            .find(|(name, _)| *name == file_name)
            .map(|(_, format)| *format)
    }

    fn read(path: &Path) -> Result<LockfileSource> {
        let content = read_regular_file(path, "lockfile").map_err(|e| GateError::FileReadError {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
        Ok(LockfileSource {
            path: path.to_path_buf(),
            content,
        })
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LockfileReader for FileSystemReader {
    fn read_lockfile(
        &self,
        project_path: &Path,
        explicit_path: Option<&Path>,
    ) -> Result<LockfileSource> {
        if let Some(path) = explicit_path {
            if let Some(format) = Self::foreign_format(path) {
                return Err(GateError::UnsupportedLockfile {
                    path: path.to_path_buf(),
                    format: format.to_string(),
                }
                .into());
            }
            if !path.exists() {
                return Err(GateError::LockfileNotFound {
                    path: path.to_path_buf(),
                    suggestion: "Check the --lockfile path".to_string(),
                }
                .into());
            }
            return Self::read(path);
        }

        for name in NPM_LOCKFILES {
            let candidate = project_path.join(name);
            if candidate.exists() {
                return Self::read(&candidate);
            }
        }

        for (name, format) in FOREIGN_LOCKFILES {
            let candidate = project_path.join(name);
            if candidate.exists() {
                return Err(GateError::UnsupportedLockfile {
                    path: candidate,
                    format: format.to_string(),
                }
                .into());
            }
        }

        Err(GateError::LockfileNotFound {
            path: project_path.join(NPM_LOCKFILES[0]),
            suggestion: format!(
                "No package-lock.json in \"{}\".\n   \
                 Run `npm install` first, or point to the project with the --path option.",
                project_path.display()
            ),
        }
        .into())
    }

    fn is_installed(&self, project_path: &Path, install_path: &str) -> bool {
        project_path.join(install_path).is_dir()
    }
}
