use crate::shared::error::GateError;
use crate::shared::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// FileSystemWriter - atomic file replacement for caches and the approval record
///
/// Content is written to a temporary file next to the target and renamed over
/// it, so a crash never leaves a half-written cache shard behind.
pub struct FileSystemWriter {
    output_path: PathBuf,
}

impl FileSystemWriter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    pub fn path(&self) -> &Path {
        &self.output_path
    }

    fn write_error(&self, details: String) -> anyhow::Error {
        GateError::FileWriteError {
            path: self.output_path.clone(),
            details,
        }
        .into()
    }

    /// Security validation before writing: refuse to replace a symlink
    fn validate_output_security(&self) -> Result<()> {
        match fs::symlink_metadata(&self.output_path) {
            Ok(metadata) if metadata.is_symlink() => Err(self.write_error(
                "Security: Output path is a symbolic link. For security reasons, writing to symbolic links is not allowed.".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Creates missing parent directories, then atomically replaces the file
    pub fn write_atomically(&self, content: &str) -> Result<()> {
        self.validate_output_security()?;

        let parent = match self.output_path.parent() {
            Some(parent) if parent != Path::new("") => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)
            .map_err(|e| self.write_error(format!("Failed to create directory: {}", e)))?;

        let mut temp = NamedTempFile::new_in(&parent)
            .map_err(|e| self.write_error(format!("Failed to create temporary file: {}", e)))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| self.write_error(e.to_string()))?;
        temp.persist(&self.output_path)
            .map_err(|e| self.write_error(e.error.to_string()))?;

        Ok(())
    }
}
