use super::FileSystemWriter;
use crate::policy_check::domain::ApprovalRecord;
use crate::ports::outbound::ApprovalStore;
use crate::shared::security::read_regular_file;
use crate::shared::Result;
use std::path::PathBuf;

/// Default approval file name, relative to the project directory
pub const DEFAULT_APPROVAL_FILE: &str = ".lockgate-approvals.yml";

/// YamlApprovalStore adapter - keeps the approval record in a YAML file
pub struct YamlApprovalStore {
    path: PathBuf,
}

impl YamlApprovalStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ApprovalStore for YamlApprovalStore {
    fn load(&self) -> ApprovalRecord {
        if !self.path.exists() {
            return ApprovalRecord::empty();
        }

        let content = match read_regular_file(&self.path, "approval file") {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot read approval file; starting from an empty record");
                return ApprovalRecord::empty();
            }
        };

        match serde_yaml_ng::from_str::<ApprovalRecord>(&content) {
            Ok(record) => {
                if !record.is_current_format() {
                    tracing::warn!(
                        path = %self.path.display(),
                        version = record.version,
                        "approval file has an unknown format version; it will be rebuilt"
                    );
                }
                record
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "approval file is malformed; it will be rebuilt");
                ApprovalRecord::empty()
            }
        }
    }

    fn save(&self, record: &ApprovalRecord) -> Result<()> {
        let yaml = serde_yaml_ng::to_string(record)?;
        FileSystemWriter::new(self.path.clone()).write_atomically(&yaml)?;
        tracing::debug!(path = %self.path.display(), entries = record.len(), "approval record written");
        Ok(())
    }
}
