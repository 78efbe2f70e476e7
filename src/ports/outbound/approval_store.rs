use crate::policy_check::domain::ApprovalRecord;
use crate::shared::Result;

/// ApprovalStore port for the persisted approval record
pub trait ApprovalStore {
    /// Loads the prior record
    ///
    /// Never fails: a missing, unreadable or malformed file yields
    /// `ApprovalRecord::empty()`. A record with a foreign format version is
    /// returned as-is and ignored by the reconciler.
    fn load(&self) -> ApprovalRecord;

    /// Replaces the stored record
    ///
    /// # Errors
    /// Returns an error if the record cannot be serialized or written
    fn save(&self, record: &ApprovalRecord) -> Result<()>;
}
