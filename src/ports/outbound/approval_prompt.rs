use crate::policy_check::domain::Warning;
use crate::policy_check::services::ApprovalDecision;
use crate::shared::Result;
use async_trait::async_trait;

/// ApprovalPrompt port - the capability to ask for acceptance of new warnings
///
/// Supplied by the interactive console adapter or by an unattended
/// (CI) adapter that never accepts.
#[async_trait]
pub trait ApprovalPrompt: Send + Sync {
    /// Whether a human can answer; unattended runs fail without asking
    fn is_interactive(&self) -> bool;

    /// Presents `warnings` and returns the operator's decision
    ///
    /// # Errors
    /// Returns an error if the answer cannot be read
    async fn request_approval(&self, warnings: &[Warning]) -> Result<ApprovalDecision>;
}
