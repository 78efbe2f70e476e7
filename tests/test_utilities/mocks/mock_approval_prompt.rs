use lockgate::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock ApprovalPrompt with a fixed answer; clones share the question counter
#[derive(Clone)]
pub struct ScriptedPrompt {
    interactive: bool,
    decision: ApprovalDecision,
    asked: Arc<AtomicUsize>,
}

impl ScriptedPrompt {
    fn build(interactive: bool, decision: ApprovalDecision) -> Self {
        Self {
            interactive,
            decision,
            asked: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn unattended() -> Self {
        Self::build(false, ApprovalDecision::Rejected)
    }

    pub fn accepting() -> Self {
        Self::build(true, ApprovalDecision::Accepted)
    }

    pub fn rejecting() -> Self {
        Self::build(true, ApprovalDecision::Rejected)
    }

    pub fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ApprovalPrompt for ScriptedPrompt {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    async fn request_approval(&self, _warnings: &[Warning]) -> Result<ApprovalDecision> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        Ok(self.decision)
    }
}
