use super::warning_summary::render_warning_summary;
use crate::policy_check::domain::Warning;
use crate::policy_check::services::ApprovalDecision;
use crate::ports::outbound::ApprovalPrompt;
use crate::shared::Result;
use async_trait::async_trait;
use std::io::{BufRead, IsTerminal, Write};

/// Interprets an operator's answer; only an explicit yes accepts
fn parse_answer(answer: &str) -> ApprovalDecision {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => ApprovalDecision::Accepted,
        _ => ApprovalDecision::Rejected,
    }
}

/// ConsoleApprovalPrompt asks the operator on the terminal
pub struct ConsoleApprovalPrompt {
    colored: bool,
}

impl ConsoleApprovalPrompt {
    pub fn new() -> Self {
        Self {
            colored: std::io::stderr().is_terminal(),
        }
    }
}

impl Default for ConsoleApprovalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApprovalPrompt for ConsoleApprovalPrompt {
    fn is_interactive(&self) -> bool {
        true
    }

    async fn request_approval(&self, warnings: &[Warning]) -> Result<ApprovalDecision> {
        eprintln!();
        eprint!("{}", render_warning_summary(warnings, self.colored));
        eprint!(
            "Accept {} new warning(s) and update the approval file? [y/N] ",
            warnings.len()
        );
        std::io::stderr().flush()?;

        // Reading stdin blocks; keep it off the async workers
        let answer = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line).map(|_| line)
        })
        .await??;

        Ok(parse_answer(&answer))
    }
}

/// UnattendedApproval never accepts; used in CI and without a terminal
pub struct UnattendedApproval;

#[async_trait]
impl ApprovalPrompt for UnattendedApproval {
    fn is_interactive(&self) -> bool {
        false
    }

    async fn request_approval(&self, _warnings: &[Warning]) -> Result<ApprovalDecision> {
        Ok(ApprovalDecision::Rejected)
    }
}

/// AutoApprove accepts every new warning, for an explicit `--yes`
pub struct AutoApprove {
    colored: bool,
}

impl AutoApprove {
    pub fn new() -> Self {
        Self {
            colored: std::io::stderr().is_terminal(),
        }
    }
}

impl Default for AutoApprove {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApprovalPrompt for AutoApprove {
    fn is_interactive(&self) -> bool {
        true
    }

    async fn request_approval(&self, warnings: &[Warning]) -> Result<ApprovalDecision> {
        eprintln!();
        eprint!("{}", render_warning_summary(warnings, self.colored));
        eprintln!("Accepting {} new warning(s) (--yes)", warnings.len());
        Ok(ApprovalDecision::Accepted)
    }
}
