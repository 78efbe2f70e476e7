use crate::policy_check::domain::{Dependency, Warning};
use crate::shared::error::ExitCode;
use std::fmt;

/// How a check run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// No unapproved warnings
    Passed,
    /// New warnings were accepted and the approval record was written
    Accepted,
    /// The operator declined the new warnings
    Rejected,
    /// New warnings in unattended mode
    RejectedUnattended,
}

impl CheckOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CheckOutcome::Passed | CheckOutcome::Accepted)
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::Success
        } else {
            ExitCode::UnapprovedWarnings
        }
    }
}

/// A dependency that could not be evaluated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationError {
    /// `name@version`
    pub package: String,
    pub message: String,
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.package, self.message)
    }
}

/// CheckResponse - Internal response DTO from the dependency check use case
#[derive(Debug, Clone)]
pub struct CheckResponse {
    pub outcome: CheckOutcome,
    /// Dependencies that were evaluated
    pub dependency_count: usize,
    /// Dependencies excluded by the ignore list
    pub ignored: Vec<Dependency>,
    /// Warnings already present in the approval record
    pub approved: Vec<Warning>,
    /// Warnings that were new in this run
    pub unapproved: Vec<Warning>,
    pub errors: Vec<EvaluationError>,
}

impl CheckResponse {
    pub fn exit_code(&self) -> ExitCode {
        self.outcome.exit_code()
    }
}
