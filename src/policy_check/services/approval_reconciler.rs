use crate::policy_check::domain::{ApprovalRecord, Warning};

/// The operator's answer when asked to accept new warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    Accepted,
    Rejected,
}

/// What the run should do after classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Nothing new: succeed without prompting or writing
    Pass,
    /// New warnings in unattended mode: fail without writing
    FailUnattended,
    /// New warnings in interactive mode: ask, persist only on acceptance
    AskOperator,
}

/// Outcome of classifying the current warnings against the prior record
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub approved: Vec<Warning>,
    pub unapproved: Vec<Warning>,
    /// Exactly the identities of the current warnings
    pub next_record: ApprovalRecord,
}

impl Reconciliation {
    pub fn requires_approval(&self) -> bool {
        !self.unapproved.is_empty()
    }
}

/// ApprovalReconciler - diffs current warnings against accepted identities
pub struct ApprovalReconciler;

impl ApprovalReconciler {
    /// Classifies `warnings` and rebuilds the record to persist
    ///
    /// A prior record in another format version counts as empty. The rebuilt
    /// record replaces the prior one entirely, so identities that no longer
    /// occur are dropped.
    pub fn reconcile(warnings: Vec<Warning>, prior: &ApprovalRecord) -> Reconciliation {
        let next_record = ApprovalRecord::from_warnings(&warnings);

        let (approved, unapproved) = if prior.is_current_format() {
            let accepted = prior.identities();
            warnings
                .into_iter()
                .partition(|w| accepted.contains(&w.identity()))
        } else {
            (Vec::new(), warnings)
        };

        Reconciliation {
            approved,
            unapproved,
            next_record,
        }
    }

    pub fn next_step(reconciliation: &Reconciliation, interactive: bool) -> NextStep {
        match (reconciliation.requires_approval(), interactive) {
            (false, _) => NextStep::Pass,
            (true, false) => NextStep::FailUnattended,
            (true, true) => NextStep::AskOperator,
        }
    }
}
