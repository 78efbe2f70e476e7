mod batch;

#[cfg(test)]
mod tests;

use crate::application::dto::{CheckOutcome, CheckRequest, CheckResponse, EvaluationError};
use crate::policy_check::services::{
    ApprovalDecision, ApprovalReconciler, DependencyExtractor, Extraction, NextStep, NpmLockfile,
    PackageRules, Reconciliation,
};
use crate::ports::outbound::{
    ApprovalPrompt, ApprovalStore, LockfileReader, PopularityRepository, ProgressReporter,
    RegistryRepository,
};
use crate::shared::Result;
use batch::BatchOrchestrator;

/// CheckDependenciesUseCase - Core use case for gating a project's dependencies
///
/// Extracts the installed dependencies, evaluates them against the policy,
/// diffs the warnings against the approval record and settles the run.
///
/// # Type Parameters
/// * `LR` - LockfileReader implementation
/// * `RR` - RegistryRepository implementation
/// * `PR` - PopularityRepository implementation
/// * `AS` - ApprovalStore implementation
/// * `AP` - ApprovalPrompt implementation
/// * `REP` - ProgressReporter implementation
pub struct CheckDependenciesUseCase<LR, RR, PR, AS, AP, REP> {
    lockfile_reader: LR,
    registry: RR,
    popularity: PR,
    approval_store: AS,
    approval_prompt: AP,
    progress_reporter: REP,
}

impl<LR, RR, PR, AS, AP, REP> CheckDependenciesUseCase<LR, RR, PR, AS, AP, REP>
where
    LR: LockfileReader,
    RR: RegistryRepository,
    PR: PopularityRepository,
    AS: ApprovalStore,
    AP: ApprovalPrompt,
    REP: ProgressReporter,
{
    /// Creates a new CheckDependenciesUseCase with injected dependencies
    pub fn new(
        lockfile_reader: LR,
        registry: RR,
        popularity: PR,
        approval_store: AS,
        approval_prompt: AP,
        progress_reporter: REP,
    ) -> Self {
        Self {
            lockfile_reader,
            registry,
            popularity,
            approval_store,
            approval_prompt,
            progress_reporter,
        }
    }

    /// Executes the dependency check
    ///
    /// # Errors
    /// Fails without evaluating anything when the lockfile is missing,
    /// unsupported or malformed, when a policy range is invalid, or when a
    /// blacklisted package is installed. Fails after evaluation only if the
    /// accepted approval record cannot be written.
    pub async fn execute(&self, request: CheckRequest) -> Result<CheckResponse> {
        // Step 1: Extract dependencies (blacklist is enforced here, before any request)
        let extraction = self.extract_dependencies(&request)?;

        // Step 2: Evaluate in chunks
        let now = chrono::Utc::now();
        let batch = BatchOrchestrator::new(&self.registry, &self.popularity, &request.policy, now)
            .run(&extraction.dependencies, &self.progress_reporter)
            .await;
        self.progress_reporter.report_completion(&format!(
            "✅ Evaluated {} dependencies",
            extraction.dependencies.len()
        ));

        if let Err(e) = self.popularity.flush().await {
            tracing::warn!(error = %e, "failed to write popularity cache");
        }
        self.report_evaluation_errors(&batch.errors);

        // Step 3: Classify against the approval record
        let prior = self.approval_store.load();
        let reconciliation = ApprovalReconciler::reconcile(batch.warnings, &prior);
        tracing::debug!(
            approved = reconciliation.approved.len(),
            unapproved = reconciliation.unapproved.len(),
            "warnings classified"
        );

        // Step 4: Decide
        let outcome = self.settle(&reconciliation).await?;

        Ok(CheckResponse {
            outcome,
            dependency_count: extraction.dependencies.len(),
            ignored: extraction.ignored,
            approved: reconciliation.approved,
            unapproved: reconciliation.unapproved,
            errors: batch.errors,
        })
    }

    /// Reads the lockfile and applies block/ignore rules
    fn extract_dependencies(&self, request: &CheckRequest) -> Result<Extraction> {
        let source = self
            .lockfile_reader
            .read_lockfile(&request.project_path, request.lockfile_path.as_deref())?;
        self.progress_reporter.report(&format!(
            "📖 Loading lockfile from: {}",
            source.path.display()
        ));

        let lockfile = NpmLockfile::parse(&source.content, &source.path)?;
        let blacklist = PackageRules::new("blacklist", &request.policy.blacklist)?;
        let ignore = PackageRules::new("ignore", &request.policy.ignore)?;

        let extraction = DependencyExtractor::extract(&lockfile, &blacklist, &ignore, |path| {
            self.lockfile_reader
                .is_installed(&request.project_path, path)
        })?;

        tracing::debug!(skipped = extraction.skipped, "lockfile entries skipped");

        self.progress_reporter.report(&format!(
            "✅ Detected {} dependencies ({} ignored)",
            extraction.dependencies.len(),
            extraction.ignored.len()
        ));

        Ok(extraction)
    }

    fn report_evaluation_errors(&self, errors: &[EvaluationError]) {
        if errors.is_empty() {
            return;
        }
        self.progress_reporter.report_error(&format!(
            "⚠️  {} dependencies could not be evaluated:",
            errors.len()
        ));
        for error in errors {
            self.progress_reporter
                .report_error(&format!("   - {}", error));
        }
    }

    /// Persists the rebuilt record only after an explicit acceptance
    async fn settle(&self, reconciliation: &Reconciliation) -> Result<CheckOutcome> {
        let interactive = self.approval_prompt.is_interactive();
        match ApprovalReconciler::next_step(reconciliation, interactive) {
            NextStep::Pass => Ok(CheckOutcome::Passed),
            NextStep::FailUnattended => Ok(CheckOutcome::RejectedUnattended),
            NextStep::AskOperator => {
                let decision = self
                    .approval_prompt
                    .request_approval(&reconciliation.unapproved)
                    .await?;
                match decision {
                    ApprovalDecision::Accepted => {
                        self.approval_store.save(&reconciliation.next_record)?;
                        Ok(CheckOutcome::Accepted)
                    }
                    ApprovalDecision::Rejected => Ok(CheckOutcome::Rejected),
                }
            }
        }
    }
}
