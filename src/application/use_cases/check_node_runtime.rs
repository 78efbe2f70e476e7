use crate::application::dto::RuntimeReport;
use crate::policy_check::services::NodeAdvisoryMatcher;
use crate::ports::outbound::{NodeAdvisoryRepository, NodeRuntimeProbe, ProgressReporter};

/// CheckNodeRuntimeUseCase - checks the local Node.js runtime against core advisories
///
/// Failures to probe the runtime or to fetch advisories are logged and yield
/// no report; they never fail the run.
///
/// # Type Parameters
/// * `NP` - NodeRuntimeProbe implementation
/// * `NA` - NodeAdvisoryRepository implementation
/// * `REP` - ProgressReporter implementation
pub struct CheckNodeRuntimeUseCase<NP, NA, REP> {
    probe: NP,
    advisories: NA,
    progress_reporter: REP,
}

impl<NP, NA, REP> CheckNodeRuntimeUseCase<NP, NA, REP>
where
    NP: NodeRuntimeProbe,
    NA: NodeAdvisoryRepository,
    REP: ProgressReporter,
{
    pub fn new(probe: NP, advisories: NA, progress_reporter: REP) -> Self {
        Self {
            probe,
            advisories,
            progress_reporter,
        }
    }

    pub async fn execute(&self) -> Option<RuntimeReport> {
        let node_version = match self.probe.node_version().await {
            Ok(version) => version,
            Err(e) => {
                tracing::warn!(error = %e, "skipping Node.js runtime check");
                return None;
            }
        };
        self.progress_reporter
            .report(&format!("🔎 Checking Node.js {} against security advisories", node_version));

        let advisories = match self.advisories.fetch_advisories().await {
            Ok(advisories) => advisories,
            Err(e) => {
                tracing::warn!(error = %e, "Node.js advisories unavailable");
                return None;
            }
        };

        let affecting = NodeAdvisoryMatcher::affecting(&advisories, &node_version)
            .into_iter()
            .cloned()
            .collect();

        Some(RuntimeReport {
            node_version,
            advisories: affecting,
        })
    }
}
