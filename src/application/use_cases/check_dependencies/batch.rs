use crate::application::dto::EvaluationError;
use crate::policy_check::domain::{Dependency, Policy, Warning};
use crate::policy_check::services::PolicyEvaluator;
use crate::ports::outbound::{PopularityRepository, ProgressReporter, RegistryRepository};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::collections::{HashMap, HashSet};

/// Dependencies evaluated concurrently; chunks run one after another
pub(super) const CHUNK_SIZE: usize = 32;

/// Everything the batch produced, in dependency order
#[derive(Debug, Default)]
pub(super) struct BatchOutcome {
    pub warnings: Vec<Warning>,
    pub errors: Vec<EvaluationError>,
}

/// Runs registry lookups, popularity lookups and policy evaluation over the
/// dependency list with bounded concurrency
pub(super) struct BatchOrchestrator<'a, RR, PR> {
    registry: &'a RR,
    popularity: &'a PR,
    policy: &'a Policy,
    now: DateTime<Utc>,
}

impl<'a, RR, PR> BatchOrchestrator<'a, RR, PR>
where
    RR: RegistryRepository,
    PR: PopularityRepository,
{
    pub fn new(registry: &'a RR, popularity: &'a PR, policy: &'a Policy, now: DateTime<Utc>) -> Self {
        Self {
            registry,
            popularity,
            policy,
            now,
        }
    }

    pub async fn run<REP: ProgressReporter>(
        &self,
        dependencies: &[Dependency],
        reporter: &REP,
    ) -> BatchOutcome {
        let total = dependencies.len();
        let mut outcome = BatchOutcome::default();
        // Names whose download count has been requested, across chunk boundaries
        let mut queried: HashSet<String> = HashSet::new();
        let mut downloads: HashMap<String, u64> = HashMap::new();
        let mut done = 0;

        for chunk in dependencies.chunks(CHUNK_SIZE) {
            if self.policy.checks_popularity() {
                self.fetch_downloads(chunk, &mut queried, &mut downloads)
                    .await;
            }

            let results = join_all(chunk.iter().map(|dependency| {
                self.evaluate_one(dependency, downloads.get(dependency.name()).copied())
            }))
            .await;

            for (dependency, (warnings, failures)) in chunk.iter().zip(results) {
                outcome.warnings.extend(warnings);
                if failures.is_empty() {
                    continue;
                }
                let message = failures.join("; ");
                tracing::warn!(package = dependency.name(), version = dependency.version(), error = %message, "evaluation incomplete");
                outcome.errors.push(EvaluationError {
                    package: dependency.id(),
                    message,
                });
            }

            done += chunk.len();
            let last = chunk.last().map(|d| d.name());
            reporter.report_progress(done, total, last);
        }

        outcome
    }

    /// Looks up each name of the chunk once per run; failures stay unknown
    async fn fetch_downloads(
        &self,
        chunk: &[Dependency],
        queried: &mut HashSet<String>,
        downloads: &mut HashMap<String, u64>,
    ) {
        let names: Vec<&str> = chunk
            .iter()
            .map(|d| d.name())
            .filter(|name| queried.insert(name.to_string()))
            .collect();

        let fetched = join_all(names.iter().map(|name| async move {
            (*name, self.popularity.fetch_weekly_downloads(name).await)
        }))
        .await;

        for (name, result) in fetched {
            match result {
                Ok(count) => {
                    downloads.insert(name.to_string(), count);
                }
                Err(e) => {
                    tracing::warn!(package = name, error = %e, "weekly downloads unavailable");
                }
            }
        }
    }

    /// Warnings of the rules that could run, plus one message per failure
    ///
    /// A failed registry fetch still leaves the download rule to evaluate.
    async fn evaluate_one(
        &self,
        dependency: &Dependency,
        weekly_downloads: Option<u64>,
    ) -> (Vec<Warning>, Vec<String>) {
        let mut failures = Vec::new();
        let record = match self
            .registry
            .fetch_record(dependency.name(), dependency.version())
            .await
        {
            Ok(record) => Some(record),
            Err(e) => {
                failures.push(format!("{:#}", e));
                None
            }
        };

        let evaluation = PolicyEvaluator::evaluate(
            dependency,
            self.policy,
            record.as_ref(),
            weekly_downloads,
            self.now,
        );
        failures.extend(evaluation.errors.iter().map(ToString::to_string));
        (evaluation.warnings, failures)
    }
}
