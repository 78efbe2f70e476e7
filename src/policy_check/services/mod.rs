pub mod age;
mod approval_reconciler;
mod dependency_extractor;
mod node_advisory_matcher;
mod package_rules;
mod policy_evaluator;

pub use approval_reconciler::{ApprovalDecision, ApprovalReconciler, NextStep, Reconciliation};
pub use dependency_extractor::{DependencyExtractor, Extraction, NpmLockfile};
pub use node_advisory_matcher::NodeAdvisoryMatcher;
pub use package_rules::PackageRules;
pub use policy_evaluator::{Evaluation, PolicyEvaluator};
