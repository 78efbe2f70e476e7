/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to reach the lockfile, the npm registry, the on-disk approval record,
/// the operator and the Node.js runtime.
pub mod approval_prompt;
pub mod approval_store;
pub mod lockfile_reader;
pub mod node_runtime;
pub mod popularity_repository;
pub mod progress_reporter;
pub mod registry_repository;

pub use approval_prompt::ApprovalPrompt;
pub use approval_store::ApprovalStore;
pub use lockfile_reader::{LockfileReader, LockfileSource};
pub use node_runtime::{NodeAdvisoryRepository, NodeRuntimeProbe};
pub use popularity_repository::PopularityRepository;
pub use progress_reporter::ProgressReporter;
pub use registry_repository::RegistryRepository;
