/// Mock implementations for testing
mod mock_approval_prompt;
mod mock_approval_store;
mod mock_lockfile_reader;
mod mock_popularity_repository;
mod mock_progress_reporter;
mod mock_registry_repository;

pub use mock_approval_prompt::ScriptedPrompt;
pub use mock_approval_store::InMemoryApprovalStore;
pub use mock_lockfile_reader::MockLockfileReader;
pub use mock_popularity_repository::MockPopularityRepository;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_registry_repository::{CountingRegistry, PackageFixture};
