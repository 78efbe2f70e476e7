/// Use cases module containing application business logic orchestration
mod check_dependencies;
mod check_node_runtime;

pub use check_dependencies::CheckDependenciesUseCase;
pub use check_node_runtime::CheckNodeRuntimeUseCase;
