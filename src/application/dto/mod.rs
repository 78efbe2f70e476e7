/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod check_request;
mod check_response;
mod runtime_report;

pub use check_request::CheckRequest;
pub use check_response::{CheckOutcome, CheckResponse, EvaluationError};
pub use runtime_report::RuntimeReport;
