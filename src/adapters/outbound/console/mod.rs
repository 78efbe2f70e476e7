/// Console adapters for operator-facing output and approval
mod approval_prompt;
mod progress_reporter;
mod warning_summary;

pub use approval_prompt::{AutoApprove, ConsoleApprovalPrompt, UnattendedApproval};
pub use progress_reporter::StderrProgressReporter;
pub use warning_summary::{render_warning_summary, summarize_counts};
