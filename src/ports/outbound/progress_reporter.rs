/// ProgressReporter port for operator-facing progress output
///
/// Kept separate from diagnostic logging (`tracing`): everything sent here
/// is meant to be read by the person running the check.
pub trait ProgressReporter {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Reports progress through the dependency list
    ///
    /// # Arguments
    /// * `current` - Dependencies evaluated so far
    /// * `total` - Dependencies to evaluate
    /// * `message` - Optional message to include
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports an error or warning message
    fn report_error(&self, message: &str);

    /// Reports completion of an operation
    fn report_completion(&self, message: &str);
}
