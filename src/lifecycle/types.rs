/// Result of a graceful-shutdown drain attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainResult {
    /// All in-flight requests finished before the deadline.
    Completed {
        /// How many requests were in flight when shutdown was requested.
        drained: usize,
    },
    /// The deadline elapsed with requests still running.
    TimedOut {
        /// How many requests were still in flight when the deadline elapsed.
        remaining: usize,
    },
}
