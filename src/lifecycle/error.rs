use thiserror::Error;

/// Errors returned by lifecycle operations.
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// Shutdown was requested but the drain deadline elapsed with requests still in flight.
    #[error("drain deadline elapsed with {remaining} request(s) still in flight")]
    DrainTimedOut {
        /// Number of requests still in flight when the deadline elapsed.
        remaining: usize,
    },
}

/// Convenience result type for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;
