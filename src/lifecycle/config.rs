use std::env;
use std::time::Duration;

use super::error::LifecycleResult;

/// Default deadline for draining in-flight requests on shutdown.
pub const DEFAULT_DRAIN_DEADLINE_SECS: u64 = crate::constants::DEFAULT_SHUTDOWN_DRAIN_DEADLINE
    .as_secs();

/// Lifecycle configuration for graceful shutdown / request draining.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// How long to wait for in-flight requests to finish before shutting down anyway.
    pub drain_deadline: Duration,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            drain_deadline: crate::constants::DEFAULT_SHUTDOWN_DRAIN_DEADLINE,
        }
    }
}

impl LifecycleConfig {
    const ENV_DRAIN_DEADLINE_SECS: &'static str = "LIFECYCLE_DRAIN_DEADLINE_SECS";

    /// Loads config from environment variables (with defaults).
    pub fn from_env() -> LifecycleResult<Self> {
        let defaults = Self::default();
        let drain_deadline = env::var(Self::ENV_DRAIN_DEADLINE_SECS)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.drain_deadline);

        Ok(Self { drain_deadline })
    }

    #[cfg(test)]
    pub fn for_testing(drain_deadline: Duration) -> Self {
        Self { drain_deadline }
    }
}
