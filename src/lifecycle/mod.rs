//! Graceful shutdown: tracks in-flight requests and drains them with a deadline.

pub mod config;
pub mod error;
pub mod manager;
pub mod types;

pub use config::{DEFAULT_DRAIN_DEADLINE_SECS, LifecycleConfig};
pub use error::{LifecycleError, LifecycleResult};
pub use manager::{LifecycleManager, RequestGuard};
pub use types::DrainResult;
