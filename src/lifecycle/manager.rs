use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::Notify;
use tokio::time;

use super::config::LifecycleConfig;
use super::error::LifecycleResult;
use super::types::DrainResult;

/// Tracks in-flight requests and drains them on shutdown with a deadline.
///
/// Mirrors the atomics-plus-notify idle-tracking idiom the rest of the crate
/// uses for shared mutable counters, generalized from a single idle timer to
/// an in-flight counter that a shutdown signal can wait on.
pub struct LifecycleManager {
    config: LifecycleConfig,
    in_flight: Arc<AtomicUsize>,
    shutdown_initiated: Arc<AtomicBool>,
    drained: Arc<Notify>,
}

impl LifecycleManager {
    /// Creates a manager from an explicit config.
    pub fn new(config: LifecycleConfig) -> Self {
        Self {
            config,
            in_flight: Arc::new(AtomicUsize::new(0)),
            shutdown_initiated: Arc::new(AtomicBool::new(false)),
            drained: Arc::new(Notify::new()),
        }
    }

    /// Creates a manager from environment configuration.
    pub fn from_env() -> LifecycleResult<Self> {
        Ok(Self::new(LifecycleConfig::from_env()?))
    }

    /// Returns the active config.
    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Returns the current number of in-flight requests.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Returns `true` once [`Self::shutdown`] has been called.
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_initiated.load(Ordering::Acquire)
    }

    /// Registers one in-flight request. The returned guard decrements the
    /// counter (and wakes a waiting drain) when dropped.
    pub fn begin_request(&self) -> RequestGuard {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        RequestGuard {
            in_flight: Arc::clone(&self.in_flight),
            drained: Arc::clone(&self.drained),
        }
    }

    /// Marks shutdown as initiated (idempotent) and waits for in-flight
    /// requests to finish, up to `config.drain_deadline`.
    pub async fn shutdown(&self) -> DrainResult {
        self.shutdown_initiated.store(true, Ordering::Release);

        let initial = self.in_flight();
        if initial == 0 {
            return DrainResult::Completed { drained: 0 };
        }

        let deadline = time::sleep(self.config.drain_deadline);
        tokio::pin!(deadline);

        loop {
            if self.in_flight() == 0 {
                return DrainResult::Completed { drained: initial };
            }

            tokio::select! {
                _ = self.drained.notified() => continue,
                _ = &mut deadline => {
                    return DrainResult::TimedOut {
                        remaining: self.in_flight(),
                    };
                }
            }
        }
    }
}

/// RAII guard for one in-flight request, acquired via [`LifecycleManager::begin_request`].
pub struct RequestGuard {
    in_flight: Arc<AtomicUsize>,
    drained: Arc<Notify>,
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
        self.drained.notify_waiters();
    }
}
