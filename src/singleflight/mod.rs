//! Single-Flight Coordinator (§4.2): coalesces concurrent calls keyed by a
//! string so that at most one call to the underlying function is in flight
//! per key at any time.
//!
//! Hand-rolled rather than pulled from a crate, per §9's guidance: "if the
//! target language lacks this primitive, a small map from key to a shared
//! future/promise plus a mutex suffices; followers subscribe to the
//! leader's completion."

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::broadcast;

/// Raised to every follower (and re-entrant caller) of a key whose leader
/// future was dropped — e.g. the caller's HTTP request was cancelled —
/// before it could broadcast a real result.
///
/// Every error type used with [`Group::work`] must provide a conversion
/// from this so followers get a real error instead of hanging forever.
#[derive(Debug, Clone, Error)]
#[error("single-flight leader was cancelled before completing")]
pub struct LeaderCancelled;

/// Coalesces concurrent [`Group::work`] calls sharing the same key.
///
/// The leader's result is broadcast to every follower that joined before it
/// completed. The map entry is removed the instant the leader's future
/// resolves (or is cancelled — see [`Group::work`]), so a call arriving
/// after that always starts a fresh invocation rather than rejoining a
/// finished one.
pub struct Group<K, V, E> {
    inflight: Mutex<HashMap<K, broadcast::Sender<Result<V, Arc<E>>>>>,
}

impl<K, V, E> Default for Group<K, V, E>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, E> Group<K, V, E>
where
    K: Eq + Hash + Clone,
    V: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Creates an empty coordinator.
    pub fn new() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `f` for `key`, coalescing with any call already in flight for
    /// the same key. Every caller — leader and followers alike — receives
    /// the leader's result.
    ///
    /// If the leader's future is dropped before `f` resolves (its caller was
    /// cancelled), a [`LeaderGuard`] still removes the map entry and
    /// broadcasts [`LeaderCancelled`] to every follower, so cancelling one
    /// caller can never wedge the key for everyone else.
    pub async fn work<F, Fut>(&self, key: K, f: F) -> Result<V, Arc<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: From<LeaderCancelled>,
    {
        {
            let guard = self.inflight.lock().expect("inflight mutex poisoned");
            if let Some(sender) = guard.get(&key) {
                let mut rx = sender.subscribe();
                drop(guard);
                return rx
                    .recv()
                    .await
                    .expect("single-flight leader dropped its sender before broadcasting");
            }
        }

        let (tx, _rx) = broadcast::channel(1);
        {
            let mut guard = self.inflight.lock().expect("inflight mutex poisoned");
            guard.insert(key.clone(), tx.clone());
        }

        let mut leader = LeaderGuard {
            group: self,
            key: key.clone(),
            tx: tx.clone(),
            completed: false,
        };

        let result: Result<V, Arc<E>> = f().await.map_err(Arc::new);

        leader.completed = true;
        self.inflight
            .lock()
            .expect("inflight mutex poisoned")
            .remove(&key);
        // No active followers is a normal outcome (we were the only caller); ignore the send error.
        let _ = tx.send(result.clone());

        result
    }

    /// Returns `true` if a call for `key` is currently in flight.
    pub async fn is_in_flight(&self, key: &K) -> bool {
        self.inflight.lock().expect("inflight mutex poisoned").contains_key(key)
    }
}

/// Removes `key`'s map entry and broadcasts [`LeaderCancelled`] to any
/// followers if dropped before `completed` is set — i.e. the leader's
/// future was cancelled mid-call rather than running to completion.
struct LeaderGuard<'g, K, V, E>
where
    K: Eq + Hash + Clone,
{
    group: &'g Group<K, V, E>,
    key: K,
    tx: broadcast::Sender<Result<V, Arc<E>>>,
    completed: bool,
}

impl<K, V, E> Drop for LeaderGuard<'_, K, V, E>
where
    K: Eq + Hash + Clone,
    V: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static + From<LeaderCancelled>,
{
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        self.group
            .inflight
            .lock()
            .expect("inflight mutex poisoned")
            .remove(&self.key);
        let _ = self.tx.send(Err(Arc::new(E::from(LeaderCancelled))));
    }
}
