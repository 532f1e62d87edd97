use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::StopSignal;

/// A group of spawned tasks that each wait on the same [`StopSignal`].
///
/// Every task increments a shared counter once it is released, which lets tests check how many
/// waiters have been woken up at any point.
#[derive(Debug)]
pub struct WaiterGroup {
    released: Arc<AtomicUsize>,
    handles: Vec<JoinHandle<()>>,
}

impl WaiterGroup {
    /// Spawns `count` tasks waiting on `signal`.
    pub fn spawn(signal: &StopSignal, count: usize) -> Self {
        let released = Arc::new(AtomicUsize::new(0));

        let handles = (0..count)
            .map(|_| {
                let signal = signal.clone();
                let released = released.clone();
                tokio::spawn(async move {
                    signal.wait().await;
                    released.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        Self { released, handles }
    }

    /// Returns the number of waiters in the group.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns `true` if the group has no waiters.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Returns how many waiters have been released so far.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Waits for every waiter to finish and returns how many were released.
    ///
    /// # Panics
    ///
    /// Panics if the waiters do not all finish within `timeout_duration`, or if a waiter task
    /// panicked.
    pub async fn join_within(self, timeout_duration: Duration) -> usize {
        let Ok(results) = timeout(timeout_duration, join_all(self.handles)).await else {
            panic!(
                "Waiters were not released within {timeout_duration:?} ({} of them were).",
                self.released.load(Ordering::SeqCst)
            );
        };

        for result in results {
            if let Err(err) = result {
                panic!("waiter task failed: {err}");
            }
        }

        self.released.load(Ordering::SeqCst)
    }
}
