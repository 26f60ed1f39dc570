//! Counting completion barrier.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

struct BarrierState {
    pending: AtomicUsize,
    notify: Notify,
}

/// Lets one task wait until N others have each signaled completion.
///
/// Register the expected count with [`add`](Self::add) *before* launching
/// the tasks, otherwise [`wait`](Self::wait) may observe zero and return
/// while tasks are still being spawned.
#[derive(Clone)]
pub struct CompletionBarrier {
    inner: Arc<BarrierState>,
}

impl CompletionBarrier {
    /// Create a barrier with nothing pending.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BarrierState {
                pending: AtomicUsize::new(0),
                notify: Notify::new(),
            }),
        }
    }

    /// Register `n` more tasks that will each call [`done`](Self::done).
    pub fn add(&self, n: usize) {
        self.inner.pending.fetch_add(n, Ordering::AcqRel);
    }

    /// Signal that one registered task finished.
    ///
    /// # Panics
    ///
    /// Panics if called more times than tasks were registered.
    pub fn done(&self) {
        let previous = self
            .inner
            .pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .unwrap_or_else(|_| panic!("CompletionBarrier::done called with nothing pending"));

        if previous == 1 {
            self.inner.notify.notify_waiters();
        }
    }

    /// Returns a guard that calls [`done`](Self::done) when dropped.
    ///
    /// The guard consumes one already-registered slot; it does not register
    /// a new one. Dropping during a panic still signals.
    pub fn done_on_drop(&self) -> DoneGuard {
        DoneGuard {
            barrier: self.clone(),
        }
    }

    /// Number of tasks that have not signaled yet.
    pub fn pending(&self) -> usize {
        self.inner.pending.load(Ordering::Acquire)
    }

    /// Suspend until every registered task has signaled.
    ///
    /// Returns immediately when nothing is pending.
    pub async fn wait(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register interest before checking, so a notify_waiters between
            // the check and the await is not lost.
            notified.as_mut().enable();

            if self.pending() == 0 {
                return;
            }

            notified.await;
        }
    }
}

impl Default for CompletionBarrier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CompletionBarrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionBarrier")
            .field("pending", &self.pending())
            .finish()
    }
}

/// Signals its barrier once on drop.
#[must_use = "dropping the guard immediately signals completion"]
pub struct DoneGuard {
    barrier: CompletionBarrier,
}

impl Drop for DoneGuard {
    fn drop(&mut self) {
        self.barrier.done();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_returns_immediately_when_empty() {
        let barrier = CompletionBarrier::new();
        tokio::time::timeout(Duration::from_millis(100), barrier.wait())
            .await
            .expect("empty barrier should not block");
    }

    #[tokio::test]
    async fn test_wait_blocks_until_all_done() {
        let barrier = CompletionBarrier::new();
        barrier.add(3);

        for i in 0..3u64 {
            let barrier = barrier.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(5 * i)).await;
                barrier.done();
            });
        }

        barrier.wait().await;
        assert_eq!(barrier.pending(), 0);
    }

    #[tokio::test]
    async fn test_guard_signals_on_panic() {
        let barrier = CompletionBarrier::new();
        barrier.add(1);

        let guard = barrier.done_on_drop();
        let handle = tokio::spawn(async move {
            let _guard = guard;
            panic!("task blew up");
        });

        assert!(handle.await.is_err());
        tokio::time::timeout(Duration::from_secs(1), barrier.wait())
            .await
            .expect("guard should have signaled");
    }

    #[test]
    #[should_panic(expected = "nothing pending")]
    fn test_done_without_add_panics() {
        CompletionBarrier::new().done();
    }

    #[test]
    fn test_waiter_is_woken_by_last_done() {
        use tokio_test::{assert_pending, assert_ready, task};

        let barrier = CompletionBarrier::new();
        barrier.add(2);

        let mut waiter = task::spawn(barrier.wait());
        assert_pending!(waiter.poll());

        barrier.done();
        assert!(!waiter.is_woken());
        assert_pending!(waiter.poll());

        barrier.done();
        assert!(waiter.is_woken());
        assert_ready!(waiter.poll());
    }

    #[test]
    fn test_pending_counts_down() {
        let barrier = CompletionBarrier::default();
        barrier.add(2);
        assert_eq!(barrier.pending(), 2);
        barrier.done();
        assert_eq!(barrier.pending(), 1);
        assert!(format!("{:?}", barrier).contains("pending: 1"));
    }
}
