//! # Completion handle for a submitted job.
//!
//! [`JobFuture`] is the poll side of the [`submit`](crate::exec::submit)
//! boundary. The hot path (`is_ready`) is a single atomic load, cheap enough
//! to call from a per-frame driver loop. The blocking waits exist for exactly
//! one caller: anchor teardown, which must not outlive the worker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Completion latch shared between the wrapped job and its [`JobFuture`].
pub(crate) struct Latch {
    ready: AtomicBool,
    lock: Mutex<()>,
    cv: Condvar,
}

impl Latch {
    pub(crate) fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
            lock: Mutex::new(()),
            cv: Condvar::new(),
        }
    }

    /// Marks the job complete and wakes all waiters.
    ///
    /// The store happens under the mutex so a waiter cannot check the flag,
    /// miss the notification, and then sleep forever.
    pub(crate) fn complete(&self) {
        let _guard = self.guard();
        self.ready.store(true, Ordering::Release);
        self.cv.notify_all();
    }

    pub(crate) fn is_set(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to the completion of one submitted job.
///
/// Exactly one future exists per submission; futures are never shared between
/// anchors. There is no result channel and no cancellation API on the future
/// itself — cancellation is cooperative through the task's flag.
pub struct JobFuture {
    latch: Arc<Latch>,
}

impl JobFuture {
    pub(crate) fn new(latch: Arc<Latch>) -> Self {
        Self { latch }
    }

    /// Non-blocking readiness check (single atomic load).
    pub fn is_ready(&self) -> bool {
        self.latch.is_set()
    }

    /// Blocks until the job has finished.
    pub fn wait(&self) {
        let mut guard = self.latch.guard();
        while !self.latch.is_set() {
            guard = self
                .latch
                .cv
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Blocks for at most `timeout`; returns whether the job finished.
    ///
    /// Callers that need a diagnosable wait (rather than a silent block)
    /// should call this in a loop and report between attempts.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self.latch.guard();
        let (_guard, _result) = self
            .latch
            .cv
            .wait_timeout_while(guard, timeout, |_| !self.latch.is_set())
            .unwrap_or_else(PoisonError::into_inner);
        self.latch.is_set()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_starts_unset() {
        let fut = JobFuture::new(Arc::new(Latch::new()));
        assert!(!fut.is_ready());
        assert!(!fut.wait_timeout(Duration::from_millis(10)));
    }

    #[test]
    fn complete_wakes_waiters() {
        let latch = Arc::new(Latch::new());
        let fut = JobFuture::new(latch.clone());

        let signaller = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            latch.complete();
        });

        fut.wait();
        assert!(fut.is_ready());
        assert!(fut.wait_timeout(Duration::ZERO));
        signaller.join().unwrap();
    }
}
