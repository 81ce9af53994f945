//! # Submission boundary between the framework and an external worker pool.
//!
//! An [`Executor`] runs boxed closures somewhere off the driver thread; the
//! framework neither knows nor cares how (thread pool, dedicated thread,
//! tokio's blocking pool). [`submit`] is the only entry point anchors use: it
//! wraps the job so its completion latch fires on *any* exit — normal return
//! or panic — and hands back the [`JobFuture`] to poll.

use std::sync::Arc;

use crate::exec::future::{JobFuture, Latch};

/// A unit of work handed to an executor. Runs once, on a worker thread.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// External worker-pool boundary.
///
/// Implementations must run the job eventually and must not run it on the
/// caller's stack if the caller is a latency-sensitive driver loop (the
/// bundled [`TokioExecutor`](crate::TokioExecutor) uses tokio's blocking
/// pool). Submission is fire-and-forget: completion is observed through the
/// [`JobFuture`] returned by [`submit`], not through the executor.
pub trait Executor: Send + Sync {
    /// Schedules `job` to run on a worker thread.
    fn execute(&self, job: Job);
}

/// Fires the completion latch when dropped.
///
/// Lives inside the wrapped job so that a panicking work body still releases
/// anyone blocked in [`JobFuture::wait`] — an anchor must never hang on a
/// worker that died.
struct CompletionGuard(Arc<Latch>);

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.0.complete();
    }
}

/// Submits `job` to `exec` and returns a pollable completion handle.
///
/// ## Example
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use taskdock::{submit, Executor, Job};
///
/// struct Inline;
/// impl Executor for Inline {
///     fn execute(&self, job: Job) {
///         job();
///     }
/// }
///
/// let ran = Arc::new(AtomicBool::new(false));
/// let flag = ran.clone();
/// let fut = submit(&Inline, move || flag.store(true, Ordering::SeqCst));
/// assert!(fut.is_ready());
/// assert!(ran.load(Ordering::SeqCst));
/// ```
pub fn submit(exec: &dyn Executor, job: impl FnOnce() + Send + 'static) -> JobFuture {
    let latch = Arc::new(Latch::new());
    let inner = latch.clone();
    exec.execute(Box::new(move || {
        let _done = CompletionGuard(inner);
        job();
    }));
    JobFuture::new(latch)
}

/// Test executor that queues jobs and runs them only when asked.
///
/// Gives tests full control over the "worker finished" edge: a submitted job
/// stays pending until [`run_all`](ManualExecutor::run_all).
#[cfg(test)]
pub(crate) struct ManualExecutor {
    queue: std::sync::Mutex<Vec<Job>>,
}

#[cfg(test)]
impl ManualExecutor {
    pub(crate) fn new() -> Self {
        Self {
            queue: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Runs every queued job on the calling thread, in submission order.
    pub(crate) fn run_all(&self) {
        let jobs: Vec<Job> = std::mem::take(&mut *self.queue.lock().unwrap());
        for job in jobs {
            job();
        }
    }

    pub(crate) fn queued(&self) -> usize {
        self.queue.lock().unwrap().len()
    }
}

#[cfg(test)]
impl Executor for ManualExecutor {
    fn execute(&self, job: Job) {
        self.queue.lock().unwrap().push(job);
    }
}

/// Test executor that runs each job on its own OS thread.
#[cfg(test)]
pub(crate) struct ThreadExecutor;

#[cfg(test)]
impl Executor for ThreadExecutor {
    fn execute(&self, job: Job) {
        std::thread::spawn(job);
    }
}
