//! # Bundled executor backed by tokio's blocking pool.

use tokio::runtime::Handle;

use crate::exec::executor::{Executor, Job};

/// [`Executor`] implementation that forwards jobs to
/// [`Handle::spawn_blocking`].
///
/// Work bodies are plain blocking closures, so they belong on the blocking
/// pool rather than the async worker threads. The join handle is discarded:
/// completion is tracked by the latch that [`submit`](crate::exec::submit)
/// wraps around every job.
///
/// ## Example
/// ```
/// use taskdock::TokioExecutor;
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// let exec = TokioExecutor::new(rt.handle().clone());
/// let fut = taskdock::submit(&exec, || { /* heavy work */ });
/// fut.wait();
/// ```
#[derive(Clone, Debug)]
pub struct TokioExecutor {
    handle: Handle,
}

impl TokioExecutor {
    /// Creates an executor submitting to the given runtime handle.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Creates an executor for the runtime the caller is running inside.
    ///
    /// ## Panics
    /// Panics if called outside a tokio runtime context, like
    /// [`Handle::current`].
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl Executor for TokioExecutor {
    fn execute(&self, job: Job) {
        self.handle.spawn_blocking(job);
    }
}
