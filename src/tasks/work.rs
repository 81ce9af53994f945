//! # The work boundary: what a concrete background job must implement.

use crate::tasks::task::Task;

/// A blocking, cancellation-aware unit of background work.
///
/// `run` executes on a worker thread owned by the
/// [`Executor`](crate::Executor). Implementations should:
/// - check [`Task::is_cancelled`] periodically and return promptly when set;
/// - report status through [`Task::set_progress`];
/// - optionally spawn children via [`Task::add_pending_task`] or schedule
///   follow-ups via [`Task::add_continuation`], from this thread only.
///
/// There is no error channel: a failed job reports through its progress
/// label (or other channels owned by the implementation) and returns.
///
/// ## Example
/// ```
/// use taskdock::{Task, Work};
///
/// struct Scan {
///     entries: usize,
/// }
///
/// impl Work for Scan {
///     fn run(&self, task: &Task) {
///         for i in 0..self.entries {
///             if task.is_cancelled() {
///                 return;
///             }
///             task.set_progress(i as f32 / self.entries as f32, "scanning");
///         }
///     }
/// }
/// ```
pub trait Work: Send + Sync + 'static {
    /// Executes the job until completion or observed cancellation.
    fn run(&self, task: &Task);
}
