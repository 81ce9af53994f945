//! # Closure-backed work body (`WorkFn`).

use crate::tasks::task::Task;
use crate::tasks::work::Work;

/// Function-backed [`Work`] implementation.
///
/// Wraps a closure receiving the owning [`Task`], through which it reports
/// progress, checks cancellation, and spawns children. Shared state between
/// runs is the closure's own business (`Arc` it explicitly if needed).
///
/// Usually reached through [`Task::from_fn`] rather than constructed
/// directly.
pub struct WorkFn<F> {
    f: F,
}

impl<F> WorkFn<F>
where
    F: Fn(&Task) + Send + Sync + 'static,
{
    /// Creates a new closure-backed work body.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Work for WorkFn<F>
where
    F: Fn(&Task) + Send + Sync + 'static,
{
    fn run(&self, task: &Task) {
        (self.f)(task)
    }
}
