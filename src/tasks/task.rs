//! # The task entity: shared progress state, cancellation, children,
//! continuations.
//!
//! A [`Task`] is created once, wrapped in a [`TaskAnchor`], and then touched
//! from two threads: the worker running its [`Work`] body mutates it, and the
//! driver's poll thread reads it. One mutex guards all of the mutable shared
//! state; the cancellation flag and the pending-child counter are lock-free
//! because they only move one way.
//!
//! ## Locking rules
//! - `progress`, `progress_label`, `pending`, `continuations` live behind the
//!   single [`Mutex`]; every access goes through it.
//! - `cancelled` is a [`CancellationToken`]: sticky, only ever set, so reads
//!   need no lock.
//! - `pending_count` is atomic so [`Task::has_pending_tasks`] and the
//!   fast path of pending adoption avoid the lock.
//! - Parent/child updates always take the **parent's** lock, never the
//!   child's, so there is no lock ordering cycle between tasks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio_util::sync::CancellationToken;

use crate::core::TaskAnchor;
use crate::tasks::work::Work;
use crate::tasks::work_fn::WorkFn;

/// State mutated by the worker and read by the poller, behind one lock.
#[derive(Default)]
struct Shared {
    progress: f32,
    progress_label: String,
    /// Children spawned by the work body, not yet adopted by the driver.
    pending: Vec<TaskAnchor>,
    /// Follow-up anchors to splice into the live set after completion.
    continuations: Vec<TaskAnchor>,
}

/// A unit of background work with progress, cancellation, and the ability to
/// spawn children and continuations.
///
/// Constructed via [`Task::new`] (or [`Task::from_fn`]) and handed to a
/// [`TaskAnchor`], which owns its lifecycle. The work body receives `&Task`
/// and reports through it; the anchor polls it from the driver thread.
///
/// ## Example
/// ```
/// use taskdock::Task;
///
/// let task = Task::from_fn("scan", |task| {
///     task.set_progress(0.37, "scanning");
/// });
/// task.set_progress(1.7, "done");
/// // progress is clamped into [0, 1] on every write
/// assert_eq!(task.progress_snapshot().0, 1.0);
/// ```
pub struct Task {
    name: Arc<str>,
    cancellable: bool,
    visible: bool,
    cancelled: CancellationToken,
    pending_count: AtomicUsize,
    shared: Mutex<Shared>,
    work: Box<dyn Work>,
    /// Self-handle used to give spawned children a parent back-reference.
    this: Weak<Task>,
}

impl Task {
    /// Creates a task with explicit policy flags.
    ///
    /// - `cancellable`: whether a cancel request may set the cooperative
    ///   cancellation flag once the work is running.
    /// - `visible`: whether a UI driver should display this task.
    pub fn new(
        name: impl Into<Arc<str>>,
        cancellable: bool,
        visible: bool,
        work: impl Work,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            name: name.into(),
            cancellable,
            visible,
            cancelled: CancellationToken::new(),
            pending_count: AtomicUsize::new(0),
            shared: Mutex::new(Shared::default()),
            work: Box::new(work),
            this: this.clone(),
        })
    }

    /// Creates a cancellable, visible task from a closure.
    pub fn from_fn(
        name: impl Into<Arc<str>>,
        f: impl Fn(&Task) + Send + Sync + 'static,
    ) -> Arc<Self> {
        Self::new(name, true, true, WorkFn::new(f))
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a cancel request may set the cancellation flag.
    pub fn is_cancellable(&self) -> bool {
        self.cancellable
    }

    /// Whether a UI driver should display this task.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Stores the current progress and sub-step label.
    ///
    /// `p` is clamped into `[0.0, 1.0]` (NaN is treated as 0). Progress is
    /// monotonic by convention only; the framework does not enforce it.
    pub fn set_progress(&self, p: f32, label: impl Into<String>) {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        let mut shared = self.lock_shared();
        shared.progress = p;
        shared.progress_label = label.into();
    }

    /// Copies the current `(progress, label)` under the lock.
    ///
    /// This is what the anchor polls each tick; there is no guarantee every
    /// intermediate value is observed, only the most recent one.
    pub fn progress_snapshot(&self) -> (f32, String) {
        let shared = self.lock_shared();
        (shared.progress, shared.progress_label.clone())
    }

    /// Lock-free read of the sticky cancellation flag.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.is_cancelled()
    }

    /// Sets the cancellation flag, if this task's policy allows it.
    ///
    /// Sticky and idempotent: once set, the flag is never cleared. For a
    /// non-cancellable task this is a no-op.
    pub fn request_cancel(&self) {
        if self.cancellable {
            self.cancelled.cancel();
        }
    }

    /// True while any spawned child has not yet finished.
    pub fn has_pending_tasks(&self) -> bool {
        self.pending_count.load(Ordering::Acquire) != 0
    }

    /// Registers a child anchor spawned by the work body.
    ///
    /// Under the lock: bumps the pending count, gives the child a weak
    /// back-reference to this task, and tracks the anchor until the driver
    /// adopts it. Must be called from the thread executing this task's body.
    pub fn add_pending_task(&self, mut anchor: TaskAnchor) {
        let mut shared = self.lock_shared();
        self.pending_count.fetch_add(1, Ordering::AcqRel);
        anchor.set_parent(self.this.clone());
        shared.pending.push(anchor);
    }

    /// Appends a follow-up anchor to run after this task completes.
    ///
    /// Guarded by the same lock as the rest of the shared state, so a
    /// continuation appended late can never race with the driver moving the
    /// list out.
    pub fn add_continuation(&self, anchor: TaskAnchor) {
        self.lock_shared().continuations.push(anchor);
    }

    /// Replaces the continuation list wholesale.
    pub fn set_continuations(&self, anchors: Vec<TaskAnchor>) {
        let old = {
            let mut shared = self.lock_shared();
            std::mem::replace(&mut shared.continuations, anchors)
        };
        // Replaced anchors may notify their parents on drop; never do that
        // while holding this task's lock.
        drop(old);
    }

    /// Records that one tracked child anchor has finished or been discarded.
    ///
    /// Called exactly once per child, from the child anchor's teardown. The
    /// count saturates at zero.
    pub(crate) fn on_pending_task_done(&self) {
        let _shared = self.lock_shared();
        let _ = self
            .pending_count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
    }

    /// Moves out the accumulated continuations (empties the source).
    pub(crate) fn take_continuations(&self) -> Vec<TaskAnchor> {
        std::mem::take(&mut self.lock_shared().continuations)
    }

    /// Moves out the not-yet-adopted children (empties the source).
    ///
    /// Checks the atomic count first so the common no-children case never
    /// touches the lock. The count itself is *not* reset: it keeps tracking
    /// the moved-out children until each one finishes.
    pub(crate) fn take_pending(&self) -> Vec<TaskAnchor> {
        if !self.has_pending_tasks() {
            return Vec::new();
        }
        std::mem::take(&mut self.lock_shared().pending)
    }

    /// Runs the work body. Called from the executor's worker thread.
    pub(crate) fn run_work(&self) {
        self.work.run(self);
    }

    fn lock_shared(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaskAnchor;
    use std::time::Duration;

    fn noop(name: &str) -> Arc<Task> {
        Task::from_fn(name, |_| {})
    }

    #[test]
    fn progress_is_clamped_on_every_write() {
        let task = noop("clamp");

        task.set_progress(0.37, "scanning");
        assert_eq!(task.progress_snapshot(), (0.37, "scanning".to_string()));

        task.set_progress(-0.5, "low");
        assert_eq!(task.progress_snapshot().0, 0.0);

        task.set_progress(3.2, "high");
        assert_eq!(task.progress_snapshot().0, 1.0);

        task.set_progress(f32::NAN, "nan");
        assert_eq!(task.progress_snapshot().0, 0.0);
    }

    #[test]
    fn cancel_is_policy_gated_and_sticky() {
        let cancellable = noop("yes");
        assert!(!cancellable.is_cancelled());
        cancellable.request_cancel();
        assert!(cancellable.is_cancelled());
        cancellable.request_cancel();
        assert!(cancellable.is_cancelled());

        let stubborn = Task::new("no", false, true, WorkFn::new(|_: &Task| {}));
        stubborn.request_cancel();
        assert!(!stubborn.is_cancelled());
    }

    #[test]
    fn pending_count_tracks_children_one_by_one() {
        let count = |t: &Task| t.pending_count.load(Ordering::Acquire);

        let parent = noop("parent");
        assert!(!parent.has_pending_tasks());
        assert_eq!(count(&parent), 0);

        parent.add_pending_task(TaskAnchor::new(noop("a"), Duration::ZERO));
        assert_eq!(count(&parent), 1);
        assert!(parent.has_pending_tasks());
        parent.add_pending_task(TaskAnchor::new(noop("b"), Duration::ZERO));
        assert_eq!(count(&parent), 2);

        let mut children = parent.take_pending();
        assert_eq!(children.len(), 2);
        // Adopted but unfinished children still count as pending.
        assert!(parent.has_pending_tasks());

        drop(children.pop());
        assert_eq!(count(&parent), 1);
        assert!(parent.has_pending_tasks());

        drop(children.pop());
        assert_eq!(count(&parent), 0);
        assert!(!parent.has_pending_tasks());
    }

    #[test]
    fn pending_count_never_goes_negative() {
        let task = noop("solo");
        task.on_pending_task_done();
        assert!(!task.has_pending_tasks());
    }

    #[test]
    fn take_pending_twice_returns_empty() {
        let parent = noop("parent");
        parent.add_pending_task(TaskAnchor::new(noop("child"), Duration::ZERO));

        let first = parent.take_pending();
        assert_eq!(first.len(), 1);
        assert!(parent.take_pending().is_empty());
        drop(first);
    }

    #[test]
    fn continuations_move_out_exactly_once() {
        let task = noop("chain");
        task.add_continuation(TaskAnchor::new(noop("next"), Duration::ZERO));
        task.add_continuation(TaskAnchor::new(noop("after"), Duration::ZERO));

        let taken = task.take_continuations();
        assert_eq!(taken.len(), 2);
        assert!(task.take_continuations().is_empty());
    }

    #[test]
    fn set_continuations_replaces_the_list() {
        let task = noop("chain");
        task.add_continuation(TaskAnchor::new(noop("old"), Duration::ZERO));
        task.set_continuations(vec![TaskAnchor::new(noop("new"), Duration::ZERO)]);

        let taken = task.take_continuations();
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].name(), "new");
    }
}
