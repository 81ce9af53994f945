//! # TaskAnchor: lifecycle wrapper around one task.
//!
//! An anchor drives a [`Task`] through a three-state machine, bridges it to
//! the execution primitive, and caches the last-polled progress so the driver
//! can read it without touching the task's lock.
//!
//! ## State machine
//! ```text
//! WaitingToStart ──(delay elapsed, submit to executor)──► Started ──(future ready)──► Done
//!       │                                                                              ▲
//!       └──────────────────────(cancel before start)──────────────────────────────────┘
//! ```
//! No back-transitions. Each `update(dt)`:
//! - **WaitingToStart**: counts `time_to_start` down; at zero submits the
//!   work body and records the [`JobFuture`]. Exactly one submission ever
//!   happens.
//! - **Started**: non-blocking readiness poll. Ready → `Done` with cached
//!   progress forced to 1.0 and the label cleared; not ready → copy
//!   `(progress, label)` from the task under its lock.
//! - **Done**: no-op.
//!
//! ## Teardown contract
//! Dropping a started anchor cancels its task (policy-gated) and blocks until
//! the worker finishes, so no worker ever outlives the task it references.
//! The wait wakes every stall interval to publish a
//! [`JoinStalled`](crate::EventKind::JoinStalled) diagnostic; a work body that
//! never polls its cancellation flag turns this into an observable stall
//! rather than a silent freeze.

use std::sync::{Arc, Weak};
use std::time::Duration;

use crate::events::{Bus, Event, EventKind};
use crate::exec::{submit, Executor, JobFuture};
use crate::tasks::Task;

/// Interval between stall diagnostics for anchors outside a
/// [`TaskSet`](crate::TaskSet); set-owned anchors get
/// [`Config::stall_warn`](crate::Config::stall_warn).
const DEFAULT_STALL_WARN: Duration = Duration::from_secs(1);

/// Lifecycle state of a [`TaskAnchor`]. Transitions are one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Counting down the start delay; work not yet submitted.
    WaitingToStart,
    /// Work submitted to the executor; future being polled.
    Started,
    /// Terminal: work finished, or cancelled before ever starting.
    Done,
}

/// Scheduler-facing wrapper that owns one [`Task`] for its lifetime.
///
/// Anchors live either in a driver's [`TaskSet`](crate::TaskSet) or inside a
/// parent task's pending list until adoption. The driver calls
/// [`update`](TaskAnchor::update) every tick and reads the cached
/// [`progress`](TaskAnchor::progress) / [`progress_label`](TaskAnchor::progress_label)
/// without locking.
pub struct TaskAnchor {
    task: Arc<Task>,
    status: TaskStatus,
    time_to_start: Duration,
    future: Option<JobFuture>,
    /// Last-polled progress, safe to read without the task's lock.
    progress: f32,
    progress_label: String,
    /// Back-reference to the task that spawned this anchor as a pending
    /// child. Dangling once the parent is gone, which is fine: a dead parent
    /// has no pending count left to maintain.
    parent: Weak<Task>,
    bus: Option<Bus>,
    stall_warn: Duration,
}

impl TaskAnchor {
    /// Wraps a freshly constructed task with a start delay.
    pub fn new(task: Arc<Task>, delay: Duration) -> Self {
        Self {
            task,
            status: TaskStatus::WaitingToStart,
            time_to_start: delay,
            future: None,
            progress: 0.0,
            progress_label: String::new(),
            parent: Weak::new(),
            bus: None,
            stall_warn: DEFAULT_STALL_WARN,
        }
    }

    /// Advances the state machine by `dt`.
    ///
    /// Never blocks. Submission happens on the tick where the cumulative
    /// elapsed time reaches the delay; repeated calls while `Started` only
    /// poll, they never resubmit.
    pub fn update(&mut self, exec: &dyn Executor, dt: Duration) {
        match self.status {
            TaskStatus::WaitingToStart => {
                self.time_to_start = self.time_to_start.saturating_sub(dt);
                if self.time_to_start.is_zero() {
                    let task = self.task.clone();
                    self.future = Some(submit(exec, move || task.run_work()));
                    self.status = TaskStatus::Started;
                    self.publish(Event::new(EventKind::TaskSubmitted).with_task(self.task.name()));
                }
            }
            TaskStatus::Started => {
                let ready = self.future.as_ref().map_or(true, JobFuture::is_ready);
                if ready {
                    self.status = TaskStatus::Done;
                    // The driver treats Done as 100% regardless of what the
                    // work body last reported.
                    self.progress = 1.0;
                    self.progress_label.clear();
                    self.publish(Event::new(EventKind::TaskCompleted).with_task(self.task.name()));
                } else {
                    let (p, label) = self.task.progress_snapshot();
                    self.progress = p;
                    self.progress_label = label;
                }
            }
            TaskStatus::Done => {}
        }
    }

    /// Requests cancellation.
    ///
    /// A waiting anchor moves straight to `Done` and its work body never
    /// runs, regardless of the task's cancellable policy. A started anchor
    /// keeps its status; the cancellation flag is set iff the task allows
    /// it, and the next [`update`](TaskAnchor::update) after the worker
    /// exits observes completion. Idempotent.
    pub fn cancel(&mut self) {
        if self.status == TaskStatus::WaitingToStart {
            self.status = TaskStatus::Done;
        }
        self.task.request_cancel();
        self.publish(Event::new(EventKind::CancelRequested).with_task(self.task.name()));
    }

    /// Moves out the task's continuation list (second call returns empty).
    ///
    /// Intended for the driver once the anchor is `Done`.
    pub fn take_continuations(&mut self) -> Vec<TaskAnchor> {
        self.task.take_continuations()
    }

    /// Moves out the task's still-pending children (second call returns
    /// empty). Skips the lock entirely when the pending count is zero.
    pub fn take_pending_tasks(&mut self) -> Vec<TaskAnchor> {
        self.task.take_pending()
    }

    /// Display name of the underlying task.
    pub fn name(&self) -> &str {
        self.task.name()
    }

    /// Cached progress in `[0.0, 1.0]`; exactly 1.0 once `Done`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Cached sub-step label; empty once `Done`.
    pub fn progress_label(&self) -> &str {
        &self.progress_label
    }

    /// Whether the underlying task accepts cancellation while running.
    pub fn can_cancel(&self) -> bool {
        self.task.is_cancellable()
    }

    /// Whether a UI driver should display this anchor.
    pub fn is_visible(&self) -> bool {
        self.task.is_visible()
    }

    /// Current lifecycle state.
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// True once the anchor reached its terminal state.
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Remaining start delay (zero once submitted).
    pub(crate) fn time_to_start(&self) -> Duration {
        self.time_to_start
    }

    pub(crate) fn set_parent(&mut self, parent: Weak<Task>) {
        self.parent = parent;
    }

    pub(crate) fn attach_bus(&mut self, bus: Bus) {
        self.bus = Some(bus);
    }

    pub(crate) fn set_stall_warn(&mut self, interval: Duration) {
        self.stall_warn = interval;
    }

    fn publish(&self, ev: Event) {
        if let Some(bus) = &self.bus {
            bus.publish(ev);
        }
    }
}

impl Drop for TaskAnchor {
    /// Teardown is synchronous and total: cancel, then wait for the worker.
    ///
    /// After the wait, the parent task (if any, and still alive) is notified
    /// exactly once so its pending count stays accurate even when the driver
    /// discards this anchor before normal completion handling ran.
    fn drop(&mut self) {
        if self.status == TaskStatus::Started {
            self.task.request_cancel();
            if let Some(future) = &self.future {
                while !future.wait_timeout(self.stall_warn) {
                    self.publish(
                        Event::new(EventKind::JoinStalled)
                            .with_task(self.task.name())
                            .with_reason("waiting for worker to observe cancellation"),
                    );
                }
            }
        }
        if let Some(parent) = self.parent.upgrade() {
            parent.on_pending_task_done();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{ManualExecutor, ThreadExecutor};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn millis(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn waits_out_the_configured_delay() {
        let exec = ManualExecutor::new();
        let mut anchor = TaskAnchor::new(Task::from_fn("slow-start", |_| {}), millis(500));

        anchor.update(&exec, millis(200));
        anchor.update(&exec, millis(200));
        assert_eq!(anchor.status(), TaskStatus::WaitingToStart);
        assert_eq!(exec.queued(), 0);

        // Cumulative 600ms >= 500ms: submits on this tick.
        anchor.update(&exec, millis(200));
        assert_eq!(anchor.status(), TaskStatus::Started);
        assert_eq!(exec.queued(), 1);

        // Drain so the anchor's teardown has a finished worker to join.
        exec.run_all();
    }

    #[test]
    fn submits_exactly_once() {
        let exec = ManualExecutor::new();
        let mut anchor = TaskAnchor::new(Task::from_fn("once", |_| {}), Duration::ZERO);

        anchor.update(&exec, Duration::ZERO);
        assert_eq!(anchor.status(), TaskStatus::Started);
        anchor.update(&exec, millis(16));
        anchor.update(&exec, millis(16));
        assert_eq!(exec.queued(), 1);

        exec.run_all();
    }

    #[test]
    fn polls_progress_while_running_and_forces_full_on_done() {
        let exec = ManualExecutor::new();
        let task = Task::from_fn("scan", |t| t.set_progress(0.9, "already there"));
        let handle = task.clone();
        let mut anchor = TaskAnchor::new(task, Duration::ZERO);

        anchor.update(&exec, Duration::ZERO);
        assert_eq!(anchor.status(), TaskStatus::Started);

        // Simulate the worker reporting mid-run, then poll.
        handle.set_progress(0.37, "scanning");
        anchor.update(&exec, millis(16));
        assert_eq!(anchor.progress(), 0.37);
        assert_eq!(anchor.progress_label(), "scanning");

        // Worker finishes; Done is always (1.0, "").
        exec.run_all();
        anchor.update(&exec, millis(16));
        assert_eq!(anchor.status(), TaskStatus::Done);
        assert_eq!(anchor.progress(), 1.0);
        assert_eq!(anchor.progress_label(), "");
    }

    #[test]
    fn cancel_before_start_never_runs_the_work() {
        let exec = ManualExecutor::new();
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let mut anchor = TaskAnchor::new(
            Task::from_fn("doomed", move |_| flag.store(true, Ordering::SeqCst)),
            millis(100),
        );

        anchor.cancel();
        assert_eq!(anchor.status(), TaskStatus::Done);

        anchor.update(&exec, millis(500));
        anchor.update(&exec, millis(500));
        assert_eq!(exec.queued(), 0);
        exec.run_all();
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[test]
    fn cancel_before_start_is_policy_independent() {
        let task = Task::new(
            "stubborn",
            false,
            true,
            crate::tasks::WorkFn::new(|_: &Task| {}),
        );
        let handle = task.clone();
        let mut anchor = TaskAnchor::new(task, millis(100));

        anchor.cancel();
        // Submission is prevented, but the policy still gates the flag.
        assert_eq!(anchor.status(), TaskStatus::Done);
        assert!(!handle.is_cancelled());
    }

    #[test]
    fn cancel_while_started_sets_the_flag_without_changing_status() {
        let exec = ManualExecutor::new();
        let task = Task::from_fn("running", |_| {});
        let handle = task.clone();
        let mut anchor = TaskAnchor::new(task, Duration::ZERO);

        anchor.update(&exec, Duration::ZERO);
        anchor.cancel();
        assert_eq!(anchor.status(), TaskStatus::Started);
        assert!(handle.is_cancelled());

        anchor.cancel();
        assert!(handle.is_cancelled());

        exec.run_all();
    }

    #[test]
    fn drop_notifies_parent_exactly_once() {
        let parent = Task::from_fn("parent", |_| {});
        parent.add_pending_task(TaskAnchor::new(Task::from_fn("child", |_| {}), millis(10)));
        assert!(parent.has_pending_tasks());

        let children = parent.take_pending();
        assert_eq!(children.len(), 1);
        drop(children);
        assert!(!parent.has_pending_tasks());
    }

    #[test]
    fn teardown_stall_publishes_join_stalled_diagnostics() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();

        // Ignores its cancellation flag for several stall intervals.
        let task = Task::from_fn("ignores-cancel", |_| {
            std::thread::sleep(Duration::from_millis(120));
        });
        let mut anchor = TaskAnchor::new(task, Duration::ZERO);
        anchor.attach_bus(bus);
        anchor.set_stall_warn(Duration::from_millis(20));

        anchor.update(&ThreadExecutor, Duration::ZERO);
        assert_eq!(anchor.status(), TaskStatus::Started);

        // Blocks until the worker exits, warning once per interval.
        drop(anchor);

        let mut stalls = 0;
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::JoinStalled {
                assert_eq!(ev.task.as_deref(), Some("ignores-cancel"));
                assert!(ev.reason.is_some());
                stalls += 1;
            }
        }
        assert!(stalls >= 1, "expected at least one stall diagnostic");
    }

    #[test]
    fn drop_blocks_until_the_worker_observes_cancellation() {
        let exited = Arc::new(AtomicBool::new(false));
        let flag = exited.clone();
        let task = Task::from_fn("spinner", move |t| {
            while !t.is_cancelled() {
                std::thread::sleep(Duration::from_millis(1));
            }
            flag.store(true, Ordering::SeqCst);
        });
        let mut anchor = TaskAnchor::new(task, Duration::ZERO);

        anchor.update(&ThreadExecutor, Duration::ZERO);
        assert_eq!(anchor.status(), TaskStatus::Started);

        drop(anchor);
        assert!(exited.load(Ordering::SeqCst));
    }
}
