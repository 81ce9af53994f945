//! # TaskSet: the driver-side collection of live anchors.
//!
//! An interactive application owns one `TaskSet` and calls
//! [`update`](TaskSet::update) from its periodic tick. The set polls every
//! anchor, and when one reaches `Done` it moves the task's continuations and
//! still-pending children out and splices them into the live collection, so
//! chained work keeps flowing without any scheduler-side graph traversal.
//!
//! ## Flow
//! ```text
//! driver tick ──► TaskSet::update(dt)
//!    ├─► anchor.update(executor, dt)          (each live anchor)
//!    └─► anchor Done?
//!          ├─► take_continuations() ──► publish(ContinuationAdopted) ──► add()
//!          ├─► take_pending_tasks() ──► publish(PendingAdopted)      ──► add()
//!          └─► drop anchor
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::core::anchor::TaskAnchor;
use crate::core::config::Config;
use crate::error::SetError;
use crate::events::{Bus, Event, EventKind};
use crate::exec::Executor;

/// Owns the live anchors, the executor handle, and the event bus.
///
/// Single-threaded and cooperative: nothing here blocks except dropping an
/// anchor whose worker has not finished (see
/// [`TaskAnchor`](crate::TaskAnchor) teardown), and `update` itself never
/// does that for anchors that completed normally.
///
/// ## Example
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use taskdock::{Config, Task, TaskAnchor, TaskSet, TokioExecutor};
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// let mut set = TaskSet::new(
///     Arc::new(TokioExecutor::new(rt.handle().clone())),
///     Config::default(),
/// );
///
/// set.add(TaskAnchor::new(
///     Task::from_fn("warmup", |task| task.set_progress(1.0, "")),
///     Duration::ZERO,
/// ));
///
/// while !set.is_empty() {
///     set.update(Duration::from_millis(16));
///     std::thread::sleep(Duration::from_millis(1));
/// }
/// ```
pub struct TaskSet {
    executor: Arc<dyn Executor>,
    config: Config,
    bus: Bus,
    tasks: Vec<TaskAnchor>,
}

impl TaskSet {
    /// Creates an empty set driving work through `executor`.
    pub fn new(executor: Arc<dyn Executor>, config: Config) -> Self {
        let bus = Bus::new(config.bus_capacity_clamped());
        Self {
            executor,
            config,
            bus,
            tasks: Vec::new(),
        }
    }

    /// Adds an anchor to the live set.
    ///
    /// The anchor inherits the set's event bus and stall-warning interval,
    /// and a `TaskScheduled` event carrying its remaining delay is published.
    pub fn add(&mut self, mut anchor: TaskAnchor) {
        anchor.attach_bus(self.bus.clone());
        anchor.set_stall_warn(self.config.stall_warn_clamped());
        self.bus.publish(
            Event::new(EventKind::TaskScheduled)
                .with_task(anchor.name())
                .with_delay(anchor.time_to_start()),
        );
        self.tasks.push(anchor);
    }

    /// Polls every live anchor and folds finished work back in.
    ///
    /// Anchors reaching `Done` on this tick are removed; their continuations
    /// and still-pending children are adopted into the live set and will be
    /// polled from the next call on.
    pub fn update(&mut self, dt: Duration) {
        let mut adopted: Vec<TaskAnchor> = Vec::new();

        let mut i = 0;
        while i < self.tasks.len() {
            self.tasks[i].update(self.executor.as_ref(), dt);
            if self.tasks[i].is_done() {
                let mut done = self.tasks.remove(i);
                for next in done.take_continuations() {
                    self.bus
                        .publish(Event::new(EventKind::ContinuationAdopted).with_task(next.name()));
                    adopted.push(next);
                }
                for child in done.take_pending_tasks() {
                    self.bus
                        .publish(Event::new(EventKind::PendingAdopted).with_task(child.name()));
                    adopted.push(child);
                }
            } else {
                i += 1;
            }
        }

        for anchor in adopted {
            self.add(anchor);
        }
    }

    /// Requests cancellation of every live anchor with the given name.
    ///
    /// Task names are not unique — adopted children and continuations may
    /// reuse one — so all matches are cancelled. Errors only when no live
    /// anchor matches at all.
    pub fn cancel(&mut self, name: &str) -> Result<(), SetError> {
        let mut found = false;
        for anchor in self.tasks.iter_mut().filter(|a| a.name() == name) {
            anchor.cancel();
            found = true;
        }
        if found {
            Ok(())
        } else {
            Err(SetError::UnknownTask {
                name: name.to_string(),
            })
        }
    }

    /// Requests cancellation of every live anchor.
    pub fn cancel_all(&mut self) {
        for anchor in &mut self.tasks {
            anchor.cancel();
        }
    }

    /// Live anchors, for UI display (filter on
    /// [`is_visible`](TaskAnchor::is_visible) as needed).
    pub fn tasks(&self) -> &[TaskAnchor] {
        &self.tasks
    }

    /// Number of live anchors.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True when no anchors are live.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// New receiver for lifecycle events published by this set's anchors.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::anchor::TaskStatus;
    use crate::exec::ManualExecutor;
    use crate::tasks::Task;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn manual_set() -> (Arc<ManualExecutor>, TaskSet) {
        let exec = Arc::new(ManualExecutor::new());
        let set = TaskSet::new(exec.clone(), Config::default());
        (exec, set)
    }

    fn tick(set: &mut TaskSet) {
        set.update(Duration::from_millis(16));
    }

    #[test]
    fn finished_anchors_are_removed() {
        let (exec, mut set) = manual_set();
        set.add(TaskAnchor::new(Task::from_fn("one-shot", |_| {}), Duration::ZERO));

        tick(&mut set); // submits
        exec.run_all(); // worker finishes
        tick(&mut set); // observes Done, removes
        assert!(set.is_empty());
    }

    #[test]
    fn continuations_are_spliced_into_the_live_set() {
        let (exec, mut set) = manual_set();
        let follow_up_ran = Arc::new(AtomicBool::new(false));
        let flag = follow_up_ran.clone();

        set.add(TaskAnchor::new(
            Task::from_fn("first", move |task| {
                let flag = flag.clone();
                task.add_continuation(TaskAnchor::new(
                    Task::from_fn("second", move |_| flag.store(true, Ordering::SeqCst)),
                    Duration::ZERO,
                ));
            }),
            Duration::ZERO,
        ));

        tick(&mut set); // submit "first"
        exec.run_all(); // "first" runs, registers continuation
        tick(&mut set); // "first" Done; "second" adopted
        assert_eq!(set.len(), 1);
        assert_eq!(set.tasks()[0].name(), "second");

        tick(&mut set); // submit "second"
        exec.run_all();
        tick(&mut set);
        assert!(set.is_empty());
        assert!(follow_up_ran.load(Ordering::SeqCst));
    }

    #[test]
    fn pending_children_are_adopted_and_counted_down() {
        let (exec, mut set) = manual_set();

        let parent = Task::from_fn("parent", |task| {
            task.add_pending_task(TaskAnchor::new(Task::from_fn("a", |_| {}), Duration::ZERO));
            task.add_pending_task(TaskAnchor::new(Task::from_fn("b", |_| {}), Duration::ZERO));
        });
        let parent_handle = parent.clone();
        assert!(!parent_handle.has_pending_tasks());

        set.add(TaskAnchor::new(parent, Duration::ZERO));
        tick(&mut set); // submit parent
        exec.run_all(); // parent spawns two children
        assert!(parent_handle.has_pending_tasks());

        tick(&mut set); // parent Done; children adopted
        assert_eq!(set.len(), 2);
        assert!(parent_handle.has_pending_tasks());

        tick(&mut set); // submit children
        exec.run_all();
        tick(&mut set); // children Done, dropped; parent notified
        assert!(set.is_empty());
        assert!(!parent_handle.has_pending_tasks());
    }

    #[test]
    fn cancel_by_name() {
        let (_exec, mut set) = manual_set();
        set.add(TaskAnchor::new(
            Task::from_fn("target", |_| {}),
            Duration::from_secs(60),
        ));

        assert!(set.cancel("target").is_ok());
        assert_eq!(set.tasks()[0].status(), TaskStatus::Done);

        let err = set.cancel("nope").unwrap_err();
        assert_eq!(err.as_label(), "set_unknown_task");
    }

    #[test]
    fn cancel_hits_every_anchor_sharing_a_name() {
        let (_exec, mut set) = manual_set();
        set.add(TaskAnchor::new(
            Task::from_fn("dup", |_| {}),
            Duration::from_secs(60),
        ));
        set.add(TaskAnchor::new(
            Task::from_fn("dup", |_| {}),
            Duration::from_secs(60),
        ));

        assert!(set.cancel("dup").is_ok());
        assert!(set
            .tasks()
            .iter()
            .all(|a| a.status() == TaskStatus::Done));
    }

    #[test]
    fn events_describe_the_lifecycle() {
        let (exec, mut set) = manual_set();
        let mut rx = set.subscribe();

        set.add(TaskAnchor::new(Task::from_fn("tracked", |_| {}), Duration::ZERO));
        tick(&mut set);
        exec.run_all();
        tick(&mut set);

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        assert_eq!(
            kinds,
            vec![
                EventKind::TaskScheduled,
                EventKind::TaskSubmitted,
                EventKind::TaskCompleted,
            ]
        );
    }
}
