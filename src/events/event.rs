//! # Event data model for the task lifecycle.
//!
//! [`EventKind`] classifies what happened; [`Event`] carries the metadata
//! (task name, reason, delay). Each event gets a globally unique, monotonic
//! sequence number so consumers can restore order even when delivery is not
//! ordered.
//!
//! ## Example
//! ```rust
//! use taskdock::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::CancelRequested).with_task("import-assets");
//! assert_eq!(ev.kind, EventKind::CancelRequested);
//! assert_eq!(ev.task.as_deref(), Some("import-assets"));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of task lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Anchor entered a live task set and is counting down its start delay.
    ///
    /// Sets: `task`, `delay_ms` (remaining start delay).
    TaskScheduled,

    /// Anchor's delay elapsed; the work body was handed to the executor.
    ///
    /// Sets: `task`.
    TaskSubmitted,

    /// Anchor observed the worker finish and moved to `Done`.
    ///
    /// Sets: `task`.
    TaskCompleted,

    /// Cancellation was requested on an anchor.
    ///
    /// Emitted whether or not the task's policy allows the flag to be set;
    /// a request against a waiting anchor always prevents submission.
    ///
    /// Sets: `task`.
    CancelRequested,

    /// A continuation of a finished task was spliced into the live set.
    ///
    /// Sets: `task` (the continuation's name).
    ContinuationAdopted,

    /// A still-pending child of a finished task was spliced into the live set.
    ///
    /// Sets: `task` (the child's name).
    PendingAdopted,

    /// Anchor teardown is blocked waiting for a worker to observe
    /// cancellation.
    ///
    /// Published once per stall interval while the wait continues. A stream
    /// of these for the same task means the work body is not polling its
    /// cancellation flag — a liveness bug in the task implementation.
    ///
    /// Sets: `task`, `reason`.
    JoinStalled,
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - remaining fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the task, if applicable.
    pub task: Option<Arc<str>>,
    /// Human-readable detail (stall diagnostics and the like).
    pub reason: Option<Arc<str>>,
    /// Start delay in milliseconds (compact), for scheduling events.
    pub delay_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            reason: None,
            delay_ms: None,
        }
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a start delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_are_monotonic() {
        let a = Event::new(EventKind::TaskScheduled);
        let b = Event::new(EventKind::TaskSubmitted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn delay_is_stored_as_millis() {
        let ev = Event::new(EventKind::TaskScheduled).with_delay(Duration::from_secs(2));
        assert_eq!(ev.delay_ms, Some(2000));
    }
}
