//! Error types for the taskdock runtime.
//!
//! The framework deliberately has no task-body error channel: a failed work
//! body reports through its progress label and returns (see
//! [`Work`](crate::Work)). What remains fallible is the driver-facing
//! surface, covered by [`SetError`]. A worker that never observes its
//! cancellation flag is a liveness bug in the task implementation, surfaced
//! as [`JoinStalled`](crate::EventKind::JoinStalled) events rather than an
//! error value.

use thiserror::Error;

/// Errors produced by driver-side operations on a
/// [`TaskSet`](crate::TaskSet).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SetError {
    /// A cancel request named a task with no live anchor.
    #[error("no live task named {name:?}")]
    UnknownTask {
        /// The name that failed to match.
        name: String,
    },
}

impl SetError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskdock::SetError;
    ///
    /// let err = SetError::UnknownTask { name: "ghost".into() };
    /// assert_eq!(err.as_label(), "set_unknown_task");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SetError::UnknownTask { .. } => "set_unknown_task",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SetError::UnknownTask { name } => format!("unknown task: {name}"),
        }
    }
}
