//! # Task abstractions: the work boundary and the task entity.
//!
//! This module provides the core task-related types:
//! - [`Work`] - trait for implementing a blocking, cancellation-aware work body
//! - [`WorkFn`] - closure-backed work implementation
//! - [`Task`] - the shared task entity: progress, cancellation, children,
//!   continuations

mod task;
mod work;
mod work_fn;

pub use task::Task;
pub use work::Work;
pub use work_fn::WorkFn;
