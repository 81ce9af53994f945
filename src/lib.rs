//! # taskdock
//!
//! **Taskdock** is a small background-task anchoring library for interactive
//! applications: long-lived, cancellable, progress-reporting work runs off
//! the main thread while the application's tick loop polls for status. Tasks
//! can spawn child tasks and schedule follow-up tasks to run after they
//! complete.
//!
//! ## Architecture
//! ```text
//!      ┌────────────────────────────────────────────────────────┐
//!      │  Driver (app tick loop)                                │
//!      │  - owns a TaskSet, calls update(dt) every frame        │
//!      │  - reads cached progress/labels for display            │
//!      └──────────────┬─────────────────────────────────────────┘
//!                     ▼
//!      ┌────────────────────────────────────────────────────────┐
//!      │  TaskSet                                               │
//!      │  - live Vec<TaskAnchor>                                │
//!      │  - Bus (broadcast lifecycle events)                    │
//!      │  - splices continuations / pending children back in    │
//!      └──────┬──────────────────┬──────────────────┬───────────┘
//!             ▼                  ▼                  ▼
//!      ┌────────────┐     ┌────────────┐     ┌────────────┐
//!      │ TaskAnchor │     │ TaskAnchor │     │ TaskAnchor │
//!      │ Waiting →  │     │ Started    │     │ Done       │
//!      │ countdown  │     │ poll future│     │ yield next │
//!      └──────┬─────┘     └──────┬─────┘     └────────────┘
//!             │  submit(job)     │ is_ready() / snapshot
//!             ▼                  ▼
//!      ┌────────────────────────────────────────────────────────┐
//!      │  Executor (external worker pool; TokioExecutor bundled)│
//!      │  - runs Work::run(&Task) on a worker thread            │
//!      │  - body reports set_progress, checks is_cancelled,     │
//!      │    spawns add_pending_task / add_continuation          │
//!      └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//! ```text
//! TaskAnchor::update(dt):
//!   WaitingToStart ── delay elapsed ──► submit to Executor ──► Started
//!   Started ── future ready ──► Done (progress forced to 1.0, label cleared)
//!   Started ── not ready ─────► copy (progress, label) under the task lock
//!   Done ── driver takes continuations + pending children, drops anchor
//!
//! cancel():
//!   WaitingToStart ──► Done (work never runs; policy-independent)
//!   Started ──► sets the task's sticky flag iff cancellable; the body is
//!               expected to observe it and return
//!
//! drop of a Started anchor:
//!   cancel, then block until the worker finishes (JoinStalled diagnostics
//!   every stall interval) — no worker ever outlives its task
//! ```
//!
//! ## Features
//! | Area             | Description                                               | Key types                       |
//! |------------------|-----------------------------------------------------------|---------------------------------|
//! | **Work**         | Define blocking, cancellation-aware work bodies.          | [`Work`], [`WorkFn`], [`Task`]  |
//! | **Anchoring**    | Per-task lifecycle state machine with start delays.       | [`TaskAnchor`], [`TaskStatus`]  |
//! | **Driving**      | Poll loop collection with continuation/child splicing.    | [`TaskSet`], [`Config`]         |
//! | **Execution**    | Submit/poll boundary to an external worker pool.          | [`Executor`], [`JobFuture`]     |
//! | **Observability**| Broadcast lifecycle events, no printing in the core.      | [`Bus`], [`Event`], [`EventKind`]|
//! | **Errors**       | Typed driver-surface errors.                              | [`SetError`]                    |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use taskdock::{Config, Task, TaskAnchor, TaskSet, TokioExecutor};
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let mut set = TaskSet::new(
//!     Arc::new(TokioExecutor::new(rt.handle().clone())),
//!     Config::default(),
//! );
//!
//! // A cancellable, visible task that reports progress as it works.
//! set.add(TaskAnchor::new(
//!     Task::from_fn("import-assets", |task| {
//!         for i in 0..100 {
//!             if task.is_cancelled() {
//!                 return;
//!             }
//!             task.set_progress(i as f32 / 100.0, format!("asset {i}"));
//!         }
//!     }),
//!     Duration::ZERO,
//! ));
//!
//! // The application's tick loop.
//! while !set.is_empty() {
//!     set.update(Duration::from_millis(16));
//!     for anchor in set.tasks() {
//!         if anchor.is_visible() {
//!             let _ = (anchor.name(), anchor.progress(), anchor.progress_label());
//!         }
//!     }
//!     std::thread::sleep(Duration::from_millis(1));
//! }
//! ```

mod core;
mod error;
mod events;
mod exec;
mod tasks;

// ---- Public re-exports ----

pub use crate::core::{Config, TaskAnchor, TaskSet, TaskStatus};
pub use crate::error::SetError;
pub use crate::events::{Bus, Event, EventKind};
pub use crate::exec::{submit, Executor, Job, JobFuture, TokioExecutor};
pub use crate::tasks::{Task, Work, WorkFn};
