//! Execution primitive boundary: submit a callable, poll a future.
//!
//! The framework never owns a thread pool. It hands a boxed closure to an
//! [`Executor`] and tracks completion through a [`JobFuture`] — a latch that
//! supports a non-blocking readiness check plus a blocking wait for the one
//! place that needs it (anchor teardown).
//!
//! ## Contents
//! - [`Executor`], [`Job`] the fire-and-forget submission boundary
//! - [`submit`] pairs a job with a completion latch and returns the future
//! - [`JobFuture`] non-blocking `is_ready()`, blocking `wait`/`wait_timeout`
//! - [`TokioExecutor`] bundled bridge to `tokio::runtime::Handle::spawn_blocking`
//!
//! ## Quick wiring
//! ```text
//! TaskAnchor::update() ──► submit(exec, job) ──► Executor::execute(wrapped job)
//!                              │                        │
//!                              ▼                        ▼ (worker thread)
//!                          JobFuture ◄──── latch ◄── job runs, guard fires
//! ```

mod bridge;
mod executor;
mod future;

pub use bridge::TokioExecutor;
pub use executor::{submit, Executor, Job};
pub use future::JobFuture;

#[cfg(test)]
pub(crate) use executor::{ManualExecutor, ThreadExecutor};
