//! Core runtime: anchor lifecycle and the driver-side live set.
//!
//! Modules:
//! - [`anchor`]: [`TaskAnchor`] — drives one task through
//!   `WaitingToStart → Started → Done`, bridges to the executor, caches
//!   progress for lock-free reads;
//! - [`set`]: [`TaskSet`] — owns the live anchors, polls them each tick,
//!   splices continuations and orphaned children back in;
//! - [`config`]: [`Config`] — tunables shared by the set and its anchors.

mod anchor;
mod config;
mod set;

pub use anchor::{TaskAnchor, TaskStatus};
pub use config::Config;
pub use set::TaskSet;
