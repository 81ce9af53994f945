//! Lifecycle events: types and broadcast bus.
//!
//! Everything observable about the framework flows through here: anchors
//! publish state-machine transitions, the task set publishes scheduling and
//! adoption, and teardown publishes stall diagnostics. Consumers subscribe to
//! the [`Bus`] and render, log, or meter as they see fit — the core never
//! prints.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: [`TaskSet`](crate::TaskSet) (scheduled/adopted),
//!   [`TaskAnchor`](crate::TaskAnchor) (submitted/completed/cancel/stall).
//! - **Consumers**: anything holding a receiver from [`Bus::subscribe`] —
//!   an async listener task or a `try_recv` poll from the driver thread.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
