//! # Broadcast bus for lifecycle events.
//!
//! Thin wrapper around [`tokio::sync::broadcast`]. Publishing is synchronous
//! and non-blocking, which matters here: anchors publish from the driver's
//! poll loop and from `Drop`, neither of which may await or stall.
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` calls `broadcast::Sender::send`.
//! - **Bounded capacity**: one ring buffer shared by all receivers; slow
//!   receivers observe `RecvError::Lagged(n)` and skip the `n` oldest events.
//! - **Fire-and-forget**: events sent while no receiver exists are dropped.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for lifecycle events.
///
/// Cheap to clone (the sender is `Arc`-backed internally); every anchor in a
/// [`TaskSet`](crate::TaskSet) holds a clone of the set's bus.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given ring-buffer capacity (clamped ≥ 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all active receivers; never blocks.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that observes events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[test]
    fn publish_without_receivers_is_a_no_op() {
        let bus = Bus::new(4);
        bus.publish(Event::new(EventKind::TaskSubmitted));
    }

    #[test]
    fn receivers_observe_published_events() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(Event::new(EventKind::TaskSubmitted).with_task("demo"));

        let ev = rx.try_recv().unwrap();
        assert_eq!(ev.kind, EventKind::TaskSubmitted);
        assert_eq!(ev.task.as_deref(), Some("demo"));
    }
}
