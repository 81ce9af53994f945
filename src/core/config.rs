//! # Runtime configuration for a task set.
//!
//! ## Sentinel values
//! - `bus_capacity` is clamped to a minimum of 1 by the bus.
//! - `stall_warn` is clamped to a minimum of 10 ms so a misconfigured value
//!   cannot turn the teardown wait into a busy loop.

use std::time::Duration;

/// Tunables for a [`TaskSet`](crate::TaskSet) and the anchors it owns.
///
/// ## Example
/// ```
/// use std::time::Duration;
/// use taskdock::Config;
///
/// let cfg = Config {
///     stall_warn: Duration::from_millis(500),
///     ..Config::default()
/// };
/// assert_eq!(cfg.stall_warn_clamped(), Duration::from_millis(500));
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the event bus ring buffer.
    ///
    /// Receivers that lag behind more than this many events observe
    /// `Lagged` and skip the oldest items.
    pub bus_capacity: usize,

    /// Interval between `JoinStalled` diagnostics while an anchor's teardown
    /// waits for a worker to observe cancellation.
    pub stall_warn: Duration,
}

impl Config {
    /// Bus capacity with the minimum of 1 applied.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Stall-warning interval with the 10 ms floor applied.
    #[inline]
    pub fn stall_warn_clamped(&self) -> Duration {
        self.stall_warn.max(Duration::from_millis(10))
    }
}

impl Default for Config {
    /// Defaults: `bus_capacity = 256`, `stall_warn = 1s`.
    fn default() -> Self {
        Self {
            bus_capacity: 256,
            stall_warn: Duration::from_secs(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_apply_floors() {
        let cfg = Config {
            bus_capacity: 0,
            stall_warn: Duration::ZERO,
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert_eq!(cfg.stall_warn_clamped(), Duration::from_millis(10));
    }
}
