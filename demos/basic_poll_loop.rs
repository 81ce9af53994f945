//! # Demo: basic_poll_loop
//!
//! Minimal driver: one progress-reporting task polled from a tick loop, with
//! a listener printing lifecycle events.
//!
//! Demonstrates how to:
//! - Define a work body with [`Task::from_fn`].
//! - Anchor it with a start delay and add it to a [`TaskSet`].
//! - Poll `update(dt)` from a periodic loop and read cached progress.
//!
//! ## Run
//! ```bash
//! cargo run --example basic_poll_loop
//! ```

use std::sync::Arc;
use std::time::Duration;

use taskdock::{Config, Task, TaskAnchor, TaskSet, TokioExecutor};

#[tokio::main]
async fn main() {
    let mut set = TaskSet::new(Arc::new(TokioExecutor::current()), Config::default());

    // Print every lifecycle event the set publishes.
    let mut events = set.subscribe();
    tokio::spawn(async move {
        while let Ok(ev) = events.recv().await {
            println!("[event] {:?} task={:?}", ev.kind, ev.task);
        }
    });

    let scan = Task::from_fn("scan-library", |task| {
        let total = 40;
        for i in 0..total {
            if task.is_cancelled() {
                return;
            }
            task.set_progress(i as f32 / total as f32, format!("entry {i}/{total}"));
            std::thread::sleep(Duration::from_millis(25));
        }
    });

    // Half a second of delay before the work is submitted.
    set.add(TaskAnchor::new(scan, Duration::from_millis(500)));

    let dt = Duration::from_millis(50);
    while !set.is_empty() {
        set.update(dt);
        for anchor in set.tasks().iter().filter(|a| a.is_visible()) {
            println!(
                "[poll] {} {:>5.1}% {}",
                anchor.name(),
                anchor.progress() * 100.0,
                anchor.progress_label(),
            );
        }
        tokio::time::sleep(dt).await;
    }
    println!("all tasks done");
}
