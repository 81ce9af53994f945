//! # Demo: children_and_continuations
//!
//! A parent task that spawns two pending children while running and schedules
//! a continuation for after it completes. The [`TaskSet`] adopts all three
//! once the parent is done.
//!
//! ## Flow
//! ```text
//! "import" runs ──► add_pending_task("convert-a")
//!               ──► add_pending_task("convert-b")
//!               ──► add_continuation("rebuild-index")
//! "import" Done ──► set adopts convert-a, convert-b, rebuild-index
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example children_and_continuations
//! ```

use std::sync::Arc;
use std::time::Duration;

use taskdock::{Config, Task, TaskAnchor, TaskSet, TokioExecutor};

fn convert(name: &'static str) -> TaskAnchor {
    TaskAnchor::new(
        Task::from_fn(name, move |task| {
            for i in 0..10 {
                if task.is_cancelled() {
                    return;
                }
                task.set_progress(i as f32 / 10.0, "converting");
                std::thread::sleep(Duration::from_millis(20));
            }
        }),
        Duration::ZERO,
    )
}

#[tokio::main]
async fn main() {
    let mut set = TaskSet::new(Arc::new(TokioExecutor::current()), Config::default());

    let import = Task::from_fn("import", |task| {
        task.set_progress(0.2, "reading manifest");
        std::thread::sleep(Duration::from_millis(100));

        task.add_pending_task(convert("convert-a"));
        task.add_pending_task(convert("convert-b"));

        task.set_progress(0.8, "scheduling follow-ups");
        task.add_continuation(TaskAnchor::new(
            Task::from_fn("rebuild-index", |task| {
                task.set_progress(0.5, "indexing");
                std::thread::sleep(Duration::from_millis(80));
            }),
            Duration::from_millis(200),
        ));
    });
    let import_handle = import.clone();

    set.add(TaskAnchor::new(import, Duration::ZERO));

    let dt = Duration::from_millis(50);
    while !set.is_empty() {
        set.update(dt);
        let live: Vec<_> = set.tasks().iter().map(|a| a.name().to_string()).collect();
        println!(
            "[poll] live={live:?} parent_has_pending={}",
            import_handle.has_pending_tasks()
        );
        tokio::time::sleep(dt).await;
    }
    println!("pipeline drained");
}
