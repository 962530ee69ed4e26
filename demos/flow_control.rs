//! # Example: flow_control
//!
//! Shows pause, resume, cancel, and resurrection on a running queue.
//!
//! Demonstrates:
//! - Pausing between tasks (never mid-task)
//! - Cancelling: pending work is discarded, the in-flight task finishes
//! - Resurrecting a cancelled queue with a new submission
//!
//! ## Run
//! ```bash
//! cargo run --example flow_control
//! ```

use std::sync::Arc;
use std::time::Duration;

use taskline::{Queue, QueueConfig, TaskError, TaskFn, TaskRef};
use tokio_util::sync::CancellationToken;

fn slow_task(name: &'static str) -> TaskRef {
    TaskFn::arc(name, move |ctx: CancellationToken| async move {
        println!("[{name}] started");
        // Long-running work may watch the token to wind down early after
        // cancel(); the queue itself never aborts a task.
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(300)) => {
                println!("[{name}] finished");
            }
            _ = ctx.cancelled() => {
                println!("[{name}] observed cancellation, stopping early");
            }
        }
        Ok::<_, TaskError>(())
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let queue = Queue::new(QueueConfig {
        pause_on_error: false,
        on_status_change: Some(Arc::new(|status| println!(" ─► status: {status}"))),
    });

    queue.submit(slow_task("one"));
    queue.submit(slow_task("two"));
    queue.submit(slow_task("three"));

    // Let "one" get going, then pause: "two" will not start until resume.
    tokio::time::sleep(Duration::from_millis(100)).await;
    queue.pause();
    tokio::time::sleep(Duration::from_millis(500)).await;
    println!("paused with {} tasks pending", queue.len());

    queue.resume();
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Cancel mid-stream: "three" is discarded, "two" runs to completion.
    queue.cancel();
    println!("cancelled, pending = {}", queue.len());
    tokio::time::sleep(Duration::from_millis(500)).await;

    // A new submission resurrects the queue.
    queue.submit(slow_task("revived"));
    while !queue.is_idle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
