//! # Example: basic
//!
//! Minimal example of submitting a few tasks and watching them run in order.
//!
//! Demonstrates how to:
//! - Define tasks using [`TaskFn`].
//! - Submit them to a [`Queue`].
//! - Observe status transitions through the status hook.
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use std::sync::Arc;
use std::time::Duration;

use taskline::{Queue, QueueConfig, TaskError, TaskFn};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // 1. Build the queue with a status hook
    let queue = Queue::new(QueueConfig {
        pause_on_error: false,
        on_status_change: Some(Arc::new(|status| println!(" ─► status: {status}"))),
    });

    // 2. Submit three tasks; they run one at a time, FIFO
    for n in 1..=3u32 {
        queue.submit(TaskFn::arc("step", move |_ctx: CancellationToken| async move {
            println!("[step {n}] working...");
            tokio::time::sleep(Duration::from_millis(200)).await;
            println!("[step {n}] done");
            Ok::<_, TaskError>(())
        }));
    }

    // 3. A priority task jumps the line (but never the task in flight)
    queue.submit_priority(TaskFn::arc("urgent", |_ctx: CancellationToken| async {
        println!("[urgent] running ahead of the backlog");
        Ok::<_, TaskError>(())
    }));

    // 4. Wait for the queue to drain
    while !queue.is_idle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    println!("all done, pending = {}", queue.len());
}
